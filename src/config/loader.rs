use std::sync::Arc;

use crate::{
    foundation::error::{TileviewError, TileviewResult},
    loader::memory::InMemoryLoader,
    loader::metadata::{Dtype, PhysicalSizes},
    loader::source::{Loader, Raster, RasterData},
    selection::model::PlaneSelection,
};

// Keeps generated sources small enough to build eagerly.
const MAX_PLANE_PIXELS: u64 = 1 << 26;
const MAX_PLANES: u32 = 1024;

fn default_kind() -> String {
    "synthetic".to_string()
}

fn default_tile_size() -> u32 {
    256
}

fn default_true() -> bool {
    true
}

fn default_dtype() -> Dtype {
    Dtype::Uint16
}

fn default_count() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Description of a generated in-memory source.
///
/// Every `(channel, z, t)` plane is filled with a diagonal ramp offset by its indices, so
/// different planes are distinguishable once rendered.
pub struct SyntheticLoaderSpec {
    /// Source type tag; prefixes layer ids.
    #[serde(rename = "type", alias = "kind", default = "default_kind")]
    pub kind: String,
    /// Full-resolution width in pixels.
    pub width: u32,
    /// Full-resolution height in pixels.
    pub height: u32,
    /// Tile edge length; also bounds the coarsest level.
    #[serde(default = "default_tile_size", alias = "tileSize")]
    pub tile_size: u32,
    /// Build a multi-level pyramid instead of a flat source.
    #[serde(default = "default_true")]
    pub pyramid: bool,
    /// Sample type.
    #[serde(default = "default_dtype")]
    pub dtype: Dtype,
    /// Number of channels.
    #[serde(default = "default_count")]
    pub channels: u32,
    /// Number of z slices.
    #[serde(default = "default_count")]
    pub z: u32,
    /// Number of time points.
    #[serde(default = "default_count")]
    pub t: u32,
    /// Optional per-axis calibration.
    #[serde(default, alias = "physicalSizes")]
    pub physical_sizes: Option<PhysicalSizes>,
}

impl SyntheticLoaderSpec {
    /// Check dimensions and plane counts.
    pub fn validate(&self) -> TileviewResult<()> {
        if self.kind.trim().is_empty() {
            return Err(TileviewError::validation("loader.type must be non-empty"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TileviewError::validation(
                "loader width/height must be > 0",
            ));
        }
        if u64::from(self.width) * u64::from(self.height) > MAX_PLANE_PIXELS {
            return Err(TileviewError::validation(format!(
                "loader plane of {}x{} exceeds {MAX_PLANE_PIXELS} pixels",
                self.width, self.height
            )));
        }
        if self.tile_size == 0 {
            return Err(TileviewError::validation("loader.tile_size must be > 0"));
        }
        if self.channels == 0 || self.z == 0 || self.t == 0 {
            return Err(TileviewError::validation(
                "loader channels/z/t must be >= 1",
            ));
        }
        let planes = u64::from(self.channels) * u64::from(self.z) * u64::from(self.t);
        if planes > u64::from(MAX_PLANES) {
            return Err(TileviewError::validation(format!(
                "loader describes {planes} planes; at most {MAX_PLANES} are supported"
            )));
        }
        Ok(())
    }

    /// Generate the source.
    #[tracing::instrument(
        skip(self),
        fields(kind = %self.kind, width = self.width, height = self.height)
    )]
    pub fn build(&self) -> TileviewResult<Arc<dyn Loader>> {
        self.validate()?;

        let mut planes = Vec::new();
        for channel in 0..self.channels {
            for z in 0..self.z {
                for t in 0..self.t {
                    let plane = PlaneSelection::new()
                        .with("channel", channel)
                        .with("z", z)
                        .with("t", t);
                    let offset = channel * 64 + z * 8 + t;
                    planes.push((plane, self.ramp(offset)?));
                }
            }
        }

        let loader = if self.pyramid {
            InMemoryLoader::from_planes(self.kind.clone(), self.tile_size, planes)?
        } else {
            InMemoryLoader::flat(self.kind.clone(), planes)?
        };
        let loader = match &self.physical_sizes {
            Some(sizes) => loader.with_physical_sizes(sizes.clone()),
            None => loader,
        };
        Ok(Arc::new(loader))
    }

    fn ramp(&self, offset: u32) -> TileviewResult<Raster> {
        let (w, h) = (self.width, self.height);
        let samples = (0..h).flat_map(move |y| (0..w).map(move |x| x + y + offset));
        let data = match self.dtype {
            Dtype::Uint8 => RasterData::Uint8(samples.map(|v| (v % 256) as u8).collect()),
            Dtype::Uint16 => RasterData::Uint16(samples.map(|v| (v % 65_536) as u16).collect()),
            Dtype::Uint32 => RasterData::Uint32(samples.collect()),
            Dtype::Float32 => RasterData::Float32(samples.map(|v| v as f32).collect()),
        };
        Raster::new(w, h, data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/loader.rs"]
mod tests;
