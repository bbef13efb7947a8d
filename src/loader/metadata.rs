use std::collections::BTreeMap;

use crate::foundation::error::{TileviewError, TileviewResult};

/// Axis label whose calibration drives the scale bar.
pub const HORIZONTAL_AXIS: &str = "x";

/// Per-pixel sample type exposed by a loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Dtype {
    /// Unsigned 8-bit samples.
    Uint8,
    /// Unsigned 16-bit samples.
    Uint16,
    /// Unsigned 32-bit samples.
    Uint32,
    /// 32-bit float samples.
    Float32,
}

impl Dtype {
    /// Size of one sample in bytes.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 | Self::Float32 => 4,
        }
    }
}

/// Width and height of a raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RasterShape {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RasterShape {
    /// Build a shape.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Shape of the next coarser pyramid level (halved, rounded up, never below 1).
    pub fn halved(self) -> Self {
        Self {
            width: self.width.div_ceil(2).max(1),
            height: self.height.div_ceil(2).max(1),
        }
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Real-world size of one pixel along an axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhysicalSize {
    /// Unit label, e.g. `µm`.
    pub unit: String,
    /// Size of one pixel in `unit`.
    pub value: f64,
}

impl PhysicalSize {
    /// Build a calibration entry.
    pub fn new(unit: impl Into<String>, value: f64) -> Self {
        Self {
            unit: unit.into(),
            value,
        }
    }

    /// A calibration is usable when it names a unit and has a positive finite size.
    pub fn is_usable(&self) -> bool {
        !self.unit.is_empty() && self.value.is_finite() && self.value > 0.0
    }
}

/// Calibration keyed by axis label (`x`, `y`, `z`).
pub type PhysicalSizes = BTreeMap<String, PhysicalSize>;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Static description of a multi-resolution image source.
///
/// Level `0` is full resolution; every further level halves both dimensions.
pub struct LoaderMetadata {
    /// Source type tag; prefixes the ids of generated image layers.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the source is a multi-level pyramid.
    pub is_pyramid: bool,
    /// Number of resolution levels (at least 1).
    pub num_levels: u32,
    /// Native tile edge length in pixels.
    pub tile_size: u32,
    /// Per-pixel sample type.
    pub dtype: Dtype,
    /// Full-resolution raster shape.
    pub shape: RasterShape,
    /// Optional per-axis physical calibration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_sizes: Option<PhysicalSizes>,
}

impl LoaderMetadata {
    /// Check structural constraints.
    pub fn validate(&self) -> TileviewResult<()> {
        if self.kind.trim().is_empty() {
            return Err(TileviewError::validation("loader type must be non-empty"));
        }
        if self.num_levels == 0 || self.num_levels > 32 {
            return Err(TileviewError::validation(
                "loader num_levels must be in 1..=32",
            ));
        }
        if !self.is_pyramid && self.num_levels != 1 {
            return Err(TileviewError::validation(
                "non-pyramidal loader must expose exactly one level",
            ));
        }
        if self.tile_size == 0 {
            return Err(TileviewError::validation("loader tile_size must be > 0"));
        }
        if self.shape.width == 0 || self.shape.height == 0 {
            return Err(TileviewError::validation(
                "loader raster shape must be non-empty",
            ));
        }
        Ok(())
    }

    /// Raster shape of `level`.
    pub fn raster_size(&self, level: u32) -> TileviewResult<RasterShape> {
        if level >= self.num_levels {
            return Err(TileviewError::validation(format!(
                "level {level} is out of range (num_levels={})",
                self.num_levels
            )));
        }
        Ok((0..level).fold(self.shape, |shape, _| shape.halved()))
    }

    /// Index of the coarsest level.
    pub fn coarsest_level(&self) -> u32 {
        self.num_levels.saturating_sub(1)
    }

    /// Calibration of the horizontal axis, when present and usable.
    pub fn horizontal_physical_size(&self) -> Option<&PhysicalSize> {
        self.physical_sizes
            .as_ref()?
            .get(HORIZONTAL_AXIS)
            .filter(|size| size.is_usable())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/metadata.rs"]
mod tests;
