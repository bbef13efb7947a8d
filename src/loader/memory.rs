use futures_util::FutureExt as _;

use crate::{
    foundation::error::{TileviewError, TileviewResult},
    loader::metadata::{Dtype, LoaderMetadata, PhysicalSizes, RasterShape},
    loader::source::{Loader, LoaderFuture, Raster, RasterRequest, TileRequest},
    selection::model::PlaneSelection,
};

#[derive(Clone, Debug)]
struct PlanePyramid {
    plane: PlaneSelection,
    // Index 0 is full resolution.
    levels: Vec<Raster>,
}

/// Loader backed by rasters held in memory.
///
/// Coarser levels are derived by nearest-neighbour decimation until the whole level fits in one
/// tile. All planes must share one shape and one sample type.
#[derive(Clone, Debug)]
pub struct InMemoryLoader {
    metadata: LoaderMetadata,
    planes: Vec<PlanePyramid>,
}

impl InMemoryLoader {
    /// Build a pyramid from full-resolution planes.
    ///
    /// The result reports `is_pyramid = true` only when more than one level was needed.
    pub fn from_planes(
        kind: impl Into<String>,
        tile_size: u32,
        planes: Vec<(PlaneSelection, Raster)>,
    ) -> TileviewResult<Self> {
        if tile_size == 0 {
            return Err(TileviewError::validation("tile_size must be > 0"));
        }
        let (shape, dtype) = check_planes(&planes)?;

        let mut num_levels = 1u32;
        let mut level_shape = shape;
        while level_shape.width.max(level_shape.height) > tile_size {
            level_shape = level_shape.halved();
            num_levels += 1;
        }

        let planes = planes
            .into_iter()
            .map(|(plane, base)| {
                let mut levels = Vec::with_capacity(num_levels as usize);
                levels.push(base);
                for _ in 1..num_levels {
                    let next = levels[levels.len() - 1].decimated();
                    levels.push(next);
                }
                PlanePyramid { plane, levels }
            })
            .collect();

        let metadata = LoaderMetadata {
            kind: kind.into(),
            is_pyramid: num_levels > 1,
            num_levels,
            tile_size,
            dtype,
            shape,
            physical_sizes: None,
        };
        metadata.validate()?;
        tracing::debug!(
            kind = %metadata.kind,
            num_levels,
            width = shape.width,
            height = shape.height,
            "built in-memory pyramid"
        );
        Ok(Self { metadata, planes })
    }

    /// Build a single-level (non-pyramidal) source; the tile is the whole raster.
    pub fn flat(
        kind: impl Into<String>,
        planes: Vec<(PlaneSelection, Raster)>,
    ) -> TileviewResult<Self> {
        let (shape, dtype) = check_planes(&planes)?;
        let metadata = LoaderMetadata {
            kind: kind.into(),
            is_pyramid: false,
            num_levels: 1,
            tile_size: shape.width.max(shape.height),
            dtype,
            shape,
            physical_sizes: None,
        };
        metadata.validate()?;
        let planes = planes
            .into_iter()
            .map(|(plane, base)| PlanePyramid {
                plane,
                levels: vec![base],
            })
            .collect();
        Ok(Self { metadata, planes })
    }

    /// Attach physical calibration.
    pub fn with_physical_sizes(mut self, sizes: PhysicalSizes) -> Self {
        self.metadata.physical_sizes = Some(sizes);
        self
    }

    /// Planes held by this loader, in insertion order.
    pub fn planes(&self) -> impl Iterator<Item = &PlaneSelection> {
        self.planes.iter().map(|p| &p.plane)
    }

    fn level(&self, plane: &PlaneSelection, level: u32) -> TileviewResult<&Raster> {
        let pyramid = self
            .planes
            .iter()
            .find(|p| &p.plane == plane)
            .ok_or_else(|| TileviewError::loader(format!("no plane matches {plane}")))?;
        pyramid.levels.get(level as usize).ok_or_else(|| {
            TileviewError::loader(format!(
                "level {level} is out of range (num_levels={})",
                self.metadata.num_levels
            ))
        })
    }

    fn read_tile(&self, request: &TileRequest) -> TileviewResult<Raster> {
        let raster = self.level(&request.plane, request.level)?;
        let size = self.metadata.tile_size;
        let x0 = request.x.checked_mul(size);
        let y0 = request.y.checked_mul(size);
        match (x0, y0) {
            (Some(x0), Some(y0)) if x0 < raster.width && y0 < raster.height => {
                raster.cropped(x0, y0, size, size)
            }
            _ => Err(TileviewError::loader(format!(
                "tile ({}, {}) is outside level {}",
                request.x, request.y, request.level
            ))),
        }
    }
}

fn check_planes(planes: &[(PlaneSelection, Raster)]) -> TileviewResult<(RasterShape, Dtype)> {
    let (_, first) = planes
        .first()
        .ok_or_else(|| TileviewError::validation("loader needs at least one plane"))?;
    let (shape, dtype) = (first.shape(), first.dtype());
    for (plane, raster) in planes {
        if raster.shape() != shape || raster.dtype() != dtype {
            return Err(TileviewError::validation(format!(
                "plane {plane} does not match the shape/dtype of the first plane"
            )));
        }
    }
    for (i, (plane, _)) in planes.iter().enumerate() {
        if planes[..i].iter().any(|(p, _)| p == plane) {
            return Err(TileviewError::validation(format!("duplicate plane {plane}")));
        }
    }
    Ok((shape, dtype))
}

impl Loader for InMemoryLoader {
    fn metadata(&self) -> &LoaderMetadata {
        &self.metadata
    }

    fn get_tile(&self, request: TileRequest) -> LoaderFuture<'_, Raster> {
        futures_util::future::ready(self.read_tile(&request)).boxed()
    }

    fn get_raster(&self, request: RasterRequest) -> LoaderFuture<'_, Raster> {
        let result = self.level(&request.plane, request.level).cloned();
        futures_util::future::ready(result).boxed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/memory.rs"]
mod tests;
