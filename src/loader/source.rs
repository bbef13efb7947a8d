use std::fmt;

use futures_util::future::BoxFuture;

use crate::{
    foundation::error::{TileviewError, TileviewResult},
    loader::metadata::{Dtype, LoaderMetadata, RasterShape},
    selection::model::PlaneSelection,
};

/// Future returned by [`Loader`] fetch operations.
pub type LoaderFuture<'a, T> = BoxFuture<'a, TileviewResult<T>>;

/// Typed pixel storage of a [`Raster`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum RasterData {
    /// 8-bit samples.
    Uint8(Vec<u8>),
    /// 16-bit samples.
    Uint16(Vec<u16>),
    /// 32-bit samples.
    Uint32(Vec<u32>),
    /// Float samples.
    Float32(Vec<f32>),
}

impl RasterData {
    /// Sample type of this buffer.
    pub fn dtype(&self) -> Dtype {
        match self {
            Self::Uint8(_) => Dtype::Uint8,
            Self::Uint16(_) => Dtype::Uint16,
            Self::Uint32(_) => Dtype::Uint32,
            Self::Float32(_) => Dtype::Float32,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::Uint8(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Uint32(v) => v.len(),
            Self::Float32(v) => v.len(),
        }
    }

    /// Return `true` when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-plane pixel block returned by a loader.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major samples.
    pub data: RasterData,
}

impl Raster {
    /// Build a raster, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, data: RasterData) -> TileviewResult<Self> {
        let expected = RasterShape::new(width, height).area();
        if data.len() != expected {
            return Err(TileviewError::validation(format!(
                "raster {width}x{height} expects {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Dimensions of this raster.
    pub fn shape(&self) -> RasterShape {
        RasterShape::new(self.width, self.height)
    }

    /// Sample type of this raster.
    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }

    /// Nearest-neighbour 2x reduction used to build coarser pyramid levels.
    pub fn decimated(&self) -> Self {
        let shape = self.shape().halved();
        let data = match &self.data {
            RasterData::Uint8(v) => RasterData::Uint8(decimate(v, self.shape(), shape)),
            RasterData::Uint16(v) => RasterData::Uint16(decimate(v, self.shape(), shape)),
            RasterData::Uint32(v) => RasterData::Uint32(decimate(v, self.shape(), shape)),
            RasterData::Float32(v) => RasterData::Float32(decimate(v, self.shape(), shape)),
        };
        Self {
            width: shape.width,
            height: shape.height,
            data,
        }
    }

    /// Copy the window `[x0, x0 + width) x [y0, y0 + height)`, clipped to the raster.
    pub fn cropped(&self, x0: u32, y0: u32, width: u32, height: u32) -> TileviewResult<Self> {
        if x0 >= self.width || y0 >= self.height {
            return Err(TileviewError::loader(format!(
                "crop origin ({x0}, {y0}) is outside {}x{} raster",
                self.width, self.height
            )));
        }
        let w = width.min(self.width - x0);
        let h = height.min(self.height - y0);
        let window = Window {
            stride: self.width,
            x0,
            y0,
            width: w,
            height: h,
        };
        let data = match &self.data {
            RasterData::Uint8(v) => RasterData::Uint8(window.copy(v)),
            RasterData::Uint16(v) => RasterData::Uint16(window.copy(v)),
            RasterData::Uint32(v) => RasterData::Uint32(window.copy(v)),
            RasterData::Float32(v) => RasterData::Float32(window.copy(v)),
        };
        Ok(Self {
            width: w,
            height: h,
            data,
        })
    }
}

fn decimate<T: Copy>(src: &[T], from: RasterShape, to: RasterShape) -> Vec<T> {
    let stride = from.width as usize;
    let mut out = Vec::with_capacity(to.area());
    for y in 0..to.height as usize {
        let row = (y * 2).min(from.height as usize - 1) * stride;
        for x in 0..to.width as usize {
            out.push(src[row + (x * 2).min(stride - 1)]);
        }
    }
    out
}

#[derive(Clone, Copy, Debug)]
struct Window {
    stride: u32,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
}

impl Window {
    fn copy<T: Copy>(self, src: &[T]) -> Vec<T> {
        let stride = self.stride as usize;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in self.y0..self.y0 + self.height {
            let start = y as usize * stride + self.x0 as usize;
            out.extend_from_slice(&src[start..start + self.width as usize]);
        }
        out
    }
}

/// Request for one native tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRequest {
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
    /// Resolution level (`0` = full resolution).
    pub level: u32,
    /// Plane to read.
    pub plane: PlaneSelection,
}

/// Request for a whole level of one plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterRequest {
    /// Resolution level (`0` = full resolution).
    pub level: u32,
    /// Plane to read.
    pub plane: PlaneSelection,
}

/// Multi-resolution image source consumed by views and renderers.
///
/// The composition engine only reads [`Loader::metadata`]. Fetches are asynchronous and are
/// driven by the scene renderer; failures come back as [`TileviewError::Loader`].
pub trait Loader: Send + Sync + fmt::Debug {
    /// Static description of the source.
    fn metadata(&self) -> &LoaderMetadata;

    /// Fetch one native tile.
    fn get_tile(&self, request: TileRequest) -> LoaderFuture<'_, Raster>;

    /// Fetch a full level of one plane.
    fn get_raster(&self, request: RasterRequest) -> LoaderFuture<'_, Raster>;
}

#[cfg(test)]
#[path = "../../tests/unit/loader/source.rs"]
mod tests;
