use std::sync::Arc;

use crate::{
    foundation::core::{Point, Rgb8, zoom_to_scale},
    layers::config::{ChannelSettings, LayerConfig},
    loader::source::Loader,
    selection::model::Selection,
    selection::transition::ViewportLoadSignal,
    views::viewport::ViewportState,
};

fn serialize_loader_kind<S>(loader: &Arc<dyn Loader>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&loader.metadata().kind)
}

/// How a tiled layer fills the screen while finer tiles load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementStrategy {
    /// Show coarser cached tiles until finer ones arrive.
    #[default]
    BestAvailable,
    /// Show nothing for a tile until its own data arrives.
    Never,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Display properties shared by image layers.
pub struct ImageProps {
    /// Per-channel display settings.
    pub channels: ChannelSettings,
    /// Optional colormap name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colormap: Option<String>,
    /// Planes rendered by the layer; `None` renders the loader's default plane.
    pub selection: Option<Selection>,
}

impl ImageProps {
    /// Take display settings from `config` and render `selection`.
    pub fn from_config(config: &LayerConfig, selection: Option<&Selection>) -> Self {
        Self {
            channels: config.channels.clone(),
            colormap: config.colormap.clone(),
            selection: selection.cloned(),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
/// Single-resolution image layer for flat sources.
pub struct ImageLayer {
    /// Layer id.
    pub id: String,
    /// View the layer is drawn in.
    pub viewport_id: String,
    /// Image source.
    #[serde(rename = "loader", serialize_with = "serialize_loader_kind")]
    pub loader: Arc<dyn Loader>,
    /// Display properties.
    pub props: ImageProps,
}

#[derive(Clone, Debug, serde::Serialize)]
/// Tiled image layer for pyramidal sources.
pub struct MultiscaleImageLayer {
    /// Layer id.
    pub id: String,
    /// View the layer is drawn in.
    pub viewport_id: String,
    /// Image source.
    #[serde(rename = "loader", serialize_with = "serialize_loader_kind")]
    pub loader: Arc<dyn Loader>,
    /// Display properties.
    pub props: ImageProps,
    /// Tile refinement behaviour.
    pub refinement: RefinementStrategy,
    /// Skip drawing the background until own tiles are resident.
    pub exclude_background: bool,
    /// Restrict fetching to one level (overview thumbnails).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_level: Option<u32>,
    /// Fired once the viewport is fully loaded.
    #[serde(skip)]
    pub on_viewport_load: Option<ViewportLoadSignal>,
}

impl MultiscaleImageLayer {
    /// Steady-state layer that refines from coarser tiles.
    pub fn new(
        id: String,
        viewport_id: impl Into<String>,
        loader: Arc<dyn Loader>,
        props: ImageProps,
    ) -> Self {
        Self {
            id,
            viewport_id: viewport_id.into(),
            loader,
            props,
            refinement: RefinementStrategy::BestAvailable,
            exclude_background: false,
            pinned_level: None,
            on_viewport_load: None,
        }
    }

    /// Turn this into the incoming half of a transition.
    pub fn incoming(mut self, on_viewport_load: Option<ViewportLoadSignal>) -> Self {
        self.refinement = RefinementStrategy::Never;
        self.exclude_background = true;
        self.on_viewport_load = on_viewport_load;
        self
    }

    /// Report that every visible tile of this layer is resident.
    ///
    /// Returns `true` when a pending transition was notified.
    pub fn viewport_loaded(&self) -> bool {
        self.on_viewport_load
            .as_ref()
            .is_some_and(ViewportLoadSignal::notify)
    }
}

/// Corner of the view a scale bar is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleBarPosition {
    /// Bottom-right corner.
    #[default]
    BottomRight,
    /// Top-right corner.
    TopRight,
    /// Top-left corner.
    TopLeft,
    /// Bottom-left corner.
    BottomLeft,
}

/// Default bar length as a fraction of the view width.
pub const SCALE_BAR_LENGTH: f64 = 0.085;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Physical scale bar derived from loader calibration.
pub struct ScaleBarLayer {
    /// Layer id.
    pub id: String,
    /// View the layer is drawn in.
    pub viewport_id: String,
    /// Calibration unit.
    pub unit: String,
    /// Physical size of one full-resolution pixel, in `unit`.
    pub size: f64,
    /// Viewport the bar measures.
    pub view_state: ViewportState,
    /// Anchor corner.
    pub position: ScaleBarPosition,
    /// Bar length as a fraction of the view width.
    pub length: f64,
}

impl ScaleBarLayer {
    /// On-screen bar length in pixels.
    pub fn bar_length_px(&self) -> f64 {
        self.view_state.width * self.length
    }

    /// Physical distance covered by the bar, in `unit`.
    pub fn bar_physical_length(&self) -> f64 {
        self.bar_length_px() / zoom_to_scale(self.view_state.zoom) * self.size
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Outline of the detail viewport drawn inside the overview.
pub struct BoundingBoxLayer {
    /// Layer id.
    pub id: String,
    /// View the layer is drawn in.
    pub viewport_id: String,
    /// Detail view corners in image coordinates: top-left, top-right, bottom-right, bottom-left.
    pub bounding_box: [Point; 4],
    /// Overview pixels per full-resolution image pixel.
    pub overview_scale: f64,
    /// Color of the detail viewport rectangle.
    pub bounding_box_color: Rgb8,
    /// Stroke width of the detail viewport rectangle.
    pub bounding_box_outline_width: f64,
    /// Color of the overview frame.
    pub viewport_outline_color: Rgb8,
    /// Stroke width of the overview frame.
    pub viewport_outline_width: f64,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Renderable unit produced by a view for one frame.
pub enum RenderLayer {
    /// Flat image.
    Image(ImageLayer),
    /// Tiled pyramid image.
    MultiscaleImage(MultiscaleImageLayer),
    /// Scale bar.
    ScaleBar(ScaleBarLayer),
    /// Overview rectangle.
    BoundingBox(BoundingBoxLayer),
}

impl RenderLayer {
    /// Layer id.
    pub fn id(&self) -> &str {
        match self {
            Self::Image(l) => &l.id,
            Self::MultiscaleImage(l) => &l.id,
            Self::ScaleBar(l) => &l.id,
            Self::BoundingBox(l) => &l.id,
        }
    }

    /// View the layer is drawn in.
    pub fn viewport_id(&self) -> &str {
        match self {
            Self::Image(l) => &l.viewport_id,
            Self::MultiscaleImage(l) => &l.viewport_id,
            Self::ScaleBar(l) => &l.viewport_id,
            Self::BoundingBox(l) => &l.viewport_id,
        }
    }

    /// Return `true` for layers that draw image data.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_) | Self::MultiscaleImage(_))
    }

    /// Multiscale payload, if any.
    pub fn as_multiscale(&self) -> Option<&MultiscaleImageLayer> {
        match self {
            Self::MultiscaleImage(l) => Some(l),
            _ => None,
        }
    }

    /// Scale bar payload, if any.
    pub fn as_scale_bar(&self) -> Option<&ScaleBarLayer> {
        match self {
            Self::ScaleBar(l) => Some(l),
            _ => None,
        }
    }

    /// Bounding box payload, if any.
    pub fn as_bounding_box(&self) -> Option<&BoundingBoxLayer> {
        match self {
            Self::BoundingBox(l) => Some(l),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/layer.rs"]
mod tests;
