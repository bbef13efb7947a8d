//! tileview composes the views and layers of a multi-resolution image viewer.
//!
//! A viewer shows a pyramidal (or flat) image in a full-size detail view, optionally paired with a
//! picture-in-picture overview of the whole image. tileview decides which layers each view draws
//! and keeps the views' viewports in sync; actual drawing is left to an external
//! [`SceneRenderer`].
//!
//! # Pipeline overview
//!
//! 1. **Configure**: [`ViewerConfig`] (JSON) or the [`PictureInPictureViewer`] builder
//! 2. **Compose**: `PictureInPictureViewer -> SceneDescription` (views + shared layer config)
//! 3. **Produce**: each view turns its config and the latest [`ViewStates`] into [`RenderLayer`]s
//! 4. **Render**: a [`SceneFrame`] is handed to the [`SceneRenderer`]
//! 5. **Interact**: viewport changes flow back through [`ViewerSession::on_view_state_change`]
//!    and each view's filter decides whether it follows.
//!
//! Changing the plane selection of a pyramidal image keeps the current layer on screen while the
//! new one loads; the incoming layer fires a [`ViewportLoadSignal`] once resident and
//! [`ViewerSession::poll_transition`] then promotes it.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod layers;
mod loader;
mod selection;
mod viewer;
mod views;

pub use config::loader::SyntheticLoaderSpec;
pub use config::viewer::ViewerConfig;
pub use foundation::core::{Point, Rect, Rgb8, Vec2, scale_to_zoom, zoom_to_scale};
pub use foundation::error::{TileviewError, TileviewResult};
pub use layers::config::{ChannelSettings, LayerConfig};
pub use layers::ids::{bounding_box_layer_id, image_layer_id, scale_bar_layer_id, view_segment};
pub use layers::layer::{
    BoundingBoxLayer, ImageLayer, ImageProps, MultiscaleImageLayer, RefinementStrategy,
    RenderLayer, SCALE_BAR_LENGTH, ScaleBarLayer, ScaleBarPosition,
};
pub use loader::memory::InMemoryLoader;
pub use loader::metadata::{
    Dtype, HORIZONTAL_AXIS, LoaderMetadata, PhysicalSize, PhysicalSizes, RasterShape,
};
pub use loader::source::{Loader, LoaderFuture, Raster, RasterData, RasterRequest, TileRequest};
pub use selection::model::{
    DEFAULT_TRANSITION_FIELDS, PlaneSelection, Selection, default_transition_fields,
};
pub use selection::transition::{TransitionState, ViewportLoadReceiver, ViewportLoadSignal};
pub use viewer::pip::PictureInPictureViewer;
pub use viewer::scene::{SceneDescription, SceneFrame, SceneRenderer};
pub use viewer::session::ViewerSession;
pub use views::detail::DetailView;
pub use views::overview::{OverviewOptions, OverviewPosition, OverviewView};
pub use views::view::{
    DETAIL_VIEW_ID, OVERVIEW_VIEW_ID, View, ViewBehavior, ViewPlacement, accept_own_update,
};
pub use views::viewport::{InitialViewState, ViewStates, ViewportState};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;
