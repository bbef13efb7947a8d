use crate::{
    foundation::error::TileviewResult,
    layers::config::LayerConfig,
    layers::layer::RenderLayer,
    views::detail::DetailView,
    views::overview::OverviewView,
    views::viewport::{ViewStates, ViewportState},
};

/// Id of the primary view.
pub const DETAIL_VIEW_ID: &str = "detail";
/// Id of the picture-in-picture overview.
pub const OVERVIEW_VIEW_ID: &str = "overview";

/// Screen rectangle a view occupies inside the viewer canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ViewPlacement {
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Base filtering rule: accept an update wholesale iff it is addressed to `view_id`.
pub fn accept_own_update(view_id: &str, update: &ViewportState) -> Option<ViewportState> {
    (update.id == view_id).then(|| update.clone())
}

/// Capabilities shared by every view kind.
pub trait ViewBehavior {
    /// View id; keys the view's entry in [`ViewStates`].
    fn id(&self) -> &str;

    /// State the view starts with.
    fn initial_view_state(&self) -> &ViewportState;

    /// Where the view sits inside the canvas.
    fn placement(&self) -> ViewPlacement;

    /// Layers to draw this frame.
    ///
    /// Pure in `props` and `view_states`, which hold the latest state of every view.
    fn produce_layers(
        &self,
        props: &LayerConfig,
        view_states: &ViewStates,
    ) -> TileviewResult<Vec<RenderLayer>>;

    /// Translate a viewport update from any view into a new state for this one.
    ///
    /// `None` means the update does not apply and `current` stays as is.
    fn filter_view_state(
        &self,
        update: &ViewportState,
        _current: &ViewportState,
    ) -> Option<ViewportState> {
        accept_own_update(self.id(), update)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Closed set of view kinds a viewer can compose.
pub enum View {
    /// Primary view.
    Detail(DetailView),
    /// Picture-in-picture overview.
    Overview(OverviewView),
}

impl View {
    /// Overview payload, if any.
    pub fn as_overview(&self) -> Option<&OverviewView> {
        match self {
            Self::Overview(v) => Some(v),
            Self::Detail(_) => None,
        }
    }

    /// Detail payload, if any.
    pub fn as_detail(&self) -> Option<&DetailView> {
        match self {
            Self::Detail(v) => Some(v),
            Self::Overview(_) => None,
        }
    }
}

impl ViewBehavior for View {
    fn id(&self) -> &str {
        match self {
            Self::Detail(v) => v.id(),
            Self::Overview(v) => v.id(),
        }
    }

    fn initial_view_state(&self) -> &ViewportState {
        match self {
            Self::Detail(v) => v.initial_view_state(),
            Self::Overview(v) => v.initial_view_state(),
        }
    }

    fn placement(&self) -> ViewPlacement {
        match self {
            Self::Detail(v) => v.placement(),
            Self::Overview(v) => v.placement(),
        }
    }

    fn produce_layers(
        &self,
        props: &LayerConfig,
        view_states: &ViewStates,
    ) -> TileviewResult<Vec<RenderLayer>> {
        match self {
            Self::Detail(v) => v.produce_layers(props, view_states),
            Self::Overview(v) => v.produce_layers(props, view_states),
        }
    }

    fn filter_view_state(
        &self,
        update: &ViewportState,
        current: &ViewportState,
    ) -> Option<ViewportState> {
        match self {
            Self::Detail(v) => v.filter_view_state(update, current),
            Self::Overview(v) => v.filter_view_state(update, current),
        }
    }
}
