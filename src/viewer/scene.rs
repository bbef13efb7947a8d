use crate::{
    foundation::error::TileviewResult,
    layers::config::LayerConfig,
    layers::layer::RenderLayer,
    views::view::{View, ViewBehavior},
    views::viewport::ViewStates,
};

/// Views of a viewer and their index-aligned layer configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    /// Views in draw order; the detail view comes first.
    pub views: Vec<View>,
    /// Rendering configuration per view.
    pub layer_props: Vec<LayerConfig>,
}

impl SceneDescription {
    /// Return `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// View with id `id`.
    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id() == id)
    }

    /// Initial state of every view.
    pub fn initial_view_states(&self) -> ViewStates {
        self.views
            .iter()
            .map(|v| v.initial_view_state().clone())
            .collect()
    }

    /// Layers of every view, index-aligned with [`SceneDescription::views`].
    pub fn produce_layers(
        &self,
        view_states: &ViewStates,
    ) -> TileviewResult<Vec<Vec<RenderLayer>>> {
        self.views
            .iter()
            .zip(&self.layer_props)
            .map(|(view, props)| view.produce_layers(props, view_states))
            .collect()
    }

    /// Borrow everything a renderer needs for one frame.
    pub fn frame<'a>(
        &'a self,
        view_states: &'a ViewStates,
        layers: &'a [Vec<RenderLayer>],
    ) -> SceneFrame<'a> {
        SceneFrame {
            views: &self.views,
            layer_props: &self.layer_props,
            view_states,
            layers,
        }
    }
}

/// One frame handed to a [`SceneRenderer`].
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct SceneFrame<'a> {
    /// Views in draw order.
    pub views: &'a [View],
    /// Rendering configuration per view.
    #[serde(skip)]
    pub layer_props: &'a [LayerConfig],
    /// Latest state of every view.
    pub view_states: &'a ViewStates,
    /// Layers per view, index-aligned with `views`.
    pub layers: &'a [Vec<RenderLayer>],
}

impl SceneFrame<'_> {
    /// Layers and view pairs in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (&View, &[RenderLayer])> {
        self.views.iter().zip(self.layers.iter().map(Vec::as_slice))
    }
}

/// External scene renderer fed with composed frames.
///
/// Implementations draw the layers and report interaction back through
/// [`crate::ViewerSession::on_view_state_change`].
pub trait SceneRenderer {
    /// Draw one frame.
    fn render(&mut self, frame: &SceneFrame<'_>) -> TileviewResult<()>;
}
