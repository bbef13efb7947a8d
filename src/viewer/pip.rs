use std::sync::Arc;

use crate::{
    foundation::error::TileviewResult,
    layers::config::{ChannelSettings, LayerConfig},
    loader::source::Loader,
    selection::model::{Selection, default_transition_fields},
    selection::transition::ViewportLoadSignal,
    viewer::scene::{SceneDescription, SceneRenderer},
    views::detail::DetailView,
    views::overview::{OverviewOptions, OverviewView},
    views::view::{DETAIL_VIEW_ID, OVERVIEW_VIEW_ID, View},
    views::viewport::{InitialViewState, ViewportState},
};

/// Detail view with an optional picture-in-picture overview.
///
/// Holds the viewer inputs and composes them into a [`SceneDescription`]. Composition is
/// recomputed from scratch on every call; nothing is cached between frames.
#[derive(Clone, Debug)]
pub struct PictureInPictureViewer {
    loader: Option<Arc<dyn Loader>>,
    channels: ChannelSettings,
    colormap: Option<String>,
    loader_selection: Option<Selection>,
    new_loader_selection: Option<Selection>,
    transition_fields: Vec<String>,
    on_viewport_load: Option<ViewportLoadSignal>,
    initial_view_state: InitialViewState,
    overview_on: bool,
    overview: OverviewOptions,
}

impl PictureInPictureViewer {
    /// Viewer over `loader` (possibly not loaded yet) with the overview disabled.
    ///
    /// Layer ids summarize the `t` and `z` fields until [`Self::with_transition_fields`] says
    /// otherwise.
    pub fn new(loader: Option<Arc<dyn Loader>>, initial_view_state: InitialViewState) -> Self {
        Self {
            loader,
            channels: ChannelSettings::default(),
            colormap: None,
            loader_selection: None,
            new_loader_selection: None,
            transition_fields: default_transition_fields(),
            on_viewport_load: None,
            initial_view_state,
            overview_on: false,
            overview: OverviewOptions::default(),
        }
    }

    /// Set per-channel display settings.
    pub fn with_channels(mut self, channels: ChannelSettings) -> Self {
        self.channels = channels;
        self
    }

    /// Set the colormap name.
    pub fn with_colormap(mut self, colormap: Option<String>) -> Self {
        self.colormap = colormap;
        self
    }

    /// Set the selection on screen.
    pub fn with_selection(mut self, selection: Option<Selection>) -> Self {
        self.loader_selection = selection;
        self
    }

    /// Set the selection being loaded and the signal fired once it is resident.
    pub fn with_incoming(
        mut self,
        selection: Option<Selection>,
        on_viewport_load: Option<ViewportLoadSignal>,
    ) -> Self {
        self.new_loader_selection = selection;
        self.on_viewport_load = on_viewport_load;
        self
    }

    /// Set the selection fields summarized in image layer ids.
    pub fn with_transition_fields(mut self, fields: Vec<String>) -> Self {
        self.transition_fields = fields;
        self
    }

    /// Enable or disable the overview and set its options.
    pub fn with_overview(mut self, overview_on: bool, options: OverviewOptions) -> Self {
        self.overview_on = overview_on;
        self.overview = options;
        self
    }

    /// Image source, if loaded.
    pub fn loader(&self) -> Option<&Arc<dyn Loader>> {
        self.loader.as_ref()
    }

    /// Viewport the detail view starts with.
    pub fn initial_view_state(&self) -> &InitialViewState {
        &self.initial_view_state
    }

    /// Selection on screen.
    pub fn loader_selection(&self) -> Option<&Selection> {
        self.loader_selection.as_ref()
    }

    /// Selection being loaded.
    pub fn new_loader_selection(&self) -> Option<&Selection> {
        self.new_loader_selection.as_ref()
    }

    /// Selection fields summarized in image layer ids.
    pub fn transition_fields(&self) -> &[String] {
        &self.transition_fields
    }

    /// Whether the overview is requested.
    pub fn overview_on(&self) -> bool {
        self.overview_on
    }

    /// Overview options.
    pub fn overview_options(&self) -> &OverviewOptions {
        &self.overview
    }

    pub(crate) fn set_initial_view_state(&mut self, initial_view_state: InitialViewState) {
        self.initial_view_state = initial_view_state;
    }

    pub(crate) fn set_selection_state(
        &mut self,
        current: Option<Selection>,
        incoming: Option<Selection>,
        on_viewport_load: Option<ViewportLoadSignal>,
    ) {
        self.loader_selection = current;
        self.new_loader_selection = incoming;
        self.on_viewport_load = on_viewport_load;
    }

    fn layer_config(&self, loader: Arc<dyn Loader>) -> LayerConfig {
        LayerConfig {
            loader,
            channels: self.channels.clone(),
            colormap: self.colormap.clone(),
            loader_selection: self.loader_selection.clone(),
            new_loader_selection: self.new_loader_selection.clone(),
            transition_fields: self.transition_fields.clone(),
            on_viewport_load: self.on_viewport_load.clone(),
        }
    }

    /// Build the views and their layer configuration.
    ///
    /// Without a loader the scene is empty. The overview is added only when enabled, and
    /// receives the same configuration as the detail view.
    #[tracing::instrument(skip(self), fields(overview_on = self.overview_on))]
    pub fn compose(&self) -> SceneDescription {
        let Some(loader) = &self.loader else {
            tracing::debug!("no loader; composing an empty scene");
            return SceneDescription::default();
        };

        let detail = DetailView::new(ViewportState::from_initial(
            &self.initial_view_state,
            DETAIL_VIEW_ID,
        ));
        let props = self.layer_config(loader.clone());

        let mut views = Vec::with_capacity(2);
        let mut layer_props = Vec::with_capacity(2);

        if self.overview_on {
            let overview = OverviewView::new(
                ViewportState::from_initial(&self.initial_view_state, OVERVIEW_VIEW_ID),
                loader.metadata(),
                detail.width(),
                detail.height(),
                self.overview.clone(),
            );
            views.push(View::Detail(detail));
            views.push(View::Overview(overview));
            layer_props.push(props.clone());
            layer_props.push(props);
        } else {
            views.push(View::Detail(detail));
            layer_props.push(props);
        }

        tracing::debug!(views = views.len(), "scene composed");
        SceneDescription { views, layer_props }
    }

    /// Compose and draw one frame from the initial view states.
    ///
    /// Returns `false` without calling `renderer` when there is no loader.
    #[tracing::instrument(skip(self, renderer))]
    pub fn render<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) -> TileviewResult<bool> {
        let scene = self.compose();
        if scene.is_empty() {
            return Ok(false);
        }
        let view_states = scene.initial_view_states();
        let layers = scene.produce_layers(&view_states)?;
        renderer.render(&scene.frame(&view_states, &layers))?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewer/pip.rs"]
mod tests;
