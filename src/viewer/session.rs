use crate::{
    foundation::core::Point,
    foundation::error::{TileviewError, TileviewResult},
    layers::layer::RenderLayer,
    selection::model::Selection,
    selection::transition::TransitionState,
    viewer::pip::PictureInPictureViewer,
    viewer::scene::{SceneDescription, SceneFrame, SceneRenderer},
    views::view::{DETAIL_VIEW_ID, OVERVIEW_VIEW_ID, ViewBehavior},
    views::viewport::{InitialViewState, ViewStates, ViewportState},
};

/// Frame loop state of a [`PictureInPictureViewer`].
///
/// Owns the latest state of every view and the selection transition, redistributes viewport
/// updates through each view's filter and recomposes the scene when inputs change.
#[derive(Debug)]
pub struct ViewerSession {
    viewer: PictureInPictureViewer,
    scene: SceneDescription,
    view_states: ViewStates,
    transition: TransitionState,
}

impl ViewerSession {
    /// Start a session; every view begins at its initial state.
    ///
    /// An incoming selection on `viewer` starts a transition owned by the session.
    #[tracing::instrument(skip(viewer))]
    pub fn new(viewer: PictureInPictureViewer) -> Self {
        let transition = TransitionState::new(
            viewer.loader_selection().cloned(),
            viewer.transition_fields().to_vec(),
        );
        let incoming = viewer.new_loader_selection().cloned();
        let scene = viewer.compose();
        let view_states = scene.initial_view_states();

        let mut session = Self {
            viewer,
            scene,
            view_states,
            transition,
        };
        if let Some(selection) = incoming {
            session.switch_selection(selection);
        }
        session.sync_selection();
        session
    }

    /// Viewer inputs.
    pub fn viewer(&self) -> &PictureInPictureViewer {
        &self.viewer
    }

    /// Current views and layer configuration.
    pub fn scene(&self) -> &SceneDescription {
        &self.scene
    }

    /// Latest state of every view.
    pub fn view_states(&self) -> &ViewStates {
        &self.view_states
    }

    /// Latest state of view `id`.
    pub fn view_state(&self, id: &str) -> Option<&ViewportState> {
        self.view_states.get(id)
    }

    /// Selection transition.
    pub fn transition(&self) -> &TransitionState {
        &self.transition
    }

    /// Layers of every view for the next frame.
    pub fn layers(&self) -> TileviewResult<Vec<Vec<RenderLayer>>> {
        self.scene.produce_layers(&self.view_states)
    }

    /// Borrow a frame over precomputed `layers`.
    pub fn frame<'a>(&'a self, layers: &'a [Vec<RenderLayer>]) -> SceneFrame<'a> {
        self.scene.frame(&self.view_states, layers)
    }

    /// Draw the next frame. Returns `false` without calling `renderer` when there is no loader.
    #[tracing::instrument(skip(self, renderer))]
    pub fn render<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) -> TileviewResult<bool> {
        if self.scene.is_empty() {
            return Ok(false);
        }
        let layers = self.layers()?;
        renderer.render(&self.frame(&layers))?;
        Ok(true)
    }

    /// Redistribute a viewport change reported for `view_id` to every view.
    ///
    /// Returns the ids of views whose state changed.
    #[tracing::instrument(skip(self, state))]
    pub fn on_view_state_change(&mut self, view_id: &str, state: ViewportState) -> Vec<String> {
        let update = state.with_id(view_id);
        let mut changed = Vec::new();

        for view in &self.scene.views {
            let current = self
                .view_states
                .get(view.id())
                .unwrap_or_else(|| view.initial_view_state());
            match view.filter_view_state(&update, current) {
                Some(next) if &next != current => {
                    changed.push(view.id().to_string());
                    self.view_states.insert(next.with_id(view.id()));
                }
                Some(_) => {}
                None => {
                    tracing::trace!(view = view.id(), origin = view_id, "viewport update rejected");
                }
            }
        }
        changed
    }

    /// Switch to `selection`.
    ///
    /// Pyramidal sources keep the current planes on screen and load the new ones next to them,
    /// superseding any transition in flight. Flat sources switch immediately. Returns `true` when
    /// a transition started.
    #[tracing::instrument(skip(self, selection))]
    pub fn set_selection(&mut self, selection: Selection) -> bool {
        let started = self.switch_selection(selection);
        self.sync_selection();
        started
    }

    /// Collapse the transition once the incoming layer reported its viewport loaded.
    ///
    /// Returns `true` when the incoming selection became current.
    pub fn poll_transition(&mut self) -> bool {
        let completed = self.transition.poll_complete();
        if completed {
            self.sync_selection();
        }
        completed
    }

    /// Rebuild the views for a new canvas size, keeping the detail pan and zoom.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, width: f64, height: f64) -> TileviewResult<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(TileviewError::validation(format!(
                "viewer size must be positive, got {width}x{height}"
            )));
        }

        let base = *self.viewer.initial_view_state();
        let (target, zoom) = self
            .view_states
            .get(DETAIL_VIEW_ID)
            .map_or((base.target, base.zoom), |s| (s.target, s.zoom));
        self.viewer.set_initial_view_state(InitialViewState {
            target,
            zoom,
            width,
            height,
        });
        self.scene = self.viewer.compose();
        self.view_states = self.scene.initial_view_states();
        Ok(())
    }

    /// Simulate a click at `overview_pixel` inside the overview.
    ///
    /// Returns the ids of views whose state changed.
    pub fn pan_from_overview(&mut self, overview_pixel: Point) -> TileviewResult<Vec<String>> {
        let update = self
            .scene
            .view(OVERVIEW_VIEW_ID)
            .and_then(|v| v.as_overview())
            .map(|overview| overview.pan_detail_to(overview_pixel))
            .ok_or_else(|| TileviewError::validation("overview is not enabled"))?;
        Ok(self.on_view_state_change(OVERVIEW_VIEW_ID, update))
    }

    fn switch_selection(&mut self, selection: Selection) -> bool {
        let pyramid = self
            .viewer
            .loader()
            .is_some_and(|loader| loader.metadata().is_pyramid);
        if pyramid {
            self.transition.begin(selection)
        } else {
            self.transition.replace(Some(selection));
            false
        }
    }

    fn sync_selection(&mut self) {
        self.viewer.set_selection_state(
            self.transition.current().cloned(),
            self.transition.incoming().cloned(),
            self.transition.signal().cloned(),
        );
        self.scene = self.viewer.compose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewer/session.rs"]
mod tests;
