use crate::{
    foundation::error::TileviewResult,
    layers::config::LayerConfig,
    layers::ids::{image_layer_id, scale_bar_layer_id},
    layers::layer::{
        ImageLayer, ImageProps, MultiscaleImageLayer, RenderLayer, SCALE_BAR_LENGTH,
        ScaleBarLayer, ScaleBarPosition,
    },
    views::view::{OVERVIEW_VIEW_ID, ViewBehavior, ViewPlacement, accept_own_update},
    views::viewport::{ViewStates, ViewportState},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Primary full-canvas view.
///
/// Draws the selected planes (two layers while a pyramid transition is in flight) plus a scale
/// bar when the loader is calibrated. Follows pan targets emitted by the overview.
pub struct DetailView {
    initial_view_state: ViewportState,
}

impl DetailView {
    /// Build from a seeded state; its id becomes the view id.
    pub fn new(initial_view_state: ViewportState) -> Self {
        Self { initial_view_state }
    }

    /// View width in pixels.
    pub fn width(&self) -> f64 {
        self.initial_view_state.width
    }

    /// View height in pixels.
    pub fn height(&self) -> f64 {
        self.initial_view_state.height
    }

    fn image_layers(&self, props: &LayerConfig) -> Vec<RenderLayer> {
        let id = self.id();
        let loader = &props.loader;
        let kind = &loader.metadata().kind;
        let fields = &props.transition_fields;

        if !loader.metadata().is_pyramid {
            return vec![RenderLayer::Image(ImageLayer {
                id: image_layer_id(kind, id, None, fields),
                viewport_id: id.to_string(),
                loader: loader.clone(),
                props: ImageProps::from_config(props, props.loader_selection.as_ref()),
            })];
        }

        // Always emit the current layer, even without a selection.
        let current_selection = props.loader_selection.as_ref();
        let mut current = MultiscaleImageLayer::new(
            image_layer_id(kind, id, current_selection, fields),
            id,
            loader.clone(),
            ImageProps::from_config(props, current_selection),
        );

        let Some(selection) = props.new_loader_selection.as_ref() else {
            return vec![RenderLayer::MultiscaleImage(current)];
        };
        let incoming_id = image_layer_id(kind, id, Some(selection), fields);
        if incoming_id == current.id {
            // Shares the current id; the one layer shows the incoming planes.
            tracing::trace!(layer = %incoming_id, "incoming selection replaces current planes");
            current.props = ImageProps::from_config(props, Some(selection));
            current.on_viewport_load = props.on_viewport_load.clone();
            return vec![RenderLayer::MultiscaleImage(current)];
        }

        let incoming = MultiscaleImageLayer::new(
            incoming_id,
            id,
            loader.clone(),
            ImageProps::from_config(props, Some(selection)),
        )
        .incoming(props.on_viewport_load.clone());
        vec![
            RenderLayer::MultiscaleImage(current),
            RenderLayer::MultiscaleImage(incoming),
        ]
    }
}

impl ViewBehavior for DetailView {
    fn id(&self) -> &str {
        &self.initial_view_state.id
    }

    fn initial_view_state(&self) -> &ViewportState {
        &self.initial_view_state
    }

    fn placement(&self) -> ViewPlacement {
        ViewPlacement {
            x: 0.0,
            y: 0.0,
            width: self.width(),
            height: self.height(),
        }
    }

    fn produce_layers(
        &self,
        props: &LayerConfig,
        view_states: &ViewStates,
    ) -> TileviewResult<Vec<RenderLayer>> {
        let mut layers = self.image_layers(props);

        if let Some(physical) = props.loader.metadata().horizontal_physical_size() {
            let view_state = view_states
                .get(self.id())
                .unwrap_or(&self.initial_view_state)
                .with_size(self.width(), self.height());
            layers.push(RenderLayer::ScaleBar(ScaleBarLayer {
                id: scale_bar_layer_id(self.id()),
                viewport_id: self.id().to_string(),
                unit: physical.unit.clone(),
                size: physical.value,
                view_state,
                position: ScaleBarPosition::BottomRight,
                length: SCALE_BAR_LENGTH,
            }));
        }

        Ok(layers)
    }

    fn filter_view_state(
        &self,
        update: &ViewportState,
        current: &ViewportState,
    ) -> Option<ViewportState> {
        if update.id == OVERVIEW_VIEW_ID && update.target.is_finite() {
            return Some(current.with_target(update.target));
        }
        accept_own_update(self.id(), update)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/views/detail.rs"]
mod tests;
