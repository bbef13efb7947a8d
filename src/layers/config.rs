use std::sync::Arc;

use crate::{
    foundation::core::Rgb8,
    foundation::error::{TileviewError, TileviewResult},
    loader::source::Loader,
    selection::model::Selection,
    selection::transition::ViewportLoadSignal,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Per-channel display settings, index-aligned with the selection's planes.
pub struct ChannelSettings {
    /// Tint per channel.
    #[serde(default, alias = "colorValues")]
    pub color_values: Vec<Rgb8>,
    /// Intensity ramp `[begin, end]` per channel.
    #[serde(default, alias = "sliderValues")]
    pub slider_values: Vec<[f64; 2]>,
    /// Visibility per channel.
    #[serde(default, alias = "channelIsOn")]
    pub channel_is_on: Vec<bool>,
}

impl ChannelSettings {
    /// Number of configured channels.
    pub fn len(&self) -> usize {
        self.color_values.len()
    }

    /// Return `true` when no channel is configured.
    pub fn is_empty(&self) -> bool {
        self.color_values.is_empty()
    }

    /// Indices of channels switched on.
    pub fn visible_channels(&self) -> impl Iterator<Item = usize> + '_ {
        self.channel_is_on
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
    }

    /// Check that the per-channel arrays line up and ramps are well formed.
    pub fn validate(&self) -> TileviewResult<()> {
        let n = self.color_values.len();
        if self.slider_values.len() != n || self.channel_is_on.len() != n {
            return Err(TileviewError::validation(format!(
                "channel arrays must have equal length (colors={n}, sliders={}, visibility={})",
                self.slider_values.len(),
                self.channel_is_on.len()
            )));
        }
        for (i, [begin, end]) in self.slider_values.iter().enumerate() {
            if !begin.is_finite() || !end.is_finite() || begin > end {
                return Err(TileviewError::validation(format!(
                    "slider_values[{i}] must be finite with begin <= end"
                )));
            }
        }
        Ok(())
    }
}

/// Rendering configuration shared by the views of one viewer.
///
/// Equality compares values, and the loader and load signal by identity.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    /// Image source.
    pub loader: Arc<dyn Loader>,
    /// Per-channel display settings.
    pub channels: ChannelSettings,
    /// Optional colormap name; replaces channel tints when set.
    pub colormap: Option<String>,
    /// Selection currently on screen.
    pub loader_selection: Option<Selection>,
    /// Selection being loaded during a transition.
    pub new_loader_selection: Option<Selection>,
    /// Selection fields summarized in image layer ids.
    pub transition_fields: Vec<String>,
    /// Fired by the renderer once the incoming layer is fully loaded.
    pub on_viewport_load: Option<ViewportLoadSignal>,
}

impl LayerConfig {
    /// Configuration with default display settings and no selection.
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        Self {
            loader,
            channels: ChannelSettings::default(),
            colormap: None,
            loader_selection: None,
            new_loader_selection: None,
            transition_fields: Vec::new(),
            on_viewport_load: None,
        }
    }

    /// Set channel settings.
    pub fn with_channels(mut self, channels: ChannelSettings) -> Self {
        self.channels = channels;
        self
    }

    /// Set the current selection.
    pub fn with_selection(mut self, selection: Option<Selection>) -> Self {
        self.loader_selection = selection;
        self
    }

    /// Set the incoming selection and the signal its layer fires when loaded.
    pub fn with_incoming(
        mut self,
        selection: Option<Selection>,
        on_viewport_load: Option<ViewportLoadSignal>,
    ) -> Self {
        self.new_loader_selection = selection;
        self.on_viewport_load = on_viewport_load;
        self
    }

    /// Set the transition fields.
    pub fn with_transition_fields(mut self, fields: Vec<String>) -> Self {
        self.transition_fields = fields;
        self
    }
}

impl PartialEq for LayerConfig {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.loader, &other.loader)
            && self.channels == other.channels
            && self.colormap == other.colormap
            && self.loader_selection == other.loader_selection
            && self.new_loader_selection == other.new_loader_selection
            && self.transition_fields == other.transition_fields
            && self.on_viewport_load == other.on_viewport_load
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/config.rs"]
mod tests;
