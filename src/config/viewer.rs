use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use crate::{
    config::loader::SyntheticLoaderSpec,
    foundation::error::{TileviewError, TileviewResult},
    layers::config::ChannelSettings,
    loader::source::Loader,
    selection::model::{Selection, default_transition_fields},
    viewer::pip::PictureInPictureViewer,
    views::overview::OverviewOptions,
    views::viewport::InitialViewState,
};

/// JSON boundary object describing one picture-in-picture viewer.
///
/// Field names are snake_case; the camelCase spellings used by web front-ends are accepted as
/// aliases.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewerConfig {
    /// Per-channel tints, ramps and visibility.
    #[serde(flatten)]
    pub channels: ChannelSettings,
    /// Colormap name; empty means none.
    #[serde(default)]
    pub colormap: String,
    /// Planes to show.
    #[serde(default, alias = "loaderSelection")]
    pub loader_selection: Option<Selection>,
    /// Selection fields summarized in image layer ids.
    #[serde(default = "default_transition_fields", alias = "transitionFields")]
    pub transition_fields: Vec<String>,
    /// Show the picture-in-picture overview.
    #[serde(default, alias = "overviewOn")]
    pub overview_on: bool,
    /// Overview options; omitted fields keep their defaults.
    #[serde(default)]
    pub overview: OverviewOptions,
    /// Initial viewport of the detail view.
    #[serde(alias = "initialViewState")]
    pub initial_view_state: InitialViewState,
    /// Generated source to view; absent means no image is loaded yet.
    #[serde(default)]
    pub loader: Option<SyntheticLoaderSpec>,
}

impl ViewerConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TileviewResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TileviewError::serde(format!("parse viewer config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TileviewResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TileviewError::validation(format!("open viewer config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check configuration invariants.
    pub fn validate(&self) -> TileviewResult<()> {
        self.channels.validate()?;
        self.overview.validate()?;

        let ivs = &self.initial_view_state;
        if !(ivs.width.is_finite() && ivs.height.is_finite() && ivs.width > 0.0 && ivs.height > 0.0)
        {
            return Err(TileviewError::validation(
                "initial_view_state width/height must be finite and > 0",
            ));
        }
        if !ivs.target.is_finite() || !ivs.zoom.is_finite() {
            return Err(TileviewError::validation(
                "initial_view_state target/zoom must be finite",
            ));
        }
        if self.transition_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(TileviewError::validation(
                "transition_fields must not contain empty names",
            ));
        }
        if let Some(selection) = &self.loader_selection {
            if selection.is_empty() {
                return Err(TileviewError::validation(
                    "loader_selection must contain at least one plane",
                ));
            }
            if !self.channels.is_empty() && selection.len() != self.channels.len() {
                return Err(TileviewError::validation(format!(
                    "loader_selection has {} planes but {} channels are configured",
                    selection.len(),
                    self.channels.len()
                )));
            }
        }
        if let Some(loader) = &self.loader {
            loader.validate()?;
        }
        Ok(())
    }

    /// Build the configured source, if any.
    pub fn build_loader(&self) -> TileviewResult<Option<Arc<dyn Loader>>> {
        self.loader.as_ref().map(SyntheticLoaderSpec::build).transpose()
    }

    /// Validate, build the source and assemble the viewer.
    pub fn into_viewer(self) -> TileviewResult<PictureInPictureViewer> {
        self.validate()?;
        let loader = self.build_loader()?;
        let colormap = Some(self.colormap).filter(|c| !c.is_empty());
        Ok(
            PictureInPictureViewer::new(loader, self.initial_view_state)
                .with_channels(self.channels)
                .with_colormap(colormap)
                .with_selection(self.loader_selection)
                .with_transition_fields(self.transition_fields)
                .with_overview(self.overview_on, self.overview),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/viewer.rs"]
mod tests;
