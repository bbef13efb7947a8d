/// Convenience result type used across tileview.
pub type TileviewResult<T> = Result<T, TileviewError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The composition engine itself degrades silently (missing loader, missing selection, unusable
/// calibration). Errors surface only from configuration, loaders and the overview's dependency on
/// a detail view state.
#[derive(thiserror::Error, Debug)]
pub enum TileviewError {
    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Tile or raster fetch failures reported by a [`crate::Loader`].
    #[error("loader error: {0}")]
    Loader(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TileviewError {
    /// Build a [`TileviewError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TileviewError::Loader`] value.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::Loader(msg.into())
    }

    /// Build a [`TileviewError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
