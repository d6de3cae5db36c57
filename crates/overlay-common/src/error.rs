//! Error types for the raster overlay pipeline.

use thiserror::Error;

/// Result type alias using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Primary error type for overlay rendering.
///
/// A failure of any variant is terminal for the single layer it occurred in;
/// the compositor records it and moves on to the next layer.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The dataset is missing or could not be read as a georeferenced raster.
    #[error("Data source error for '{path}': {message}")]
    DataSource { path: String, message: String },

    /// Malformed data, stretch or encoding failure.
    #[error("Processing error: {0}")]
    Processing(String),

    /// Unregistered palette or out-of-range configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The overlay could not be attached to the map view.
    #[error("Render error: {0}")]
    Render(String),
}

impl OverlayError {
    pub fn data_source(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Name of the error category, as shown to users next to failed layers.
    pub fn category(&self) -> &'static str {
        match self {
            OverlayError::DataSource { .. } => "DataSourceError",
            OverlayError::Processing(_) => "ProcessingError",
            OverlayError::Config(_) => "ConfigError",
            OverlayError::Render(_) => "RenderError",
        }
    }
}

// Bare I/O failures inside the pipeline happen after the dataset was opened
// (artifact writes), so they count as processing failures.
impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self {
        OverlayError::Processing(err.to_string())
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        OverlayError::Render(format!("JSON error: {}", err))
    }
}
