//! Error types for the portfolio renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading content, rendering or previewing a page
///
/// Image load failures are deliberately absent: they are resolved by the
/// card fallback and never surface as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration or content file
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to load a document into the preview engine
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Navigation to an anchor failed
    #[error("Navigation failed: {0}")]
    NavigationError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a content or config file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
