use docview_render_core::RenderError;
use docview_traits::{ParseError, SurfaceError};
use thiserror::Error;

/// Failure of one load cycle. Terminal for that cycle only.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document: {0}")]
    Parse(#[from] ParseError),

    #[error("Document source is empty")]
    EmptySource,

    /// A newer load started before this one finished; its results were dropped.
    #[error("Load superseded by a newer request")]
    Superseded,

    #[error("Load task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for LoadError {
    fn from(e: tokio::task::JoinError) -> Self {
        LoadError::Task(e.to_string())
    }
}

/// Failure of a print, download or share action. Never touches the view.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("No document is loaded")]
    NoDocument,

    #[error("Export failed: {0}")]
    Export(#[from] RenderError),

    #[error("Delivery failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Export task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ActionError {
    fn from(e: tokio::task::JoinError) -> Self {
        ActionError::Task(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
