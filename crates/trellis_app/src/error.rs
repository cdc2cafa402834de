//! Error types for the application shell

use thiserror::Error;
use trellis_views::ViewError;

/// Application shell errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot create {class} before app is ready")]
    NotReady { class: &'static str },

    #[error("No view ids left to hand out")]
    IdsExhausted,

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Result type alias for application shell operations
pub type Result<T> = std::result::Result<T, AppError>;
