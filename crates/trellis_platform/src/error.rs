//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The native widget was destroyed or never existed
    #[error("Native widget is no longer alive")]
    StaleWidget,

    /// Failed to create a native widget
    #[error("Widget creation failed: {0}")]
    WidgetCreation(String),

    /// Child list operation rejected by the toolkit
    #[error("Invalid child operation: {0}")]
    InvalidChild(String),

    /// Widget is not of the kind the operation needs
    #[error("Wrong widget kind: expected {0}")]
    WrongKind(&'static str),

    /// Feature not available on this platform
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
