//! View tree error types

use thiserror::Error;
use trellis_layout::StyleError;
use trellis_platform::PlatformError;

/// Errors reported by the view tree.
///
/// Most structural mutations log and do nothing instead of returning these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("view does not exist")]
    UnknownView,

    #[error("failed to create layout node")]
    Layout,

    #[error("Given web content is not attached to this container")]
    ContentNotAttached,

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("view tree is inconsistent: {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
