//! Trellis Application Shell
//!
//! Entry point for applications embedding a Trellis view tree.
//!
//! # Example
//!
//! ```ignore
//! use trellis_app::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load(Path::new("."))?;
//!     trellis_app::logging::init(&config.logging.filter);
//!
//!     let mut app = TrellisApp::with_config(toolkit, &config);
//!     app.mark_ready();
//!
//!     let window = app.new_window(Size::new(800.0, 600.0))?;
//!     let root = app.new_container()?;
//!     app.tree_mut().set_window_content_view(window, root);
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod error;
pub mod logging;

pub use app::{TreeMut, TrellisApp};
pub use config::AppConfig;
pub use error::{AppError, Result};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::TrellisApp;
    pub use crate::config::AppConfig;
    pub use crate::error::{AppError, Result};

    pub use trellis_core::{Color, Point, Rect, Size, ViewId, WindowId};
    pub use trellis_views::{Attachment, Axis, ScrollbarMode, StyleValue, ViewTree};
}
