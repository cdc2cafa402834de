//! Trellis Headless Platform
//!
//! In-memory widget toolkit for tests and tooling. It reproduces the
//! behavior that matters to the view tree for two native toolkits:
//! AppKit-style (boolean scrollers, reference-counted widgets) and
//! Views-style (three-level scrollbar modes, parent-owned widgets).

pub mod content;
pub mod toolkit;

pub use content::HeadlessContent;
pub use toolkit::{HeadlessToolkit, ToolkitFlavor};
