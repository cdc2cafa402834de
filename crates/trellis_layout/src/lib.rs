//! Trellis Layout Adapter
//!
//! Every view owns one layout node. Containers insert their children's nodes
//! in the same order as their native children, so the layout tree mirrors the
//! view tree and Taffy can turn flexbox styles into concrete bounds.

pub mod property;
pub mod style;
pub mod tree;

pub use property::{normalize_name, StyleError, StyleValue};
pub use style::{LayoutConfig, LayoutStyle};
pub use tree::{LayoutNodeId, LayoutTree};
