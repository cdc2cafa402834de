//! Trellis Views
//!
//! Native view tree with flexbox layout:
//!
//! - **View**: a plain native widget with bounds, visibility, focus and
//!   background color
//! - **Container**: an ordered list of child views laid out with flexbox
//! - **Scroll**: a viewport around a single content view
//! - **WebContentView**: a view hosting embedded web content
//!
//! All views live in a [`ViewTree`] arena parameterised over the native
//! toolkit. Every structural change keeps three trees in step: the model
//! (parent and child references), the Taffy layout tree and the native
//! widget tree.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_views::ViewTree;
//!
//! let mut tree = ViewTree::new(toolkit);
//! let root = tree.create_container()?;
//! let child = tree.create_view()?;
//! tree.set_style_property(child, "flex", 1.0)?;
//! tree.add_child(root, child);
//! ```

mod consistency;
mod container;
pub mod error;
mod layout;
mod node;
mod scroll;
mod tree;
mod view;
mod web_content;
mod window;

pub use error::{Result, ViewError};
pub use node::Attachment;
pub use tree::ViewTree;

pub use trellis_core::{Color, Point, Rect, Size, Vector2, ViewId, WindowId};
pub use trellis_layout::{LayoutConfig, StyleError, StyleValue};
pub use trellis_platform::{Axis, ContentId, HostedContent, NativeToolkit, ScrollbarMode};
