//! Embedded web content hosted inside a view.
//!
//! The content object belongs to application code; views only keep a weak
//! reference to it and forward window ownership, bounds and unload requests.

use trellis_core::{Rect, WindowId};

/// Stable identifier for a hosted content instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContentId(pub u64);

/// Web content that can be embedded in a view tree.
///
/// All methods take `&self`; implementations keep their mutable state behind
/// interior mutability since the view tree only holds weak references.
pub trait HostedContent {
    /// Get the stable content identifier.
    fn id(&self) -> ContentId;

    /// Window that currently hosts this content, if any.
    fn owner_window(&self) -> Option<WindowId>;

    /// Called whenever the hosting view joins, leaves or moves between windows.
    fn set_owner_window(&self, window: Option<WindowId>);

    /// Update the content bounds, relative to its hosting view.
    fn set_bounds(&self, bounds: Rect);

    /// Bounds most recently given to the content.
    fn last_bounds(&self) -> Rect;

    /// Record a user gesture so unload handlers are allowed to run.
    fn notify_user_activation(&self);

    /// Whether the page registered a before-unload handler.
    fn needs_before_unload(&self) -> bool;

    /// Run the page's before-unload handler.
    fn dispatch_before_unload(&self);
}
