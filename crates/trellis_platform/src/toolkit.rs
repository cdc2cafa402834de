//! Native widget toolkit bridge
//!
//! A [`NativeToolkit`] owns the platform widgets and exposes the handful of
//! operations the view tree needs: create and destroy widgets, move and show
//! them, and edit their child lists. The view tree is the only caller allowed
//! to touch native child lists, and it always does so in lockstep with its own
//! model and the layout tree.

use slotmap::new_key_type;
use trellis_core::{Color, Point, Rect, Size};

use crate::error::Result;
use crate::scroll::{Axis, ScrollFlag, ScrollbarMode};

new_key_type! {
    /// Opaque handle of a native widget
    pub struct NativeHandle;
}

/// Kind of native widget to create
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Plain leaf widget
    View,
    /// Widget whose children are laid out by the view tree
    Container,
    /// Scrolling viewport with a single document widget
    Scroll,
    /// Host surface for embedded web content
    WebContent,
    /// Top-level window root
    Window,
}

impl WidgetKind {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::View => "view",
            WidgetKind::Container => "container",
            WidgetKind::Scroll => "scroll",
            WidgetKind::WebContent => "web content",
            WidgetKind::Window => "window",
        }
    }
}

/// Notifications raised by the toolkit itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolkitEvent {
    /// The widget was deleted by the platform, not through the view tree
    WidgetDestroyed(NativeHandle),
}

/// Capability interface implemented once per platform.
///
/// Every method taking a handle fails with
/// [`PlatformError::StaleWidget`](crate::PlatformError::StaleWidget) when the
/// widget is gone. Scroll-specific methods fail with
/// [`PlatformError::Unsupported`](crate::PlatformError::Unsupported) when the
/// platform has no equivalent of the feature.
pub trait NativeToolkit {
    /// Short platform name, used in log output
    fn name(&self) -> &'static str;

    /// Whether inserting a widget into a native parent hands its lifetime to
    /// that parent. When true, a removed child must be deleted by its view.
    fn parent_owns_children(&self) -> bool;

    fn create_widget(&mut self, kind: WidgetKind) -> Result<NativeHandle>;

    /// Destroy a widget and every native child it owns
    fn destroy_widget(&mut self, widget: NativeHandle) -> Result<()>;

    fn is_alive(&self, widget: NativeHandle) -> bool;

    fn kind(&self, widget: NativeHandle) -> Result<WidgetKind>;

    fn set_bounds(&mut self, widget: NativeHandle, bounds: Rect) -> Result<()>;

    fn bounds(&self, widget: NativeHandle) -> Result<Rect>;

    fn set_visible(&mut self, widget: NativeHandle, visible: bool) -> Result<()>;

    fn is_visible(&self, widget: NativeHandle) -> Result<bool>;

    fn set_focusable(&mut self, widget: NativeHandle, focusable: bool) -> Result<()>;

    fn is_focusable(&self, widget: NativeHandle) -> Result<bool>;

    fn focus(&mut self, widget: NativeHandle) -> Result<()>;

    fn has_focus(&self, widget: NativeHandle) -> Result<bool>;

    fn set_background(&mut self, widget: NativeHandle, color: Color) -> Result<()>;

    fn background(&self, widget: NativeHandle) -> Result<Option<Color>>;

    /// Insert `child` into `parent`'s child list at `index`
    fn insert_child(&mut self, parent: NativeHandle, child: NativeHandle, index: usize)
        -> Result<()>;

    fn remove_child(&mut self, parent: NativeHandle, child: NativeHandle) -> Result<()>;

    /// Move an existing child to the end of its parent's child list in a
    /// single step, without detaching it in between
    fn reorder_child_to_top(&mut self, parent: NativeHandle, child: NativeHandle) -> Result<()>;

    fn children(&self, parent: NativeHandle) -> Result<Vec<NativeHandle>>;

    /// Set or clear the single document widget of a scroll viewport
    fn set_document(&mut self, scroll: NativeHandle, document: Option<NativeHandle>) -> Result<()>;

    fn document(&self, scroll: NativeHandle) -> Result<Option<NativeHandle>>;

    fn set_scroll_content_size(&mut self, scroll: NativeHandle, size: Size) -> Result<()>;

    fn set_scrollbar_mode(
        &mut self,
        scroll: NativeHandle,
        axis: Axis,
        mode: ScrollbarMode,
    ) -> Result<()>;

    /// Mode as read back from the native widget, which may be lossy
    fn scrollbar_mode(&self, scroll: NativeHandle, axis: Axis) -> Result<ScrollbarMode>;

    fn set_scroll_offset(&mut self, scroll: NativeHandle, offset: Point) -> Result<()>;

    fn scroll_offset(&self, scroll: NativeHandle) -> Result<Point>;

    /// Part of the document currently shown, in document coordinates
    fn visible_rect(&self, scroll: NativeHandle) -> Result<Rect>;

    fn clip_height_to(&mut self, scroll: NativeHandle, min_height: f32, max_height: f32)
        -> Result<()>;

    /// Current `(min, max)` height clip
    fn height_clip(&self, scroll: NativeHandle) -> Result<(f32, f32)>;

    fn set_scroll_flag(&mut self, scroll: NativeHandle, flag: ScrollFlag, enabled: bool)
        -> Result<()>;

    fn scroll_flag(&self, scroll: NativeHandle, flag: ScrollFlag) -> Result<bool>;

    /// Drain the events raised since the last call
    fn take_events(&mut self) -> Vec<ToolkitEvent>;
}
