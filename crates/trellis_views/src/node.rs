//! View and window records stored in the tree arenas

use std::rc::{Rc, Weak};

use trellis_core::{Color, Size, ViewId, WindowId};
use trellis_layout::LayoutNodeId;
use trellis_platform::{HostedContent, NativeHandle, WidgetKind};

/// How a view is currently held in the tree
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Attachment {
    /// No parent, no window
    #[default]
    Unattached,
    /// Child of a container, inheriting its window
    Child,
    /// Content view of a scroll container
    ContentView,
    /// Root content view of a window; has a window but no parent
    WindowContent,
}

/// What kind of view a node is, with the state that kind carries
pub(crate) enum ViewKind {
    Leaf,
    Container {
        children: Vec<ViewId>,
        dirty: bool,
    },
    Scroll {
        content: Option<ViewId>,
        content_size: Size,
    },
    WebContent {
        content: Option<Weak<dyn HostedContent>>,
    },
}

impl ViewKind {
    pub(crate) fn class_name(&self) -> &'static str {
        match self {
            ViewKind::Leaf => "View",
            ViewKind::Container { .. } => "Container",
            ViewKind::Scroll { .. } => "Scroll",
            ViewKind::WebContent { .. } => "WebContentView",
        }
    }

    pub(crate) fn widget_kind(&self) -> WidgetKind {
        match self {
            ViewKind::Leaf => WidgetKind::View,
            ViewKind::Container { .. } => WidgetKind::Container,
            ViewKind::Scroll { .. } => WidgetKind::Scroll,
            ViewKind::WebContent { .. } => WidgetKind::WebContent,
        }
    }

    /// Views directly owned by this one: container children or scroll content
    pub(crate) fn owned_views(&self) -> Vec<ViewId> {
        match self {
            ViewKind::Container { children, .. } => children.clone(),
            ViewKind::Scroll {
                content: Some(content),
                ..
            } => vec![*content],
            _ => Vec::new(),
        }
    }

    pub(crate) fn hosted(&self) -> Option<Rc<dyn HostedContent>> {
        match self {
            ViewKind::WebContent {
                content: Some(content),
            } => content.upgrade(),
            _ => None,
        }
    }
}

pub(crate) struct ViewNode {
    pub kind: ViewKind,
    /// `None` once the native widget has been destroyed
    pub handle: Option<NativeHandle>,
    pub layout_node: LayoutNodeId,
    pub parent: Option<ViewId>,
    pub window: Option<WindowId>,
    pub attachment: Attachment,
    pub visible: bool,
    pub focusable: bool,
    pub background: Option<Color>,
    /// Whether destroying this view must destroy its native widget
    pub delete_native: bool,
    /// Whether application code still holds this view
    pub held: bool,
}

impl ViewNode {
    pub(crate) fn new(kind: ViewKind, handle: NativeHandle, layout_node: LayoutNodeId) -> Self {
        Self {
            kind,
            handle: Some(handle),
            layout_node,
            parent: None,
            window: None,
            attachment: Attachment::Unattached,
            visible: true,
            focusable: false,
            background: None,
            delete_native: true,
            held: true,
        }
    }

    pub(crate) fn is_container(&self) -> bool {
        matches!(self.kind, ViewKind::Container { .. })
    }
}

pub(crate) struct WindowState {
    pub handle: Option<NativeHandle>,
    pub content: Option<ViewId>,
    pub content_size: Size,
}
