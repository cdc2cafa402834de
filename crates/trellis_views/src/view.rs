//! Operations shared by every view

use trellis_core::{Color, Rect, Vector2, ViewId, WindowId};
use trellis_platform::NativeToolkit;

use crate::node::Attachment;
use crate::tree::ViewTree;

impl<T: NativeToolkit> ViewTree<T> {
    /// Set the native bounds of a view, relative to its parent.
    ///
    /// Does not touch the layout tree. A container whose size changes lays
    /// out its children again; a web content wrapper resizes its content.
    pub fn set_bounds(&mut self, view: ViewId, bounds: Rect) -> bool {
        let Some(handle) = self.live_handle(view) else {
            tracing::trace!(?view, "set_bounds on a view without a native widget");
            return false;
        };
        let previous = self.toolkit.bounds(handle).unwrap_or_default();
        if let Err(err) = self.toolkit.set_bounds(handle, bounds) {
            tracing::warn!(?view, "failed to set bounds: {err}");
            return false;
        }

        if let Some(content) = self.views.get(view).and_then(|node| node.kind.hosted()) {
            content.set_bounds(bounds.local());
        }
        if previous.size != bounds.size {
            self.on_size_changed(view);
        }
        true
    }

    pub fn bounds(&self, view: ViewId) -> Rect {
        self.live_handle(view)
            .and_then(|handle| self.toolkit.bounds(handle).ok())
            .unwrap_or_default()
    }

    /// Show or hide a view.
    ///
    /// Hidden views take no space in layout. Returns `false` when nothing
    /// changed.
    pub fn set_visible(&mut self, view: ViewId, visible: bool) -> bool {
        let Some(handle) = self.live_handle(view) else {
            return false;
        };
        let Some(node) = self.views.get_mut(view) else {
            return false;
        };
        if node.visible == visible {
            return false;
        }
        node.visible = visible;
        let layout_node = node.layout_node;

        if let Err(err) = self.toolkit.set_visible(handle, visible) {
            tracing::warn!(?view, "failed to change visibility: {err}");
        }
        self.layout.set_display(layout_node, visible);
        tracing::debug!(?view, visible, "visibility changed");
        self.layout(view);
        true
    }

    pub fn is_visible(&self, view: ViewId) -> bool {
        self.live_handle(view).is_some() && self.views.get(view).is_some_and(|node| node.visible)
    }

    /// Whether the view and all of its ancestors are visible
    pub fn is_tree_visible(&self, view: ViewId) -> bool {
        let mut current = Some(view);
        while let Some(id) = current {
            if !self.is_visible(id) {
                return false;
            }
            current = self.parent(id);
        }
        true
    }

    pub fn set_focusable(&mut self, view: ViewId, focusable: bool) -> bool {
        let Some(handle) = self.live_handle(view) else {
            return false;
        };
        if let Err(err) = self.toolkit.set_focusable(handle, focusable) {
            tracing::warn!(?view, "failed to change focusability: {err}");
            return false;
        }
        if let Some(node) = self.views.get_mut(view) {
            node.focusable = focusable;
        }
        true
    }

    pub fn is_focusable(&self, view: ViewId) -> bool {
        self.live_handle(view).is_some() && self.views.get(view).is_some_and(|node| node.focusable)
    }

    pub fn focus(&mut self, view: ViewId) -> bool {
        let Some(handle) = self.live_handle(view) else {
            return false;
        };
        self.toolkit.focus(handle).is_ok()
    }

    pub fn has_focus(&self, view: ViewId) -> bool {
        self.live_handle(view)
            .and_then(|handle| self.toolkit.has_focus(handle).ok())
            .unwrap_or(false)
    }

    pub fn set_background_color(&mut self, view: ViewId, color: Color) -> bool {
        let Some(handle) = self.live_handle(view) else {
            return false;
        };
        if let Err(err) = self.toolkit.set_background(handle, color) {
            tracing::warn!(?view, "failed to set background: {err}");
            return false;
        }
        if let Some(node) = self.views.get_mut(view) {
            node.background = Some(color);
        }
        true
    }

    pub fn background_color(&self, view: ViewId) -> Option<Color> {
        self.live_handle(view)?;
        self.views.get(view)?.background
    }

    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.views.get(view)?.parent
    }

    pub fn window(&self, view: ViewId) -> Option<WindowId> {
        self.views.get(view)?.window
    }

    pub fn attachment(&self, view: ViewId) -> Attachment {
        self.views
            .get(view)
            .map(|node| node.attachment)
            .unwrap_or_default()
    }

    /// Offset of the view's origin from its window's content origin
    pub fn offset_from_window(&self, view: ViewId) -> Vector2 {
        let mut offset = Vector2::ZERO;
        let mut current = Some(view);
        while let Some(id) = current {
            let Some(node) = self.views.get(id) else {
                break;
            };
            offset = offset + self.bounds(id).origin.to_vector();
            if let (Attachment::ContentView, Some(scroll)) = (node.attachment, node.parent) {
                offset = offset - self.scroll_position(scroll).to_vector();
            }
            current = node.parent;
        }
        offset
    }

    /// Offset of the view's origin from the origin of `from`
    pub fn offset_from_view(&self, view: ViewId, from: ViewId) -> Vector2 {
        self.offset_from_window(view) - self.offset_from_window(from)
    }

    /// Set the parent back-reference and inherit the parent's window.
    ///
    /// Child collections are the caller's business.
    pub(crate) fn set_parent(&mut self, view: ViewId, parent: Option<ViewId>) {
        let window = parent
            .and_then(|parent| self.views.get(parent))
            .and_then(|parent| parent.window);
        let Some(node) = self.views.get_mut(view) else {
            return;
        };
        node.parent = parent;
        self.set_window(view, window);
    }

    /// Assign the owning window to a view and its whole subtree, depth first
    pub(crate) fn set_window(&mut self, view: ViewId, window: Option<WindowId>) {
        let Some(node) = self.views.get_mut(view) else {
            return;
        };
        node.window = window;
        let owned = node.kind.owned_views();
        if let Some(content) = node.kind.hosted() {
            content.set_owner_window(window);
        }
        for child in owned {
            self.set_window(child, window);
        }
    }

    pub(crate) fn set_attachment(&mut self, view: ViewId, attachment: Attachment) {
        if let Some(node) = self.views.get_mut(view) {
            node.attachment = attachment;
        }
    }

    pub(crate) fn set_delete_native(&mut self, view: ViewId, delete_native: bool) {
        if let Some(node) = self.views.get_mut(view) {
            node.delete_native = delete_native;
        }
    }
}
