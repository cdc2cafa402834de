//! Top-level windows and their root content views

use trellis_core::{Size, ViewId, WindowId};
use trellis_platform::{NativeToolkit, WidgetKind};

use crate::error::Result;
use crate::node::{Attachment, WindowState};
use crate::tree::ViewTree;

impl<T: NativeToolkit> ViewTree<T> {
    pub fn create_window(&mut self, content_size: Size) -> Result<WindowId> {
        let handle = self.toolkit.create_widget(WidgetKind::Window)?;
        self.toolkit.set_bounds(handle, content_size.to_rect())?;
        let window = self.windows.insert(WindowState {
            handle: Some(handle),
            content: None,
            content_size,
        });
        let (width, height) = (content_size.width, content_size.height);
        tracing::debug!(?window, width, height, "created window");
        Ok(window)
    }

    pub fn window_exists(&self, window: WindowId) -> bool {
        self.windows.contains_key(window)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Make `view` the root content of a window.
    ///
    /// The view fills the window's content area, and the whole subtree joins
    /// the window. The previous content is detached and destroyed unless
    /// application code still holds it.
    pub fn set_window_content_view(&mut self, window: WindowId, view: ViewId) -> bool {
        let Some(state) = self.windows.get(window) else {
            tracing::warn!(?window, "set_window_content_view on a missing window");
            return false;
        };
        if state.content == Some(view) {
            return false;
        }
        let (window_handle, size) = (state.handle, state.content_size);
        let Some(node) = self.views.get(view) else {
            tracing::warn!(?view, "set_window_content_view with a missing view");
            return false;
        };
        if node.parent.is_some() || node.attachment != Attachment::Unattached {
            tracing::error!(?view, "The view already has a parent.");
            return false;
        }
        let Some(view_handle) = self.live_handle(view) else {
            tracing::warn!(?view, "cannot attach a view whose native widget is gone");
            return false;
        };

        let previous = self.detach_window_content(window);
        if let Some(window_handle) = window_handle {
            match self.toolkit.insert_child(window_handle, view_handle, 0) {
                Ok(()) => {
                    let owned_by_parent = self.toolkit.parent_owns_children();
                    self.set_delete_native(view, !owned_by_parent);
                }
                Err(err) => tracing::error!(?view, "native insert failed: {err}"),
            }
        }
        if let Some(state) = self.windows.get_mut(window) {
            state.content = Some(view);
        }
        self.set_attachment(view, Attachment::WindowContent);
        self.set_window(view, Some(window));
        tracing::debug!(?window, ?view, "window content view set");

        let unchanged = self.bounds(view).size == size;
        self.set_bounds(view, size.to_rect());
        if unchanged {
            self.layout(view);
        }
        if let Some(previous) = previous {
            self.collect(previous);
        }
        true
    }

    /// Take the content view out of a window, leaving it empty.
    ///
    /// The old content leaves the window and is destroyed unless application
    /// code holds it.
    pub fn clear_window_content_view(&mut self, window: WindowId) -> bool {
        let Some(previous) = self.detach_window_content(window) else {
            return false;
        };
        self.collect(previous);
        true
    }

    pub fn window_content_view(&self, window: WindowId) -> Option<ViewId> {
        self.windows.get(window)?.content
    }

    /// Resize the content area; the content view follows
    pub fn set_window_content_size(&mut self, window: WindowId, size: Size) -> bool {
        let Some(state) = self.windows.get_mut(window) else {
            return false;
        };
        state.content_size = size;
        let (handle, content) = (state.handle, state.content);
        if let Some(handle) = handle.filter(|h| self.toolkit.is_alive(*h)) {
            if let Err(err) = self.toolkit.set_bounds(handle, size.to_rect()) {
                tracing::warn!(?window, "failed to resize window: {err}");
            }
        }
        if let Some(content) = content {
            self.set_bounds(content, size.to_rect());
        }
        true
    }

    pub fn window_content_size(&self, window: WindowId) -> Size {
        self.windows
            .get(window)
            .map(|state| state.content_size)
            .unwrap_or_default()
    }

    /// Close a window.
    ///
    /// Hosted content gets its before-unload chance first. The content view
    /// is then detached and destroyed unless application code holds it.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        let Some(content) = self.windows.get(window).map(|state| state.content) else {
            return false;
        };
        if let Some(content) = content {
            self.trigger_before_unload(content);
        }
        let detached = self.detach_window_content(window);
        let Some(state) = self.windows.remove(window) else {
            return false;
        };
        if let Some(handle) = state.handle.filter(|h| self.toolkit.is_alive(*h)) {
            if let Err(err) = self.toolkit.destroy_widget(handle) {
                tracing::warn!(?window, "failed to destroy window widget: {err}");
            }
        }
        tracing::debug!(?window, "closed window");
        if let Some(detached) = detached {
            self.collect(detached);
        }
        true
    }

    /// Take the root content view out of a window, without destroying it
    pub(crate) fn detach_window_content(&mut self, window: WindowId) -> Option<ViewId> {
        let state = self.windows.get_mut(window)?;
        let view = state.content.take()?;
        let window_handle = state.handle;

        self.set_window(view, None);
        self.set_attachment(view, Attachment::Unattached);
        let view_handle = self.live_handle(view);
        if let (Some(window_handle), Some(view_handle)) = (window_handle, view_handle) {
            if self.toolkit.is_alive(window_handle) {
                if let Err(err) = self.toolkit.remove_child(window_handle, view_handle) {
                    tracing::warn!(?window, "native remove failed: {err}");
                }
            }
        }
        self.set_delete_native(view, true);
        tracing::debug!(?window, ?view, "window content view detached");
        Some(view)
    }
}
