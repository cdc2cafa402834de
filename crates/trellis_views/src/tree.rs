//! View tree arena: creation, ownership and teardown

use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use trellis_core::{Size, ViewId, WindowId};
use trellis_layout::{LayoutConfig, LayoutNodeId, LayoutTree};
use trellis_platform::{HostedContent, NativeHandle, NativeToolkit, ToolkitEvent};

use crate::error::{Result, ViewError};
use crate::node::{Attachment, ViewKind, ViewNode, WindowState};

/// Tree of native views mirrored by a flexbox layout tree.
///
/// Views live in an arena and refer to each other by [`ViewId`]. A view is
/// owned by application code until [`release`](Self::release) is called, and
/// by its parent (container, scroll view or window) while attached. Once
/// neither owns it, it is destroyed together with its native widget.
pub struct ViewTree<T: NativeToolkit> {
    pub(crate) views: SlotMap<ViewId, ViewNode>,
    pub(crate) windows: SlotMap<WindowId, WindowState>,
    pub(crate) layout: LayoutTree,
    pub(crate) toolkit: T,
    /// Side table from native widget to the view wrapping it
    pub(crate) handles: FxHashMap<NativeHandle, ViewId>,
    pub(crate) layout_enabled: bool,
    pub(crate) layout_passes: u64,
    /// Destroyed views not yet taken, when recording is on
    destroyed: Option<Vec<ViewId>>,
}

impl<T: NativeToolkit> ViewTree<T> {
    pub fn new(toolkit: T) -> Self {
        Self::with_config(toolkit, LayoutConfig::default())
    }

    pub fn with_config(toolkit: T, config: LayoutConfig) -> Self {
        tracing::debug!(toolkit = toolkit.name(), ?config, "creating view tree");
        Self {
            views: SlotMap::with_key(),
            windows: SlotMap::with_key(),
            layout: LayoutTree::with_config(config),
            toolkit,
            handles: FxHashMap::default(),
            layout_enabled: true,
            layout_passes: 0,
            destroyed: None,
        }
    }

    /// Start or stop recording the ids of destroyed views.
    ///
    /// Owners of side tables keyed by [`ViewId`] drain the record with
    /// [`take_destroyed`](Self::take_destroyed). Stopping drops anything not
    /// yet taken.
    pub fn record_destroyed(&mut self, enabled: bool) {
        match (enabled, self.destroyed.is_some()) {
            (true, false) => self.destroyed = Some(Vec::new()),
            (false, true) => self.destroyed = None,
            _ => {}
        }
    }

    /// Views destroyed since the last call, oldest first
    pub fn take_destroyed(&mut self) -> Vec<ViewId> {
        self.destroyed.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Turn flexbox layout on or off for the whole tree
    pub fn set_layout_enabled(&mut self, enabled: bool) {
        self.layout_enabled = enabled;
    }

    pub fn layout_enabled(&self) -> bool {
        self.layout_enabled
    }

    /// Number of full layout computations run so far
    pub fn layout_pass_count(&self) -> u64 {
        self.layout_passes
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn layout_tree(&self) -> &LayoutTree {
        &self.layout
    }

    pub fn contains(&self, view: ViewId) -> bool {
        self.views.contains_key(view)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys()
    }

    pub fn class_name(&self, view: ViewId) -> Option<&'static str> {
        self.views.get(view).map(|node| node.kind.class_name())
    }

    pub fn is_container(&self, view: ViewId) -> bool {
        self.views.get(view).is_some_and(ViewNode::is_container)
    }

    /// Native widget of a view, or `None` once the widget is gone
    pub fn native_handle(&self, view: ViewId) -> Option<NativeHandle> {
        self.live_handle(view)
    }

    /// Whether the view exists and its native widget is still alive
    pub fn is_valid(&self, view: ViewId) -> bool {
        self.live_handle(view).is_some()
    }

    /// View wrapping the given native widget
    pub fn view_for_handle(&self, handle: NativeHandle) -> Option<ViewId> {
        self.handles.get(&handle).copied()
    }

    pub fn create_view(&mut self) -> Result<ViewId> {
        self.insert_view(ViewKind::Leaf)
    }

    pub fn create_container(&mut self) -> Result<ViewId> {
        self.insert_view(ViewKind::Container {
            children: Vec::new(),
            dirty: false,
        })
    }

    /// Create a scroll view with an empty container as its content
    pub fn create_scroll(&mut self) -> Result<ViewId> {
        let scroll = self.insert_view(ViewKind::Scroll {
            content: None,
            content_size: Size::ZERO,
        })?;
        let content = match self.create_container() {
            Ok(content) => content,
            Err(err) => {
                self.release(scroll);
                return Err(err);
            }
        };
        if let Some(node) = self.views.get_mut(content) {
            node.held = false;
        }
        self.set_content_view(scroll, content);
        Ok(scroll)
    }

    /// Create a web content wrapper that hosts nothing yet
    pub fn create_web_content_view(&mut self) -> Result<ViewId> {
        self.insert_view(ViewKind::WebContent { content: None })
    }

    /// Create a web content wrapper hosting `content`
    pub fn create_web_content_view_with<C: HostedContent + 'static>(
        &mut self,
        content: &Rc<C>,
    ) -> Result<ViewId> {
        let view = self.create_web_content_view()?;
        self.set_hosted_content(view, content);
        Ok(view)
    }

    fn insert_view(&mut self, kind: ViewKind) -> Result<ViewId> {
        let handle = self.toolkit.create_widget(kind.widget_kind())?;
        let Some(layout_node) = self.layout.create_node() else {
            let _ = self.toolkit.destroy_widget(handle);
            return Err(ViewError::Layout);
        };
        let class = kind.class_name();
        let view = self.views.insert(ViewNode::new(kind, handle, layout_node));
        self.handles.insert(handle, view);
        tracing::debug!(?view, "created {class}");
        Ok(view)
    }

    /// Drop the application's ownership of a view.
    ///
    /// The view stays alive while it is attached somewhere and is destroyed
    /// as soon as it is not.
    pub fn release(&mut self, view: ViewId) {
        let Some(node) = self.views.get_mut(view) else {
            return;
        };
        node.held = false;
        self.collect(view);
    }

    /// Mark a view as held by application code again
    pub fn retain(&mut self, view: ViewId) -> bool {
        match self.views.get_mut(view) {
            Some(node) => {
                node.held = true;
                true
            }
            None => false,
        }
    }

    /// Platform notification that a native widget was deleted.
    ///
    /// The wrapping view loses its handle, leaves its parent and is destroyed
    /// if nothing else holds it. Returns whether a view was affected.
    pub fn notify_widget_destroyed(&mut self, handle: NativeHandle) -> bool {
        let Some(view) = self.handles.remove(&handle) else {
            return false;
        };
        let Some(node) = self.views.get_mut(view) else {
            return false;
        };
        node.handle = None;
        tracing::warn!(?view, "native widget deleted by the platform, view invalidated");
        self.detach(view);
        self.collect(view);
        true
    }

    /// Deliver every pending toolkit event. Returns the number handled.
    pub fn pump_toolkit_events(&mut self) -> usize {
        let events = self.toolkit.take_events();
        let count = events.len();
        for event in events {
            match event {
                ToolkitEvent::WidgetDestroyed(handle) => {
                    self.notify_widget_destroyed(handle);
                }
            }
        }
        count
    }

    /// Native handle of a view, if the widget is still alive
    pub(crate) fn live_handle(&self, view: ViewId) -> Option<NativeHandle> {
        self.views
            .get(view)
            .and_then(|node| node.handle)
            .filter(|handle| self.toolkit.is_alive(*handle))
    }

    pub(crate) fn layout_node(&self, view: ViewId) -> Option<LayoutNodeId> {
        self.views.get(view).map(|node| node.layout_node)
    }

    /// Whether `ancestor` is on the parent chain of `view`
    pub(crate) fn is_ancestor(&self, ancestor: ViewId, view: ViewId) -> bool {
        let mut current = self.views.get(view).and_then(|node| node.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.views.get(id).and_then(|node| node.parent);
        }
        false
    }

    /// Take a view out of whatever currently holds it
    pub(crate) fn detach(&mut self, view: ViewId) {
        let Some(node) = self.views.get(view) else {
            return;
        };
        match (node.attachment, node.parent) {
            (Attachment::Child, Some(parent)) => {
                self.remove_child(parent, view);
            }
            (Attachment::ContentView, Some(scroll)) => {
                self.detach_content(scroll);
            }
            (Attachment::WindowContent, _) => {
                if let Some(window) = node.window {
                    self.detach_window_content(window);
                }
            }
            _ => {}
        }
    }

    /// Destroy a view once nothing owns it
    pub(crate) fn collect(&mut self, view: ViewId) {
        let Some(node) = self.views.get(view) else {
            return;
        };
        if node.held || node.attachment != Attachment::Unattached {
            return;
        }
        self.destroy(view);
    }

    fn destroy(&mut self, view: ViewId) {
        let Some(node) = self.views.get(view) else {
            return;
        };
        let owned = node.kind.owned_views();
        let is_scroll = matches!(node.kind, ViewKind::Scroll { .. });
        if is_scroll {
            self.detach_content(view);
        } else {
            for child in &owned {
                self.detach_child(view, *child);
            }
        }
        for child in owned {
            self.collect(child);
        }

        let Some(node) = self.views.remove(view) else {
            return;
        };
        self.layout.remove_node(node.layout_node);
        if let Some(handle) = node.handle {
            self.handles.remove(&handle);
            if node.delete_native && self.toolkit.is_alive(handle) {
                if let Err(err) = self.toolkit.destroy_widget(handle) {
                    tracing::warn!(?view, "failed to destroy native widget: {err}");
                }
            }
        }
        if let Some(destroyed) = &mut self.destroyed {
            destroyed.push(view);
        }
        tracing::debug!(?view, "destroyed {}", node.kind.class_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_platform_headless::{HeadlessContent, HeadlessToolkit};

    #[test]
    fn test_class_names() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let view = tree.create_view().unwrap();
        let container = tree.create_container().unwrap();
        let scroll = tree.create_scroll().unwrap();
        let web = tree.create_web_content_view().unwrap();

        assert_eq!(tree.class_name(view), Some("View"));
        assert_eq!(tree.class_name(container), Some("Container"));
        assert_eq!(tree.class_name(scroll), Some("Scroll"));
        assert_eq!(tree.class_name(web), Some("WebContentView"));
        assert!(tree.is_container(container));
        assert!(!tree.is_container(scroll));
    }

    #[test]
    fn test_release_destroys_unattached_view() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let view = tree.create_view().unwrap();
        let handle = tree.native_handle(view).unwrap();

        tree.release(view);
        assert!(!tree.contains(view));
        assert!(!tree.toolkit().is_alive(handle));
    }

    #[test]
    fn test_attached_view_outlives_release() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let container = tree.create_container().unwrap();
        let child = tree.create_view().unwrap();
        tree.add_child(container, child);

        tree.release(child);
        assert!(tree.contains(child));

        tree.remove_child(container, child);
        assert!(!tree.contains(child));
    }

    #[test]
    fn test_releasing_container_releases_unheld_children() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let container = tree.create_container().unwrap();
        let kept = tree.create_view().unwrap();
        let dropped = tree.create_view().unwrap();
        tree.add_child(container, kept);
        tree.add_child(container, dropped);
        tree.release(dropped);

        tree.release(container);
        assert!(!tree.contains(container));
        assert!(!tree.contains(dropped));
        assert!(tree.contains(kept));
        assert_eq!(tree.parent(kept), None);
        assert!(tree.is_valid(kept));
    }

    #[test]
    fn test_scroll_owns_default_content() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let scroll = tree.create_scroll().unwrap();
        let content = tree.content_view(scroll).unwrap();
        assert_eq!(tree.class_name(content), Some("Container"));

        tree.release(scroll);
        assert!(!tree.contains(content));
        assert_eq!(tree.view_count(), 0);
        assert_eq!(tree.toolkit().widget_count(), 0);
    }

    #[test]
    fn test_platform_deletion_invalidates_and_detaches() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let container = tree.create_container().unwrap();
        let child = tree.create_view().unwrap();
        tree.add_child(container, child);
        let handle = tree.native_handle(child).unwrap();

        tree.toolkit_mut().destroy_from_platform(handle).unwrap();
        assert_eq!(tree.pump_toolkit_events(), 1);

        assert!(tree.contains(child));
        assert!(!tree.is_valid(child));
        assert_eq!(tree.parent(child), None);
        assert!(tree.children(container).is_empty());
        tree.check_consistency().unwrap();

        // stale views ignore mutations
        assert!(!tree.set_visible(child, false));
        assert!(!tree.is_visible(child));
        assert!(!tree.add_child(container, child));
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let view = tree.create_view().unwrap();
        let handle = tree.native_handle(view).unwrap();
        tree.release(view);
        assert!(!tree.notify_widget_destroyed(handle));
    }

    #[test]
    fn test_web_content_constructor_binds_content() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let content = HeadlessContent::new(3);
        let web = tree.create_web_content_view_with(&content).unwrap();
        assert_eq!(tree.hosted_content(web).map(|c| c.id()), Some(content.id()));
    }

    #[test]
    fn test_destroyed_views_are_recorded_when_asked() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let quiet = tree.create_view().unwrap();
        tree.release(quiet);
        assert!(tree.take_destroyed().is_empty());

        tree.record_destroyed(true);
        let container = tree.create_container().unwrap();
        let child = tree.create_view().unwrap();
        tree.add_child(container, child);
        tree.release(child);
        tree.release(container);
        assert_eq!(tree.take_destroyed(), vec![child, container]);
        assert!(tree.take_destroyed().is_empty());
    }
}
