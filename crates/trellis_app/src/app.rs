//! Application shell
//!
//! Owns the view tree, refuses to build views before the application is
//! ready and hands out the stable numeric ids application code looks views
//! up by.

use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use trellis_core::{IdAllocator, Size, ViewId, WindowId};
use trellis_platform::{HostedContent, NativeToolkit};
use trellis_views::ViewTree;

use crate::config::AppConfig;
use crate::error::{AppError, Result};

pub struct TrellisApp<T: NativeToolkit> {
    ready: bool,
    ids: IdAllocator,
    tree: ViewTree<T>,
    by_id: FxHashMap<u32, ViewId>,
    id_of: FxHashMap<ViewId, u32>,
}

impl<T: NativeToolkit> TrellisApp<T> {
    pub fn new(toolkit: T) -> Self {
        Self::with_config(toolkit, &AppConfig::default())
    }

    pub fn with_config(toolkit: T, config: &AppConfig) -> Self {
        let mut tree = ViewTree::with_config(toolkit, config.layout_config());
        tree.set_layout_enabled(config.layout.enabled);
        tree.record_destroyed(true);
        Self {
            ready: false,
            ids: IdAllocator::new(),
            tree,
            by_id: FxHashMap::default(),
            id_of: FxHashMap::default(),
        }
    }

    /// Allow views to be created from now on
    pub fn mark_ready(&mut self) {
        if !self.ready {
            tracing::info!(toolkit = self.tree.toolkit().name(), "app ready");
        }
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn new_view(&mut self) -> Result<ViewId> {
        self.ensure_ready("View")?;
        let view = self.tree.create_view()?;
        self.register(view)
    }

    pub fn new_container(&mut self) -> Result<ViewId> {
        self.ensure_ready("Container")?;
        let view = self.tree.create_container()?;
        self.register(view)
    }

    pub fn new_scroll_view(&mut self) -> Result<ViewId> {
        self.ensure_ready("ScrollView")?;
        let view = self.tree.create_scroll()?;
        self.register(view)
    }

    pub fn new_web_content_view<C: HostedContent + 'static>(
        &mut self,
        content: &Rc<C>,
    ) -> Result<ViewId> {
        self.ensure_ready("WebContentView")?;
        let view = self.tree.create_web_content_view_with(content)?;
        self.register(view)
    }

    pub fn new_window(&mut self, content_size: Size) -> Result<WindowId> {
        self.ensure_ready("Window")?;
        Ok(self.tree.create_window(content_size)?)
    }

    /// Public id of a view created through this app
    pub fn id(&self, view: ViewId) -> Option<u32> {
        self.id_of.get(&view).copied().filter(|_| self.tree.contains(view))
    }

    /// Look a live view up by its public id
    pub fn from_id(&self, id: u32) -> Option<ViewId> {
        self.by_id.get(&id).copied().filter(|view| self.tree.contains(*view))
    }

    /// Every live view created through this app, in creation order
    pub fn all_views(&self) -> Vec<ViewId> {
        let mut views: Vec<_> = self
            .by_id
            .iter()
            .filter(|(_, view)| self.tree.contains(**view))
            .map(|(id, view)| (*id, *view))
            .collect();
        views.sort_unstable_by_key(|(id, _)| *id);
        views.into_iter().map(|(_, view)| view).collect()
    }

    /// Number of live views holding a public id
    pub fn registered_count(&self) -> usize {
        self.by_id.len()
    }

    /// Drop the application's handle on a view
    pub fn release(&mut self, view: ViewId) {
        self.tree.release(view);
        self.prune();
    }

    pub fn tree(&self) -> &ViewTree<T> {
        &self.tree
    }

    /// Mutable access to the tree.
    ///
    /// Ids of views destroyed through the guard are forgotten when it drops.
    pub fn tree_mut(&mut self) -> TreeMut<'_, T> {
        TreeMut { app: self }
    }

    /// Close a window, destroying its content unless it is still held
    pub fn close_window(&mut self, window: WindowId) -> bool {
        self.tree_mut().close_window(window)
    }

    fn ensure_ready(&self, class: &'static str) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            tracing::error!("Cannot create {class} before app is ready");
            Err(AppError::NotReady { class })
        }
    }

    fn register(&mut self, view: ViewId) -> Result<ViewId> {
        let Some(id) = self.ids.allocate() else {
            tracing::error!(?view, "no view ids left, releasing the new view");
            self.release(view);
            return Err(AppError::IdsExhausted);
        };
        self.by_id.insert(id, view);
        self.id_of.insert(view, id);
        Ok(view)
    }

    /// Forget ids of views the tree has destroyed
    fn prune(&mut self) {
        for view in self.tree.take_destroyed() {
            if let Some(id) = self.id_of.remove(&view) {
                self.by_id.remove(&id);
            }
        }
    }
}

/// Mutable borrow of an app's view tree that keeps the id registry in step
pub struct TreeMut<'a, T: NativeToolkit> {
    app: &'a mut TrellisApp<T>,
}

impl<T: NativeToolkit> Deref for TreeMut<'_, T> {
    type Target = ViewTree<T>;

    fn deref(&self) -> &ViewTree<T> {
        &self.app.tree
    }
}

impl<T: NativeToolkit> DerefMut for TreeMut<'_, T> {
    fn deref_mut(&mut self) -> &mut ViewTree<T> {
        &mut self.app.tree
    }
}

impl<T: NativeToolkit> Drop for TreeMut<'_, T> {
    fn drop(&mut self) {
        self.app.prune();
    }
}

#[cfg(test)]
mod tests {
    use trellis_platform_headless::HeadlessToolkit;

    use super::*;

    #[test]
    fn test_construction_requires_ready() {
        let mut app = TrellisApp::new(HeadlessToolkit::views());
        let err = app.new_container().unwrap_err();
        assert_eq!(err.to_string(), "Cannot create Container before app is ready");
        assert!(app.new_window(Size::new(10.0, 10.0)).is_err());
        assert_eq!(app.tree().view_count(), 0);

        app.mark_ready();
        assert!(app.new_container().is_ok());
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut app = TrellisApp::new(HeadlessToolkit::appkit());
        app.mark_ready();
        let a = app.new_view().unwrap();
        let b = app.new_container().unwrap();

        assert_eq!(app.id(a), Some(1));
        assert_eq!(app.id(b), Some(2));
        assert_eq!(app.from_id(2), Some(b));
        assert_eq!(app.all_views(), vec![a, b]);
    }

    #[test]
    fn test_scroll_content_is_not_registered() {
        let mut app = TrellisApp::new(HeadlessToolkit::views());
        app.mark_ready();
        let scroll = app.new_scroll_view().unwrap();
        assert_eq!(app.all_views(), vec![scroll]);
        assert_eq!(app.tree().view_count(), 2);
    }

    #[test]
    fn test_tree_mutations_prune_registry() {
        let mut app = TrellisApp::new(HeadlessToolkit::views());
        app.mark_ready();
        let window = app.new_window(Size::new(100.0, 100.0)).unwrap();
        let root = app.new_container().unwrap();
        let child = app.new_view().unwrap();
        let scroll = app.new_scroll_view().unwrap();
        {
            let mut tree = app.tree_mut();
            tree.add_child(root, child);
            tree.add_child(root, scroll);
            tree.set_window_content_view(window, root);
        }
        app.release(child);
        app.release(scroll);
        app.release(root);
        assert_eq!(app.registered_count(), 3);

        assert!(app.close_window(window));
        assert_eq!(app.registered_count(), 0);
        assert!(app.by_id.is_empty());
        assert!(app.id_of.is_empty());
        assert_eq!(app.tree().view_count(), 0);
    }

    #[test]
    fn test_remove_child_through_tree_prunes_registry() {
        let mut app = TrellisApp::new(HeadlessToolkit::appkit());
        app.mark_ready();
        let container = app.new_container().unwrap();
        let child = app.new_view().unwrap();
        app.tree_mut().add_child(container, child);
        app.release(child);
        assert_eq!(app.registered_count(), 2);

        app.tree_mut().remove_child(container, child);
        assert_eq!(app.registered_count(), 1);
        assert_eq!(app.id(container), Some(1));
    }

    #[test]
    fn test_exhausted_ids_refuse_new_views() {
        let mut app = TrellisApp::new(HeadlessToolkit::views());
        app.mark_ready();
        app.ids = IdAllocator::starting_at(u32::MAX);
        let last = app.new_view().unwrap();
        assert_eq!(app.id(last), Some(u32::MAX));

        let err = app.new_scroll_view().unwrap_err();
        assert!(matches!(err, AppError::IdsExhausted));
        assert_eq!(app.tree().view_count(), 1);
        assert_eq!(app.all_views(), vec![last]);
    }

    #[test]
    fn test_layout_switch_from_config() {
        let config = AppConfig::from_toml_str("[layout]\nenabled = false").unwrap();
        let app = TrellisApp::with_config(HeadlessToolkit::views(), &config);
        assert!(!app.tree().layout_enabled());
    }
}
