//! Container child management
//!
//! Every structural change updates the layout tree, the parent
//! back-reference, the native child list and the model child list together,
//! then lays the container out again.

use std::rc::Rc;

use trellis_core::ViewId;
use trellis_layout::LayoutStyle;
use trellis_platform::{ContentId, HostedContent, NativeToolkit};

use crate::error::{Result, ViewError};
use crate::node::{Attachment, ViewKind};
use crate::tree::ViewTree;

impl<T: NativeToolkit> ViewTree<T> {
    /// Append a view. Does nothing if it is already a child of `container`.
    pub fn add_child(&mut self, container: ViewId, view: ViewId) -> bool {
        if self.parent(view) == Some(container) && self.attachment(view) == Attachment::Child {
            return false;
        }
        let count = self.child_count(container);
        self.add_child_at(container, view, count)
    }

    /// Insert a view at `index` in the child list.
    ///
    /// Rejected (logged, nothing changes) when the view is the container
    /// itself or one of its ancestors, when `index` is past the end, or when
    /// the view is already attached anywhere. Detach it first to move it.
    pub fn add_child_at(&mut self, container: ViewId, view: ViewId, index: usize) -> bool {
        let Some(parent) = self.views.get(container) else {
            tracing::warn!(?container, "add_child_at on a missing container");
            return false;
        };
        let count = match &parent.kind {
            ViewKind::Container { children, .. } => children.len(),
            ViewKind::Scroll { .. } => {
                tracing::error!(?container, "a scroll view only holds its content view");
                return false;
            }
            other => {
                tracing::error!(?container, "a {} cannot hold children", other.class_name());
                return false;
            }
        };
        let parent_layout = parent.layout_node;

        if view == container {
            tracing::error!(?view, "cannot add a view to itself");
            return false;
        }
        let Some(child) = self.views.get(view) else {
            tracing::warn!(?view, "add_child_at with a missing view");
            return false;
        };
        if index > count {
            tracing::error!(index, count, "child index out of range");
            return false;
        }
        if child.parent.is_some() || child.attachment != Attachment::Unattached {
            tracing::error!(?view, "The view already has a parent.");
            return false;
        }
        let child_layout = child.layout_node;
        if self.is_ancestor(view, container) {
            tracing::error!(?view, "cannot add an ancestor as a child");
            return false;
        }
        if self.live_handle(view).is_none() || self.live_handle(container).is_none() {
            tracing::warn!(?view, "cannot attach a view whose native widget is gone");
            return false;
        }

        self.layout.insert_child_at(parent_layout, child_layout, index);
        self.set_parent(view, Some(container));
        self.set_attachment(view, Attachment::Child);
        self.insert_native_child(container, view, index);
        if let Some(children) = self.children_mut(container) {
            children.insert(index, view);
        }
        tracing::debug!(?container, ?view, index, "added child");

        self.layout(container);
        true
    }

    /// Remove a child and lay the container out again.
    ///
    /// The removed view is destroyed unless application code still holds it.
    pub fn remove_child(&mut self, container: ViewId, view: ViewId) -> bool {
        if !self.detach_child(container, view) {
            return false;
        }
        self.layout(container);
        self.collect(view);
        true
    }

    /// Move a child to the end of the list, which brings it to the front
    pub fn set_top_child(&mut self, container: ViewId, view: ViewId) -> bool {
        let Some(position) = self.children(container).iter().position(|c| *c == view) else {
            return false;
        };
        let (Some(parent_layout), Some(child_layout)) =
            (self.layout_node(container), self.layout_node(view))
        else {
            return false;
        };

        self.layout.remove_child(parent_layout, child_layout);
        self.layout.add_child(parent_layout, child_layout);
        if let (Some(parent_handle), Some(child_handle)) =
            (self.live_handle(container), self.live_handle(view))
        {
            if let Err(err) = self.toolkit.reorder_child_to_top(parent_handle, child_handle) {
                tracing::error!(?view, "native reorder failed: {err}");
            }
        }
        if let Some(children) = self.children_mut(container) {
            let moved = children.remove(position);
            children.push(moved);
        }
        tracing::debug!(?container, ?view, "moved child to top");

        self.layout(container);
        true
    }

    pub fn child_count(&self, container: ViewId) -> usize {
        self.children(container).len()
    }

    pub fn child_at(&self, container: ViewId, index: usize) -> Option<ViewId> {
        self.children(container).get(index).copied()
    }

    /// Children in order; empty for views that are not containers
    pub fn children(&self, container: ViewId) -> &[ViewId] {
        match self.views.get(container).map(|node| &node.kind) {
            Some(ViewKind::Container { children, .. }) => children,
            _ => &[],
        }
    }

    /// Wrap `content` in a new web content view and append it.
    ///
    /// The wrapper keeps the content's last bounds when it has any, and
    /// otherwise fills the free space. It is owned by the container.
    ///
    /// Content already hosted by a child of this container returns that
    /// child. Content hosted by any other view is refused.
    pub fn add_hosted_content<C: HostedContent + 'static>(
        &mut self,
        container: ViewId,
        content: &Rc<C>,
    ) -> Option<ViewId> {
        if !self.is_container(container) {
            tracing::error!(?container, "hosted content needs a container");
            return None;
        }
        if let Some(existing) = self.find_hosted_child(container, content.id()) {
            return Some(existing);
        }
        if let Some(host) = self.hosting_view(content.id()) {
            let id = content.id().0;
            tracing::error!(?host, content = id, "The content is already hosted elsewhere.");
            return None;
        }
        let wrapper = match self.create_web_content_view_with(content) {
            Ok(wrapper) => wrapper,
            Err(err) => {
                tracing::error!("failed to create web content view: {err}");
                return None;
            }
        };
        if let Some(node) = self.views.get_mut(wrapper) {
            node.held = false;
        }

        let last_bounds = content.last_bounds();
        if let Some(layout_node) = self.layout_node(wrapper) {
            if last_bounds.is_empty() {
                self.layout.update_style(layout_node, |style| {
                    *style = LayoutStyle::fill(style.clone());
                });
            } else {
                self.layout.update_style(layout_node, |style| {
                    let fixed = LayoutStyle::fixed_size(last_bounds.width(), last_bounds.height());
                    style.size = fixed.size;
                });
                self.set_bounds(wrapper, last_bounds);
            }
        }

        if !self.add_child(container, wrapper) {
            self.collect(wrapper);
            return None;
        }
        Some(wrapper)
    }

    /// Remove the child wrapping the given content
    pub fn remove_hosted_content(&mut self, container: ViewId, content: ContentId) -> bool {
        match self.find_hosted_child(container, content) {
            Some(wrapper) => self.remove_child(container, wrapper),
            None => false,
        }
    }

    /// Bring the child wrapping the given content to the front
    pub fn set_top_hosted_content(&mut self, container: ViewId, content: ContentId) -> Result<()> {
        let Some(wrapper) = self.find_hosted_child(container, content) else {
            return Err(ViewError::ContentNotAttached);
        };
        self.set_top_child(container, wrapper);
        Ok(())
    }

    /// Contents hosted by direct children, in child order
    pub fn hosted_contents(&self, container: ViewId) -> Vec<Rc<dyn HostedContent>> {
        self.children(container)
            .iter()
            .filter_map(|child| self.views.get(*child))
            .filter_map(|node| node.kind.hosted())
            .collect()
    }

    fn find_hosted_child(&self, container: ViewId, content: ContentId) -> Option<ViewId> {
        self.children(container).iter().copied().find(|child| {
            self.views
                .get(*child)
                .and_then(|node| node.kind.hosted())
                .is_some_and(|hosted| hosted.id() == content)
        })
    }

    /// Unlink a child from the container in every tree, without layout
    pub(crate) fn detach_child(&mut self, container: ViewId, view: ViewId) -> bool {
        let Some(position) = self.children(container).iter().position(|c| *c == view) else {
            return false;
        };

        self.set_parent(view, None);
        self.set_attachment(view, Attachment::Unattached);
        if let (Some(parent_layout), Some(child_layout)) =
            (self.layout_node(container), self.layout_node(view))
        {
            self.layout.remove_child(parent_layout, child_layout);
        }
        if let (Some(parent_handle), Some(child_handle)) =
            (self.live_handle(container), self.live_handle(view))
        {
            if let Err(err) = self.toolkit.remove_child(parent_handle, child_handle) {
                tracing::error!(?view, "native remove failed: {err}");
            }
        }
        self.set_delete_native(view, true);
        if let Some(children) = self.children_mut(container) {
            children.remove(position);
        }
        tracing::debug!(?container, ?view, "removed child");
        true
    }

    fn insert_native_child(&mut self, container: ViewId, view: ViewId, index: usize) {
        let (Some(parent_handle), Some(child_handle)) =
            (self.live_handle(container), self.live_handle(view))
        else {
            return;
        };
        // Children whose widget is gone have no native counterpart
        let native_index = self.children(container)[..index]
            .iter()
            .filter(|child| self.live_handle(**child).is_some())
            .count();
        match self.toolkit.insert_child(parent_handle, child_handle, native_index) {
            Ok(()) => {
                let owned_by_parent = self.toolkit.parent_owns_children();
                self.set_delete_native(view, !owned_by_parent);
            }
            Err(err) => tracing::error!(?view, "native insert failed: {err}"),
        }
    }

    fn children_mut(&mut self, container: ViewId) -> Option<&mut Vec<ViewId>> {
        match self.views.get_mut(container).map(|node| &mut node.kind) {
            Some(ViewKind::Container { children, .. }) => Some(children),
            _ => None,
        }
    }
}
