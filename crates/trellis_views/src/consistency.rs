//! Structural invariant checks used by tests and debug tooling

use trellis_core::ViewId;
use trellis_platform::NativeToolkit;

use crate::error::{Result, ViewError};
use crate::node::{Attachment, ViewKind};
use crate::tree::ViewTree;

fn inconsistent(message: String) -> ViewError {
    ViewError::Inconsistent(message)
}

impl<T: NativeToolkit> ViewTree<T> {
    /// Verify that the model, layout and native trees agree with each other.
    ///
    /// Returns the first violation found.
    pub fn check_consistency(&self) -> Result<()> {
        for (view, node) in &self.views {
            self.check_parent_link(view)?;

            match node.attachment {
                Attachment::Unattached => {
                    if node.parent.is_some() || node.window.is_some() {
                        return Err(inconsistent(format!(
                            "{view:?} is unattached but has a parent or window"
                        )));
                    }
                }
                Attachment::WindowContent => {
                    let owner = node.window.and_then(|window| self.windows.get(window));
                    let owned = owner.and_then(|state| state.content) == Some(view);
                    if node.parent.is_some() || !owned {
                        let message = format!("{view:?} is not the content of its window");
                        return Err(inconsistent(message));
                    }
                }
                Attachment::Child | Attachment::ContentView => {}
            }

            match &node.kind {
                ViewKind::Container { children, .. } => self.check_children(view, children)?,
                ViewKind::Scroll { content, .. } => self.check_document(view, *content)?,
                _ => {}
            }
        }

        for (window, state) in &self.windows {
            if let Some(content) = state.content {
                let node = self
                    .views
                    .get(content)
                    .ok_or_else(|| inconsistent(format!("{window:?} content no longer exists")))?;
                if node.window != Some(window) || node.attachment != Attachment::WindowContent {
                    return Err(inconsistent(format!(
                        "{content:?} does not know it is the content of {window:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The parent lists the view exactly once and shares its window
    fn check_parent_link(&self, view: ViewId) -> Result<()> {
        let Some(node) = self.views.get(view) else {
            return Ok(());
        };
        let Some(parent) = node.parent else {
            return Ok(());
        };
        let parent_node = self
            .views
            .get(parent)
            .ok_or_else(|| inconsistent(format!("{view:?} points at a missing parent")))?;

        let listed = match (&parent_node.kind, node.attachment) {
            (ViewKind::Container { children, .. }, Attachment::Child) => {
                children.iter().filter(|child| **child == view).count() == 1
            }
            (ViewKind::Scroll { content, .. }, Attachment::ContentView) => *content == Some(view),
            _ => false,
        };
        if !listed {
            return Err(inconsistent(format!("{parent:?} does not list {view:?} as its child")));
        }
        if node.window != parent_node.window {
            return Err(inconsistent(format!("{view:?} and its parent are in different windows")));
        }
        Ok(())
    }

    fn check_children(&self, container: ViewId, children: &[ViewId]) -> Result<()> {
        for child in children {
            let listed_back = self
                .views
                .get(*child)
                .is_some_and(|node| {
                    node.parent == Some(container) && node.attachment == Attachment::Child
                });
            if !listed_back {
                return Err(inconsistent(format!("{child:?} does not point back at {container:?}")));
            }
        }

        let Some(layout_node) = self.layout_node(container) else {
            return Ok(());
        };
        let expected: Vec<_> = children
            .iter()
            .filter_map(|child| self.layout_node(*child))
            .collect();
        if self.layout.children(layout_node) != expected {
            return Err(inconsistent(format!("layout children of {container:?} are out of order")));
        }

        let Some(handle) = self.live_handle(container) else {
            return Ok(());
        };
        let native = self.toolkit.children(handle).unwrap_or_default();
        let expected: Vec<_> = children
            .iter()
            .filter_map(|child| self.live_handle(*child))
            .collect();
        if native != expected {
            return Err(inconsistent(format!("native children of {container:?} are out of order")));
        }
        Ok(())
    }

    fn check_document(&self, scroll: ViewId, content: Option<ViewId>) -> Result<()> {
        let Some(handle) = self.live_handle(scroll) else {
            return Ok(());
        };
        let document = self.toolkit.document(handle).unwrap_or_default();
        let expected = content.and_then(|content| self.live_handle(content));
        if document != expected {
            let message = format!("native document of {scroll:?} is not its content view");
            return Err(inconsistent(message));
        }
        Ok(())
    }
}
