//! Web content wrapper views

use std::rc::{Rc, Weak};

use trellis_core::ViewId;
use trellis_platform::{ContentId, HostedContent, NativeToolkit};

use crate::node::ViewKind;
use crate::tree::ViewTree;

impl<T: NativeToolkit> ViewTree<T> {
    /// Host `content` in a web content view.
    ///
    /// The view only keeps a weak reference. The content immediately learns
    /// its owner window and is sized to the view.
    pub fn set_hosted_content<C: HostedContent + 'static>(
        &mut self,
        view: ViewId,
        content: &Rc<C>,
    ) -> bool {
        let Some(node) = self.views.get_mut(view) else {
            return false;
        };
        let ViewKind::WebContent { content: slot } = &mut node.kind else {
            tracing::error!(?view, "only web content views host content");
            return false;
        };
        let previous = slot.as_ref().and_then(Weak::upgrade);
        *slot = Some(Rc::downgrade(content) as Weak<dyn HostedContent>);
        let window = node.window;

        if let Some(previous) = previous.filter(|p| p.id() != content.id()) {
            previous.set_owner_window(None);
        }
        content.set_owner_window(window);
        content.set_bounds(self.bounds(view).local());
        tracing::debug!(?view, content = content.id().0, "hosting web content");
        true
    }

    /// Content hosted by a web content view, if it is still alive
    pub fn hosted_content(&self, view: ViewId) -> Option<Rc<dyn HostedContent>> {
        self.views.get(view)?.kind.hosted()
    }

    /// Web content view currently hosting `content`
    pub fn hosting_view(&self, content: ContentId) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, node)| node.kind.hosted().is_some_and(|hosted| hosted.id() == content))
            .map(|(view, _)| view)
    }

    /// Stop hosting the given content; it no longer has an owner window
    pub fn detach_hosted_content(&mut self, view: ViewId, content: ContentId) -> bool {
        let kind = self.views.get_mut(view).map(|node| &mut node.kind);
        let Some(ViewKind::WebContent { content: slot }) = kind else {
            return false;
        };
        let Some(hosted) = slot.as_ref().and_then(Weak::upgrade) else {
            return false;
        };
        if hosted.id() != content {
            return false;
        }
        *slot = None;
        hosted.set_owner_window(None);
        true
    }

    /// Give every hosted content under `view` a chance to run its
    /// before-unload handler, depth first.
    pub fn trigger_before_unload(&self, view: ViewId) {
        let Some(node) = self.views.get(view) else {
            return;
        };
        if let Some(content) = node.kind.hosted() {
            content.notify_user_activation();
            if content.needs_before_unload() {
                content.dispatch_before_unload();
            }
        }
        for child in node.kind.owned_views() {
            self.trigger_before_unload(child);
        }
    }
}
