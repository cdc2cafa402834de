//! In-memory hosted web content

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::{Rect, WindowId};
use trellis_platform::{ContentId, HostedContent};

/// Web content stand-in that records every call made by the view tree
#[derive(Debug, Default)]
pub struct HeadlessContent {
    id: ContentId,
    owner: Cell<Option<WindowId>>,
    owner_changes: RefCell<Vec<Option<WindowId>>>,
    bounds: Cell<Rect>,
    has_before_unload: Cell<bool>,
    activations: Cell<u32>,
    unload_dispatches: Cell<u32>,
}

impl HeadlessContent {
    pub fn new(id: u64) -> Rc<Self> {
        Rc::new(Self {
            id: ContentId(id),
            ..Default::default()
        })
    }

    /// Content whose page registered a before-unload handler
    pub fn with_before_unload(id: u64) -> Rc<Self> {
        let content = Self::new(id);
        content.has_before_unload.set(true);
        content
    }

    /// Every owner window assignment, oldest first
    pub fn owner_changes(&self) -> Vec<Option<WindowId>> {
        self.owner_changes.borrow().clone()
    }

    pub fn activation_count(&self) -> u32 {
        self.activations.get()
    }

    pub fn unload_dispatch_count(&self) -> u32 {
        self.unload_dispatches.get()
    }
}

impl HostedContent for HeadlessContent {
    fn id(&self) -> ContentId {
        self.id
    }

    fn owner_window(&self) -> Option<WindowId> {
        self.owner.get()
    }

    fn set_owner_window(&self, window: Option<WindowId>) {
        self.owner.set(window);
        self.owner_changes.borrow_mut().push(window);
    }

    fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    fn last_bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn notify_user_activation(&self) {
        self.activations.set(self.activations.get() + 1);
    }

    fn needs_before_unload(&self) -> bool {
        self.has_before_unload.get()
    }

    fn dispatch_before_unload(&self) {
        self.unload_dispatches.set(self.unload_dispatches.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_owner_changes() {
        let content = HeadlessContent::new(7);
        assert_eq!(content.id(), ContentId(7));
        assert_eq!(content.owner_window(), None);

        content.set_owner_window(None);
        assert_eq!(content.owner_changes(), vec![None]);
    }

    #[test]
    fn test_before_unload_bookkeeping() {
        let content = HeadlessContent::with_before_unload(1);
        assert!(content.needs_before_unload());
        content.notify_user_activation();
        content.dispatch_before_unload();
        assert_eq!(content.activation_count(), 1);
        assert_eq!(content.unload_dispatch_count(), 1);
    }
}
