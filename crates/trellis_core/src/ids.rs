//! View and window identifiers

use slotmap::new_key_type;

new_key_type! {
    /// Arena key of a view inside a view tree
    pub struct ViewId;
}

new_key_type! {
    /// Arena key of a window inside a view tree
    pub struct WindowId;
}

/// Allocator for the public numeric ids handed out to application code.
///
/// Ids start at 1 and are never reused. Once `u32::MAX` has been handed out
/// the allocator is exhausted and returns `None`. The allocator is an
/// ordinary value owned by the application registry and passed to whatever
/// constructs views.
#[derive(Debug)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Allocator whose first id is `first`; zero is never an id
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: Some(first.max(1)),
        }
    }

    /// Hand out the next id, or `None` once every id has been used
    pub fn allocate(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// The id that the next call to [`allocate`](Self::allocate) returns
    pub fn peek(&self) -> Option<u32> {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
