//! Scroll views
//!
//! A scroll view is not a layout container: its single content view is the
//! native document of the viewport and lays out on its own.

use trellis_core::{Point, Rect, Size, ViewId};
use trellis_platform::{
    Axis, NativeHandle, NativeToolkit, PlatformError, ScrollFlag, ScrollbarMode,
};

use crate::node::{Attachment, ViewKind};
use crate::tree::ViewTree;

impl<T: NativeToolkit> ViewTree<T> {
    /// Replace the content view of a scroll view.
    ///
    /// The previous content is detached and destroyed unless application
    /// code still holds it. The new content must not be attached elsewhere.
    /// Nothing changes when the toolkit refuses the new document.
    pub fn set_content_view(&mut self, scroll: ViewId, view: ViewId) -> bool {
        let kind = self.views.get(scroll).map(|node| &node.kind);
        let Some(ViewKind::Scroll { content, content_size }) = kind else {
            tracing::error!(?scroll, "set_content_view needs a scroll view");
            return false;
        };
        let (current, content_size) = (*content, *content_size);
        if view == scroll {
            tracing::error!(?view, "a scroll view cannot contain itself");
            return false;
        }
        if current == Some(view) {
            return false;
        }
        let Some(node) = self.views.get(view) else {
            tracing::warn!(?view, "set_content_view with a missing view");
            return false;
        };
        if node.parent.is_some() || node.attachment != Attachment::Unattached {
            tracing::error!(?view, "The view already has a parent.");
            return false;
        }
        if self.is_ancestor(view, scroll) {
            tracing::error!(?view, "cannot use an ancestor as scroll content");
            return false;
        }
        let (Some(scroll_handle), Some(view_handle)) =
            (self.live_handle(scroll), self.live_handle(view))
        else {
            tracing::warn!(?view, "cannot attach a view whose native widget is gone");
            return false;
        };
        if let Err(err) = self.toolkit.set_document(scroll_handle, Some(view_handle)) {
            tracing::error!(?view, "native document change failed: {err}");
            return false;
        }

        // The toolkit already swapped the native document
        let previous = self.unlink_content(scroll, false);
        let owned_by_parent = self.toolkit.parent_owns_children();
        self.set_delete_native(view, !owned_by_parent);
        if let Some(ViewKind::Scroll { content, .. }) =
            self.views.get_mut(scroll).map(|node| &mut node.kind)
        {
            *content = Some(view);
        }
        self.set_parent(view, Some(scroll));
        self.set_attachment(view, Attachment::ContentView);
        tracing::debug!(?scroll, ?view, "content view set");

        if content_size.is_empty() {
            self.layout(view);
        } else {
            let origin = self.bounds(view).origin;
            self.set_bounds(view, Rect::from_origin_size(origin, content_size));
        }
        if let Some(previous) = previous {
            self.collect(previous);
        }
        true
    }

    /// Detach the content view, leaving the scroll view empty.
    ///
    /// The old content is destroyed unless application code holds it.
    pub fn clear_content_view(&mut self, scroll: ViewId) -> bool {
        let Some(previous) = self.detach_content(scroll) else {
            return false;
        };
        self.collect(previous);
        true
    }

    pub fn content_view(&self, scroll: ViewId) -> Option<ViewId> {
        match self.views.get(scroll).map(|node| &node.kind) {
            Some(ViewKind::Scroll { content, .. }) => *content,
            _ => None,
        }
    }

    /// Resize the scrollable document
    pub fn set_content_size(&mut self, scroll: ViewId, size: Size) -> bool {
        let Some(handle) = self.live_handle(scroll) else {
            return false;
        };
        let kind = self.views.get_mut(scroll).map(|node| &mut node.kind);
        let Some(ViewKind::Scroll { content, content_size }) = kind else {
            return false;
        };
        *content_size = size;
        let content = *content;

        if let Some(content) = content.filter(|c| self.is_valid(*c)) {
            let origin = self.bounds(content).origin;
            self.set_bounds(content, Rect::from_origin_size(origin, size));
        }
        if let Err(err) = self.toolkit.set_scroll_content_size(handle, size) {
            tracing::warn!(?scroll, "failed to set content size: {err}");
            return false;
        }
        // Re-clamp the offset against the new document size
        let offset = self.toolkit.scroll_offset(handle).unwrap_or_default();
        if let Err(err) = self.toolkit.set_scroll_offset(handle, offset) {
            tracing::warn!(?scroll, "failed to clamp scroll offset: {err}");
        }
        true
    }

    /// Size of the scrollable document
    pub fn content_size(&self, scroll: ViewId) -> Size {
        if let Some(content) = self.content_view(scroll).filter(|c| self.is_valid(*c)) {
            return self.bounds(content).size;
        }
        match self.views.get(scroll).map(|node| &node.kind) {
            Some(ViewKind::Scroll { content_size, .. }) => *content_size,
            _ => Size::ZERO,
        }
    }

    pub fn set_scrollbar_mode(&mut self, scroll: ViewId, axis: Axis, mode: ScrollbarMode) -> bool {
        self.scroll_update(scroll, |toolkit, handle| toolkit.set_scrollbar_mode(handle, axis, mode))
    }

    /// Scrollbar policy as the platform reports it.
    ///
    /// Platforms with a boolean scroller report both enabled modes as
    /// [`ScrollbarMode::HiddenButEnabled`].
    pub fn scrollbar_mode(&self, scroll: ViewId, axis: Axis) -> ScrollbarMode {
        self.scroll_query(scroll, |toolkit, handle| toolkit.scrollbar_mode(handle, axis))
            .unwrap_or_default()
    }

    /// Scroll to a position, clamped to the scrollable range
    pub fn set_scroll_position(&mut self, scroll: ViewId, position: Point) -> bool {
        self.scroll_update(scroll, |toolkit, handle| toolkit.set_scroll_offset(handle, position))
    }

    pub fn scroll_position(&self, scroll: ViewId) -> Point {
        self.scroll_query(scroll, |toolkit, handle| toolkit.scroll_offset(handle))
            .unwrap_or_default()
    }

    pub fn maximum_scroll_position(&self, scroll: ViewId) -> Point {
        if self.live_handle(scroll).is_none() {
            return Point::ZERO;
        }
        let content = self.content_size(scroll);
        let viewport = self.bounds(scroll).size;
        Point::new(
            (content.width - viewport.width).max(0.0),
            (content.height - viewport.height).max(0.0),
        )
    }

    /// Part of the document currently shown in the viewport
    pub fn visible_rect(&self, scroll: ViewId) -> Rect {
        self.scroll_query(scroll, |toolkit, handle| toolkit.visible_rect(handle))
            .unwrap_or_default()
    }

    /// Let the viewport height follow its content between two bounds
    pub fn clip_height_to(&mut self, scroll: ViewId, min_height: f32, max_height: f32) -> bool {
        self.scroll_update(scroll, |toolkit, handle| {
            toolkit.clip_height_to(handle, min_height, max_height)
        })
    }

    /// Lower bound set by [`clip_height_to`](Self::clip_height_to), `-1` when unset
    pub fn min_height(&self, scroll: ViewId) -> f32 {
        self.scroll_query(scroll, |toolkit, handle| toolkit.height_clip(handle))
            .map_or(-1.0, |(min, _)| min)
    }

    /// Upper bound set by [`clip_height_to`](Self::clip_height_to), `-1` when unset
    pub fn max_height(&self, scroll: ViewId) -> f32 {
        self.scroll_query(scroll, |toolkit, handle| toolkit.height_clip(handle))
            .map_or(-1.0, |(_, max)| max)
    }

    pub fn set_allow_keyboard_scrolling(&mut self, scroll: ViewId, allow: bool) -> bool {
        self.set_scroll_flag(scroll, ScrollFlag::KeyboardScrolling, allow)
    }

    pub fn allow_keyboard_scrolling(&self, scroll: ViewId) -> bool {
        self.scroll_flag(scroll, ScrollFlag::KeyboardScrolling)
    }

    pub fn set_draw_overflow_indicator(&mut self, scroll: ViewId, draw: bool) -> bool {
        self.set_scroll_flag(scroll, ScrollFlag::OverflowIndicator, draw)
    }

    pub fn draw_overflow_indicator(&self, scroll: ViewId) -> bool {
        self.scroll_flag(scroll, ScrollFlag::OverflowIndicator)
    }

    pub fn set_overlay_scrollbar(&mut self, scroll: ViewId, overlay: bool) -> bool {
        self.set_scroll_flag(scroll, ScrollFlag::OverlayScrollbar, overlay)
    }

    pub fn is_overlay_scrollbar(&self, scroll: ViewId) -> bool {
        self.scroll_flag(scroll, ScrollFlag::OverlayScrollbar)
    }

    fn set_scroll_flag(&mut self, scroll: ViewId, flag: ScrollFlag, enabled: bool) -> bool {
        self.scroll_update(scroll, |toolkit, handle| toolkit.set_scroll_flag(handle, flag, enabled))
    }

    fn scroll_flag(&self, scroll: ViewId, flag: ScrollFlag) -> bool {
        self.scroll_query(scroll, |toolkit, handle| toolkit.scroll_flag(handle, flag))
            .unwrap_or(false)
    }

    /// Take the content view out of the scroll view, without destroying it
    pub(crate) fn detach_content(&mut self, scroll: ViewId) -> Option<ViewId> {
        self.unlink_content(scroll, true)
    }

    fn unlink_content(&mut self, scroll: ViewId, clear_native: bool) -> Option<ViewId> {
        let kind = self.views.get_mut(scroll).map(|node| &mut node.kind);
        let Some(ViewKind::Scroll { content, .. }) = kind else {
            return None;
        };
        let view = content.take()?;

        self.set_parent(view, None);
        self.set_attachment(view, Attachment::Unattached);
        if let Some(handle) = self.live_handle(scroll).filter(|_| clear_native) {
            if let Err(err) = self.toolkit.set_document(handle, None) {
                tracing::warn!(?scroll, "failed to clear native document: {err}");
            }
        }
        self.set_delete_native(view, true);
        tracing::debug!(?scroll, ?view, "content view detached");
        Some(view)
    }

    fn scroll_handle(&self, scroll: ViewId) -> Option<NativeHandle> {
        match self.views.get(scroll).map(|node| &node.kind) {
            Some(ViewKind::Scroll { .. }) => self.live_handle(scroll),
            _ => None,
        }
    }

    fn scroll_query<R>(
        &self,
        scroll: ViewId,
        query: impl FnOnce(&T, NativeHandle) -> trellis_platform::Result<R>,
    ) -> Option<R> {
        let handle = self.scroll_handle(scroll)?;
        query(&self.toolkit, handle).ok()
    }

    fn scroll_update(
        &mut self,
        scroll: ViewId,
        update: impl FnOnce(&mut T, NativeHandle) -> trellis_platform::Result<()>,
    ) -> bool {
        let Some(handle) = self.scroll_handle(scroll) else {
            return false;
        };
        match update(&mut self.toolkit, handle) {
            Ok(()) => true,
            Err(PlatformError::Unsupported(feature)) => {
                tracing::warn!(toolkit = self.toolkit.name(), "{feature} is not supported");
                false
            }
            Err(err) => {
                tracing::warn!(?scroll, "scroll update failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_platform_headless::HeadlessToolkit;

    use super::*;

    #[test]
    fn test_replacing_content_releases_old() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let scroll = tree.create_scroll().unwrap();
        let default_content = tree.content_view(scroll).unwrap();
        let content = tree.create_container().unwrap();

        assert!(tree.set_content_view(scroll, content));
        assert!(!tree.contains(default_content));
        assert_eq!(tree.content_view(scroll), Some(content));
        assert_eq!(tree.parent(content), Some(scroll));
        assert_eq!(tree.attachment(content), Attachment::ContentView);
        assert!(!tree.set_content_view(scroll, content));
        tree.check_consistency().unwrap();
    }

    #[test]
    fn test_held_content_survives_replacement() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let scroll = tree.create_scroll().unwrap();
        let first = tree.create_view().unwrap();
        let second = tree.create_view().unwrap();
        tree.set_content_view(scroll, first);
        tree.set_content_view(scroll, second);

        assert!(tree.contains(first));
        assert_eq!(tree.parent(first), None);
        assert_eq!(tree.attachment(first), Attachment::Unattached);
        tree.check_consistency().unwrap();
    }

    #[test]
    fn test_content_size_resizes_document() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let scroll = tree.create_scroll().unwrap();
        tree.set_bounds(scroll, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.set_content_size(scroll, Size::new(100.0, 500.0));

        let content = tree.content_view(scroll).unwrap();
        assert_eq!(tree.bounds(content).size, Size::new(100.0, 500.0));
        assert_eq!(tree.content_size(scroll), Size::new(100.0, 500.0));
        assert_eq!(tree.maximum_scroll_position(scroll), Point::new(0.0, 400.0));
    }

    #[test]
    fn test_new_content_takes_stored_size() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let scroll = tree.create_scroll().unwrap();
        tree.set_content_size(scroll, Size::new(50.0, 80.0));
        let content = tree.create_container().unwrap();
        tree.set_content_view(scroll, content);
        assert_eq!(tree.bounds(content).size, Size::new(50.0, 80.0));
    }

    #[test]
    fn test_scroll_position_is_clamped() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let scroll = tree.create_scroll().unwrap();
        tree.set_bounds(scroll, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.set_content_size(scroll, Size::new(100.0, 300.0));

        tree.set_scroll_position(scroll, Point::new(40.0, 500.0));
        assert_eq!(tree.scroll_position(scroll), Point::new(0.0, 200.0));
        assert_eq!(tree.visible_rect(scroll), Rect::new(0.0, 200.0, 100.0, 100.0));

        tree.set_content_size(scroll, Size::new(100.0, 150.0));
        assert_eq!(tree.scroll_position(scroll), Point::new(0.0, 50.0));
    }

    #[test]
    fn test_scrollbar_modes_per_flavor() {
        let mut views = ViewTree::new(HeadlessToolkit::views());
        let scroll = views.create_scroll().unwrap();
        views.set_scrollbar_mode(scroll, Axis::Vertical, ScrollbarMode::HiddenButEnabled);
        assert_eq!(views.scrollbar_mode(scroll, Axis::Vertical), ScrollbarMode::HiddenButEnabled);
        assert_eq!(views.scrollbar_mode(scroll, Axis::Horizontal), ScrollbarMode::Enabled);

        let mut appkit = ViewTree::new(HeadlessToolkit::appkit());
        let scroll = appkit.create_scroll().unwrap();
        appkit.set_scrollbar_mode(scroll, Axis::Horizontal, ScrollbarMode::Enabled);
        assert_eq!(
            appkit.scrollbar_mode(scroll, Axis::Horizontal),
            ScrollbarMode::HiddenButEnabled
        );
        appkit.set_scrollbar_mode(scroll, Axis::Horizontal, ScrollbarMode::Disabled);
        assert_eq!(appkit.scrollbar_mode(scroll, Axis::Horizontal), ScrollbarMode::Disabled);
    }

    #[test]
    fn test_platform_specific_options() {
        let mut views = ViewTree::new(HeadlessToolkit::views());
        let scroll = views.create_scroll().unwrap();
        assert!(views.allow_keyboard_scrolling(scroll));
        assert!(views.set_draw_overflow_indicator(scroll, false));
        assert!(!views.draw_overflow_indicator(scroll));
        assert_eq!(views.min_height(scroll), -1.0);
        assert!(views.clip_height_to(scroll, 10.0, 200.0));
        assert_eq!((views.min_height(scroll), views.max_height(scroll)), (10.0, 200.0));
        assert!(!views.set_overlay_scrollbar(scroll, true));

        let mut appkit = ViewTree::new(HeadlessToolkit::appkit());
        let scroll = appkit.create_scroll().unwrap();
        assert!(appkit.set_overlay_scrollbar(scroll, true));
        assert!(appkit.is_overlay_scrollbar(scroll));
        assert!(!appkit.clip_height_to(scroll, 10.0, 200.0));
        assert_eq!(appkit.max_height(scroll), -1.0);
        assert!(!appkit.allow_keyboard_scrolling(scroll));
        assert_eq!(appkit.visible_rect(scroll), Rect::ZERO);
    }

    #[test]
    fn test_rejects_attached_or_ancestor_content() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let container = tree.create_container().unwrap();
        let scroll = tree.create_scroll().unwrap();
        let child = tree.create_view().unwrap();
        tree.add_child(container, child);
        tree.add_child(container, scroll);

        assert!(!tree.set_content_view(scroll, child));
        assert!(!tree.set_content_view(scroll, container));
        assert!(!tree.set_content_view(scroll, scroll));
        assert_eq!(tree.parent(child), Some(container));
        tree.check_consistency().unwrap();
    }

    #[test]
    fn test_refused_document_leaves_content_in_place() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let scroll = tree.create_scroll().unwrap();
        let current = tree.content_view(scroll).unwrap();
        let other = tree.create_container().unwrap();
        let stray = tree.create_view().unwrap();

        // natively parented behind the tree's back
        let (other_handle, stray_handle) =
            (tree.native_handle(other).unwrap(), tree.native_handle(stray).unwrap());
        tree.toolkit_mut().insert_child(other_handle, stray_handle, 0).unwrap();

        assert!(!tree.set_content_view(scroll, stray));
        assert_eq!(tree.content_view(scroll), Some(current));
        assert_eq!(tree.parent(current), Some(scroll));
        assert_eq!(tree.parent(stray), None);
        let scroll_handle = tree.native_handle(scroll).unwrap();
        assert_eq!(
            tree.toolkit().document(scroll_handle).unwrap(),
            tree.native_handle(current)
        );

        tree.toolkit_mut().remove_child(other_handle, stray_handle).unwrap();
        tree.check_consistency().unwrap();
    }

    #[test]
    fn test_clear_content_view() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let scroll = tree.create_scroll().unwrap();
        let default_content = tree.content_view(scroll).unwrap();

        assert!(tree.clear_content_view(scroll));
        assert_eq!(tree.content_view(scroll), None);
        assert!(!tree.contains(default_content));
        let scroll_handle = tree.native_handle(scroll).unwrap();
        assert_eq!(tree.toolkit().document(scroll_handle).unwrap(), None);
        assert!(!tree.clear_content_view(scroll));

        let held = tree.create_container().unwrap();
        tree.set_content_view(scroll, held);
        assert!(tree.clear_content_view(scroll));
        assert!(tree.is_valid(held));
        assert_eq!(tree.parent(held), None);
        assert_eq!(tree.attachment(held), Attachment::Unattached);
        tree.check_consistency().unwrap();
    }
}
