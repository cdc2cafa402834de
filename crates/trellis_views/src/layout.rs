//! Layout protocol and style properties
//!
//! A container that has a layout parent delegates to that parent; the
//! nearest layout root recomputes the whole layout tree from its own bounds
//! and pushes computed rectangles down into each visible child.

use trellis_core::{Color, Size, ViewId};
use trellis_layout::{normalize_name, StyleError, StyleValue};
use trellis_platform::NativeToolkit;

use crate::error::{Result, ViewError};
use crate::node::ViewKind;
use crate::tree::ViewTree;

impl<T: NativeToolkit> ViewTree<T> {
    /// Request layout for a view.
    ///
    /// Containers lay themselves out; other views ask their parent container.
    pub fn layout(&mut self, view: ViewId) {
        let Some(node) = self.views.get(view) else {
            return;
        };
        if node.is_container() {
            self.layout_container(view);
        } else if let Some(parent) = node.parent {
            if self.is_container(parent) {
                self.layout_container(parent);
            }
        }
    }

    /// A view is a layout root when it has no layout parent or is not a container
    pub fn is_layout_root(&self, view: ViewId) -> bool {
        let Some(node) = self.views.get(view) else {
            return true;
        };
        !node.is_container() || self.layout.parent(node.layout_node).is_none()
    }

    pub(crate) fn layout_container(&mut self, container: ViewId) {
        if !self.layout_enabled || self.live_handle(container).is_none() {
            return;
        }

        if !self.is_layout_root(container) {
            self.set_dirty(container, true);
            if let Some(parent) = self.parent(container) {
                self.layout_container(parent);
            }
            // The parent skips children whose size did not change
            if self.is_dirty(container) {
                self.set_child_bounds_from_layout(container);
            }
            return;
        }

        let Some(layout_node) = self.views.get(container).map(|node| node.layout_node) else {
            return;
        };
        let size = self.bounds(container).size;
        let (width, height) = (size.width, size.height);
        tracing::trace!(view = ?container, width, height, "computing layout");
        self.layout.compute_root(layout_node, size);
        self.layout_passes += 1;
        self.set_child_bounds_from_layout(container);
    }

    /// Copy computed rectangles into the native bounds of visible children
    pub(crate) fn set_child_bounds_from_layout(&mut self, container: ViewId) {
        self.set_dirty(container, false);
        let Some(node) = self.views.get(container) else {
            return;
        };
        if !node.visible {
            return;
        }
        for child in node.kind.owned_views() {
            let Some(child_node) = self.views.get(child) else {
                continue;
            };
            if !child_node.visible {
                continue;
            }
            if let Some(rect) = self.layout.rect(child_node.layout_node) {
                self.set_bounds(child, rect);
            }
        }
    }

    /// React to a container's native size changing
    pub fn on_size_changed(&mut self, view: ViewId) {
        if !self.layout_enabled || !self.is_container(view) {
            return;
        }
        if self.is_layout_root(view) {
            self.layout_container(view);
        } else {
            self.set_child_bounds_from_layout(view);
        }
    }

    fn set_dirty(&mut self, container: ViewId, value: bool) {
        if let Some(ViewKind::Container { dirty, .. }) =
            self.views.get_mut(container).map(|node| &mut node.kind)
        {
            *dirty = value;
        }
    }

    fn is_dirty(&self, container: ViewId) -> bool {
        matches!(
            self.views.get(container).map(|node| &node.kind),
            Some(ViewKind::Container { dirty: true, .. })
        )
    }

    /// Set one style property without triggering layout.
    ///
    /// Names are matched case-insensitively with separators ignored, so
    /// `"flex-grow"`, `"flexGrow"` and `"flex_grow"` are the same property.
    /// `background-color` takes a hex string and sets the background.
    pub fn set_style_property(
        &mut self,
        view: ViewId,
        name: &str,
        value: impl Into<StyleValue>,
    ) -> Result<()> {
        let value = value.into();
        let Some(layout_node) = self.views.get(view).map(|node| node.layout_node) else {
            return Err(ViewError::UnknownView);
        };

        if normalize_name(name) == "backgroundcolor" {
            let color = match &value {
                StyleValue::Text(text) => Color::parse_hex(text),
                StyleValue::Number(_) => None,
            };
            let Some(color) = color else {
                return Err(StyleError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                }
                .into());
            };
            self.set_background_color(view, color);
            return Ok(());
        }

        self.layout.set_property(layout_node, name, &value)?;
        Ok(())
    }

    /// Apply several style properties, then lay out once.
    ///
    /// Every property is attempted; the first failure is returned.
    pub fn set_style<'a, I>(&mut self, view: ViewId, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, StyleValue)>,
    {
        if !self.contains(view) {
            return Err(ViewError::UnknownView);
        }
        let mut first_error = None;
        for (name, value) in properties {
            if let Err(err) = self.set_style_property(view, name, value) {
                tracing::warn!(?view, "ignoring style property {name}: {err}");
                first_error.get_or_insert(err);
            }
        }
        self.layout(view);
        first_error.map_or(Ok(()), Err)
    }

    /// Text dump of the computed layout of a view's subtree
    pub fn computed_layout(&self, view: ViewId) -> Option<String> {
        let node = self.views.get(view)?;
        Some(self.layout.describe(node.layout_node))
    }

    /// Size the view wants with no constraints
    pub fn preferred_size(&mut self, view: ViewId) -> Size {
        self.measure(view, None, None)
    }

    pub fn preferred_height_for_width(&mut self, view: ViewId, width: f32) -> f32 {
        self.measure(view, Some(width), None).height
    }

    pub fn preferred_width_for_height(&mut self, view: ViewId, height: f32) -> f32 {
        self.measure(view, None, Some(height)).width
    }

    fn measure(&mut self, view: ViewId, width: Option<f32>, height: Option<f32>) -> Size {
        match self.views.get(view) {
            Some(node) => self.layout.measure(node.layout_node, width, height),
            None => Size::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::Rect;
    use trellis_platform_headless::HeadlessToolkit;

    use super::*;

    fn sized(tree: &mut ViewTree<HeadlessToolkit>, width: f32, height: f32) -> ViewId {
        let view = tree.create_view().unwrap();
        let style = [("width", StyleValue::from(width)), ("height", StyleValue::from(height))];
        tree.set_style(view, style).unwrap();
        view
    }

    #[test]
    fn test_root_lays_out_children_in_column() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let root = tree.create_container().unwrap();
        tree.set_bounds(root, Rect::new(0.0, 0.0, 200.0, 100.0));
        let a = sized(&mut tree, 50.0, 20.0);
        let b = sized(&mut tree, 50.0, 30.0);
        tree.add_child(root, a);
        tree.add_child(root, b);

        assert_eq!(tree.bounds(a), Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(tree.bounds(b), Rect::new(0.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn test_nested_container_delegates_to_root() {
        let mut tree = ViewTree::new(HeadlessToolkit::appkit());
        let root = tree.create_container().unwrap();
        tree.set_bounds(root, Rect::new(0.0, 0.0, 100.0, 100.0));
        let inner = tree.create_container().unwrap();
        tree.set_style_property(inner, "flex", 1.0).unwrap();
        tree.add_child(root, inner);
        assert_eq!(tree.bounds(inner), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!tree.is_layout_root(inner));

        let passes = tree.layout_pass_count();
        let leaf = sized(&mut tree, 10.0, 10.0);
        tree.add_child(inner, leaf);

        // the size of `inner` is unchanged, so it pushes its own child bounds
        assert_eq!(tree.layout_pass_count(), passes + 1);
        assert_eq!(tree.bounds(leaf), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_resizing_root_relayouts() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let root = tree.create_container().unwrap();
        let child = tree.create_view().unwrap();
        tree.set_style_property(child, "flex", 1.0).unwrap();
        tree.add_child(root, child);

        tree.set_bounds(root, Rect::new(0.0, 0.0, 300.0, 40.0));
        assert_eq!(tree.bounds(child), Rect::new(0.0, 0.0, 300.0, 40.0));
    }

    #[test]
    fn test_layout_disabled_leaves_bounds_alone() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        tree.set_layout_enabled(false);
        let root = tree.create_container().unwrap();
        tree.set_bounds(root, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = sized(&mut tree, 10.0, 10.0);
        tree.add_child(root, child);

        assert_eq!(tree.bounds(child), Rect::ZERO);
        assert_eq!(tree.layout_pass_count(), 0);
    }

    #[test]
    fn test_background_color_style() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let view = tree.create_view().unwrap();
        tree.set_style_property(view, "background-color", "#FF0000").unwrap();
        assert_eq!(tree.background_color(view), Some(Color::RED));

        assert!(matches!(
            tree.set_style_property(view, "backgroundColor", 3.0),
            Err(ViewError::Style(StyleError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_set_style_reports_first_error() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let view = tree.create_view().unwrap();
        let result = tree.set_style(
            view,
            [
                ("colour", StyleValue::from("red")),
                ("width", StyleValue::from(10.0)),
            ],
        );
        assert_eq!(
            result,
            Err(ViewError::Style(StyleError::UnknownProperty("colour".into())))
        );
        assert_eq!(tree.preferred_size(view).width, 10.0);
    }

    #[test]
    fn test_preferred_sizes() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let root = tree.create_container().unwrap();
        let a = sized(&mut tree, 40.0, 10.0);
        let b = sized(&mut tree, 60.0, 15.0);
        tree.add_child(root, a);
        tree.add_child(root, b);

        assert_eq!(tree.preferred_size(root), Size::new(60.0, 25.0));
        assert_eq!(tree.preferred_height_for_width(root, 100.0), 25.0);
        assert_eq!(tree.preferred_width_for_height(root, 5.0), 60.0);
    }

    #[test]
    fn test_computed_layout_dump() {
        let mut tree = ViewTree::new(HeadlessToolkit::views());
        let root = tree.create_container().unwrap();
        tree.set_bounds(root, Rect::new(0.0, 0.0, 20.0, 20.0));
        let dump = tree.computed_layout(root).unwrap();
        assert!(dump.starts_with("{left: 0, top: 0, width: 20, height: 20,"));
    }
}
