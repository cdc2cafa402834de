//! Layout tree management

use std::fmt::Write as _;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use taffy::prelude::{AvailableSpace, Dimension, Display, NodeId, Style, TaffyTree};
use trellis_core::{Rect, Size};

use crate::property::{self, StyleError, StyleValue};
use crate::style::{LayoutConfig, LayoutStyle};

new_key_type! {
    pub struct LayoutNodeId;
}

/// Maps between Trellis layout node IDs and Taffy node IDs
pub struct LayoutTree {
    taffy: TaffyTree,
    node_map: SlotMap<LayoutNodeId, NodeId>,
    reverse_map: FxHashMap<NodeId, LayoutNodeId>,
    config: LayoutConfig,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        let mut taffy = TaffyTree::new();
        if config.rounding {
            taffy.enable_rounding();
        } else {
            taffy.disable_rounding();
        }
        Self {
            taffy,
            node_map: SlotMap::with_key(),
            reverse_map: FxHashMap::default(),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Create a detached node carrying the initial style
    pub fn create_node(&mut self) -> Option<LayoutNodeId> {
        self.create_node_with_style(LayoutStyle::initial(&self.config))
    }

    /// Create a new layout node with the given style
    pub fn create_node_with_style(&mut self, style: Style) -> Option<LayoutNodeId> {
        let taffy_node = match self.taffy.new_leaf(style) {
            Ok(node) => node,
            Err(err) => {
                tracing::error!("failed to create layout node: {err}");
                return None;
            }
        };
        let id = self.node_map.insert(taffy_node);
        self.reverse_map.insert(taffy_node, id);
        Some(id)
    }

    pub fn contains(&self, id: LayoutNodeId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Get the style of a node
    pub fn style(&self, id: LayoutNodeId) -> Option<&Style> {
        let &taffy_node = self.node_map.get(id)?;
        self.taffy.style(taffy_node).ok()
    }

    /// Set the style for a node
    pub fn set_style(&mut self, id: LayoutNodeId, style: Style) {
        if let Some(&taffy_node) = self.node_map.get(id) {
            let _ = self.taffy.set_style(taffy_node, style);
        }
    }

    /// Edit the style of a node in place
    pub fn update_style(&mut self, id: LayoutNodeId, edit: impl FnOnce(&mut Style)) {
        if let Some(mut style) = self.style(id).cloned() {
            edit(&mut style);
            self.set_style(id, style);
        }
    }

    /// Apply one named style property (`"flex-grow"`, `"width"`, ...)
    pub fn set_property(
        &mut self,
        id: LayoutNodeId,
        name: &str,
        value: &StyleValue,
    ) -> Result<(), StyleError> {
        let mut style = self.style(id).cloned().ok_or(StyleError::UnknownNode)?;
        property::apply(&mut style, name, value)?;
        self.set_style(id, style);
        Ok(())
    }

    /// Toggle between flex display and `display: none`
    pub fn set_display(&mut self, id: LayoutNodeId, visible: bool) {
        self.update_style(id, |style| {
            style.display = if visible { Display::Flex } else { Display::None };
        });
    }

    /// Insert a child at `index` in the parent's child list
    pub fn insert_child_at(
        &mut self,
        parent: LayoutNodeId,
        child: LayoutNodeId,
        index: usize,
    ) -> bool {
        let (Some(&parent_node), Some(&child_node)) =
            (self.node_map.get(parent), self.node_map.get(child))
        else {
            return false;
        };
        match self.taffy.insert_child_at_index(parent_node, index, child_node) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("failed to insert layout child: {err}");
                false
            }
        }
    }

    /// Add a child at the end of the parent's child list
    pub fn add_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> bool {
        let index = self.child_count(parent);
        self.insert_child_at(parent, child, index)
    }

    /// Detach a child from a parent, keeping the child node alive
    pub fn remove_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> bool {
        let (Some(&parent_node), Some(&child_node)) =
            (self.node_map.get(parent), self.node_map.get(child))
        else {
            return false;
        };
        self.taffy.remove_child(parent_node, child_node).is_ok()
    }

    pub fn parent(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        let &taffy_node = self.node_map.get(id)?;
        let parent = self.taffy.parent(taffy_node)?;
        self.reverse_map.get(&parent).copied()
    }

    pub fn children(&self, id: LayoutNodeId) -> Vec<LayoutNodeId> {
        let Some(&taffy_node) = self.node_map.get(id) else {
            return Vec::new();
        };
        self.taffy
            .children(taffy_node)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| self.reverse_map.get(&child).copied())
            .collect()
    }

    pub fn child_count(&self, id: LayoutNodeId) -> usize {
        self.node_map
            .get(id)
            .and_then(|&taffy_node| self.taffy.children(taffy_node).ok())
            .map_or(0, |children| children.len())
    }

    /// Compute layout for a tree rooted at the given node.
    ///
    /// The root is sized exactly to `size`, whatever its own style says,
    /// because a root's bounds are owned by its native widget.
    pub fn compute_root(&mut self, root: LayoutNodeId, size: Size) {
        let Some(&taffy_node) = self.node_map.get(root) else {
            return;
        };
        let Ok(original) = self.taffy.style(taffy_node).cloned() else {
            return;
        };

        let mut sized = original.clone();
        sized.size = taffy::geometry::Size {
            width: Dimension::Length(size.width.max(0.0)),
            height: Dimension::Length(size.height.max(0.0)),
        };
        let _ = self.taffy.set_style(taffy_node, sized);
        let available = taffy::geometry::Size {
            width: AvailableSpace::Definite(size.width.max(0.0)),
            height: AvailableSpace::Definite(size.height.max(0.0)),
        };
        if let Err(err) = self.taffy.compute_layout(taffy_node, available) {
            tracing::error!("layout computation failed: {err}");
        }
        let _ = self.taffy.set_style(taffy_node, original);
    }

    /// Measure a subtree with optionally constrained width and height.
    ///
    /// Unconstrained axes size to their max-content.
    pub fn measure(&mut self, root: LayoutNodeId, width: Option<f32>, height: Option<f32>) -> Size {
        let Some(&taffy_node) = self.node_map.get(root) else {
            return Size::ZERO;
        };
        let space =
            |value: Option<f32>| value.map_or(AvailableSpace::MaxContent, AvailableSpace::Definite);
        let available = taffy::geometry::Size {
            width: space(width),
            height: space(height),
        };
        if let Err(err) = self.taffy.compute_layout(taffy_node, available) {
            tracing::error!("layout measurement failed: {err}");
            return Size::ZERO;
        }
        self.taffy
            .layout(taffy_node)
            .map(|layout| Size::new(layout.size.width, layout.size.height))
            .unwrap_or_default()
    }

    /// Get the computed bounds of a node, relative to its layout parent
    pub fn rect(&self, id: LayoutNodeId) -> Option<Rect> {
        let &taffy_node = self.node_map.get(id)?;
        let layout = self.taffy.layout(taffy_node).ok()?;
        Some(Rect::new(
            layout.location.x,
            layout.location.y,
            layout.size.width,
            layout.size.height,
        ))
    }

    /// Remove a node
    pub fn remove_node(&mut self, id: LayoutNodeId) {
        if let Some(taffy_node) = self.node_map.remove(id) {
            self.reverse_map.remove(&taffy_node);
            let _ = self.taffy.remove(taffy_node);
        }
    }

    /// Human readable dump of the computed layout of a subtree
    pub fn describe(&self, id: LayoutNodeId) -> String {
        let mut out = String::new();
        self.describe_into(id, 0, &mut out);
        out
    }

    fn describe_into(&self, id: LayoutNodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let rect = self.rect(id).unwrap_or_default();
        let display = match self.style(id).map(|style| style.display) {
            Some(Display::None) => " display: none,",
            _ => "",
        };
        let _ = write!(
            out,
            "{indent}{{left: {}, top: {}, width: {}, height: {},{display}",
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height()
        );

        let children = self.children(id);
        if children.is_empty() {
            out.push_str("}\n");
            return;
        }
        out.push_str(" children: [\n");
        for child in children {
            self.describe_into(child, depth + 1, out);
        }
        let _ = writeln!(out, "{indent}]}}");
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}
