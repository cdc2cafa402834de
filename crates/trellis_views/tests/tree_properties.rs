//! Integration tests for the structural guarantees of the view tree
//!
//! Every test runs against both toolkit flavors:
//! - Parent and child references always agree
//! - Model, layout and native child orders are identical
//! - Rejected mutations leave every tree untouched
//! - Reparenting carries window ownership along

use trellis_core::{Rect, Size};
use trellis_platform_headless::HeadlessToolkit;
use trellis_views::{Attachment, ViewId, ViewTree};

fn flavors() -> [ViewTree<HeadlessToolkit>; 2] {
    [
        ViewTree::new(HeadlessToolkit::appkit()),
        ViewTree::new(HeadlessToolkit::views()),
    ]
}

fn views(tree: &mut ViewTree<HeadlessToolkit>, count: usize) -> Vec<ViewId> {
    (0..count).map(|_| tree.create_view().unwrap()).collect()
}

/// Test that inserting at the front pushes existing children back
#[test]
fn test_insert_at_front_orders_children() {
    for mut tree in flavors() {
        let a = tree.create_container().unwrap();
        let x = tree.create_view().unwrap();
        let y = tree.create_view().unwrap();

        tree.add_child_at(a, x, 0);
        tree.add_child_at(a, y, 0);

        assert_eq!(tree.children(a), &[y, x]);
        tree.check_consistency().unwrap();
    }
}

/// Test that random structural edits keep all three trees in step
#[test]
fn test_orders_stay_identical_through_edits() {
    for mut tree in flavors() {
        let root = tree.create_container().unwrap();
        let nested = tree.create_container().unwrap();
        let leaves = views(&mut tree, 6);

        tree.add_child(root, nested);
        for (i, leaf) in leaves.iter().enumerate() {
            let target = if i % 2 == 0 { root } else { nested };
            let index = tree.child_count(target) / 2;
            assert!(tree.add_child_at(target, *leaf, index));
            tree.check_consistency().unwrap();
        }

        tree.set_top_child(root, nested);
        tree.check_consistency().unwrap();
        tree.remove_child(nested, leaves[1]);
        tree.check_consistency().unwrap();
        tree.add_child_at(root, leaves[1], 0);
        tree.check_consistency().unwrap();

        assert_eq!(tree.child_at(root, 0), Some(leaves[1]));
        assert_eq!(tree.children(root).last(), Some(&nested));
    }
}

/// Test that adding an already parented view changes nothing
#[test]
fn test_double_parenting_is_rejected() {
    for mut tree in flavors() {
        let first = tree.create_container().unwrap();
        let second = tree.create_container().unwrap();
        let other = tree.create_view().unwrap();
        let view = tree.create_view().unwrap();
        tree.add_child(first, view);
        tree.add_child(second, other);

        assert!(!tree.add_child_at(second, view, 0));
        assert!(!tree.add_child_at(second, view, 1));

        assert_eq!(tree.children(first), &[view]);
        assert_eq!(tree.children(second), &[other]);
        assert_eq!(tree.parent(view), Some(first));
        tree.check_consistency().unwrap();
    }
}

/// Test that out of range indices and self insertion are rejected
#[test]
fn test_invalid_insertions_are_rejected() {
    for mut tree in flavors() {
        let container = tree.create_container().unwrap();
        let view = tree.create_view().unwrap();

        assert!(!tree.add_child_at(container, view, 1));
        assert!(!tree.add_child_at(container, container, 0));
        assert!(tree.children(container).is_empty());
        assert_eq!(tree.parent(view), None);
        assert_eq!(tree.attachment(view), Attachment::Unattached);
    }
}

/// Test that moving a view between windows updates parent and window
#[test]
fn test_reparent_round_trip() {
    for mut tree in flavors() {
        let window_a = tree.create_window(Size::new(200.0, 200.0)).unwrap();
        let window_b = tree.create_window(Size::new(300.0, 100.0)).unwrap();
        let a = tree.create_container().unwrap();
        let b = tree.create_container().unwrap();
        tree.set_window_content_view(window_a, a);
        tree.set_window_content_view(window_b, b);
        let nested = tree.create_container().unwrap();
        let v = tree.create_view().unwrap();
        tree.add_child(nested, v);
        tree.add_child(a, nested);
        assert_eq!(tree.window(v), Some(window_a));

        assert!(tree.remove_child(a, nested));
        assert_eq!(tree.window(nested), None);
        assert_eq!(tree.window(v), None);
        assert!(tree.add_child(b, nested));

        assert_eq!(tree.parent(nested), Some(b));
        assert!(!tree.children(a).contains(&nested));
        assert_eq!(tree.children(b).iter().filter(|c| **c == nested).count(), 1);
        assert_eq!(tree.window(nested), Some(window_b));
        assert_eq!(tree.window(v), Some(window_b));
        tree.check_consistency().unwrap();
    }
}

/// Test that a scroll view's content can be replaced
#[test]
fn test_scroll_content_replacement() {
    for mut tree in flavors() {
        let s = tree.create_scroll().unwrap();
        let c1 = tree.create_container().unwrap();
        let c2 = tree.create_container().unwrap();

        tree.set_content_view(s, c1);
        tree.set_content_view(s, c2);

        assert_eq!(tree.parent(c1), None);
        assert_eq!(tree.content_view(s), Some(c2));
        assert_eq!(tree.parent(c2), Some(s));
        tree.check_consistency().unwrap();
    }
}

/// Test that raising a child keeps everyone's parent
#[test]
fn test_set_top_child_moves_to_end() {
    for mut tree in flavors() {
        let container = tree.create_container().unwrap();
        let children = views(&mut tree, 3);
        let (x, y, z) = (children[0], children[1], children[2]);
        for child in &children {
            tree.add_child(container, *child);
        }

        assert!(tree.set_top_child(container, x));

        assert_eq!(tree.children(container), &[y, z, x]);
        assert_eq!(tree.parent(y), Some(container));
        assert_eq!(tree.parent(z), Some(container));
        tree.check_consistency().unwrap();
    }
}

/// Test that showing an already visible view does not lay out again
#[test]
fn test_set_visible_twice_lays_out_once() {
    for mut tree in flavors() {
        let container = tree.create_container().unwrap();
        tree.set_bounds(container, Rect::new(0.0, 0.0, 100.0, 100.0));
        let view = tree.create_view().unwrap();
        tree.add_child(container, view);
        tree.set_visible(view, false);

        let before = tree.layout_pass_count();
        tree.set_visible(view, true);
        tree.set_visible(view, true);

        assert_eq!(tree.layout_pass_count(), before + 1);
        assert!(tree.is_visible(view));
    }
}

/// Test that a view deleted by the platform leaves the tree cleanly
#[test]
fn test_platform_deletion_of_container() {
    for mut tree in flavors() {
        let root = tree.create_container().unwrap();
        let middle = tree.create_container().unwrap();
        let leaf = tree.create_view().unwrap();
        tree.add_child(middle, leaf);
        tree.add_child(root, middle);

        let handle = tree.native_handle(middle).unwrap();
        tree.toolkit_mut().destroy_from_platform(handle).unwrap();
        tree.pump_toolkit_events();

        assert!(!tree.is_valid(middle));
        assert!(!tree.is_valid(leaf));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.parent(leaf), None);
        assert_eq!(tree.bounds(leaf), Rect::ZERO);
        tree.check_consistency().unwrap();

        tree.release(middle);
        tree.release(leaf);
        tree.release(root);
        assert_eq!(tree.view_count(), 0);
        assert_eq!(tree.toolkit().widget_count(), 0);
    }
}

/// Test that releasing everything leaves no widget behind
#[test]
fn test_teardown_destroys_every_widget() {
    for mut tree in flavors() {
        let window = tree.create_window(Size::new(100.0, 100.0)).unwrap();
        let root = tree.create_container().unwrap();
        let scroll = tree.create_scroll().unwrap();
        let content = tree.content_view(scroll).unwrap();
        let leaf = tree.create_view().unwrap();
        tree.add_child(content, leaf);
        tree.add_child(root, scroll);
        tree.set_window_content_view(window, root);
        for view in [leaf, scroll, root] {
            tree.release(view);
        }
        assert_eq!(tree.view_count(), 4);

        tree.close_window(window);
        assert_eq!(tree.view_count(), 0);
        assert_eq!(tree.toolkit().widget_count(), 0);
    }
}
