//! Integration tests for the application shell
//!
//! These tests verify that:
//! - Configuration files drive layout behaviour
//! - The registry forgets views once the tree destroys them
//! - Logging can be initialised more than once

use std::fs;

use trellis_app::{logging, AppConfig, AppError, TrellisApp};
use trellis_core::{Rect, Size};
use trellis_platform_headless::{HeadlessContent, HeadlessToolkit};

#[test]
fn test_config_file_drives_layout_direction() {
    let dir = std::env::temp_dir().join(format!("trellis-app-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("trellis.toml"), "[layout]\nweb_defaults = true\n").unwrap();

    let config = AppConfig::load(&dir).unwrap();
    let mut app = TrellisApp::with_config(HeadlessToolkit::views(), &config);
    app.mark_ready();

    let window = app.new_window(Size::new(200.0, 50.0)).unwrap();
    let root = app.new_container().unwrap();
    let a = app.new_view().unwrap();
    let b = app.new_view().unwrap();
    let mut tree = app.tree_mut();
    for view in [a, b] {
        tree.set_style_property(view, "width", 40.0).unwrap();
        tree.add_child(root, view);
    }
    tree.set_window_content_view(window, root);
    drop(tree);

    assert_eq!(app.tree().bounds(b), Rect::new(40.0, 0.0, 40.0, 50.0));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_released_views_leave_the_registry() {
    let mut app = TrellisApp::new(HeadlessToolkit::appkit());
    app.mark_ready();
    let container = app.new_container().unwrap();
    let child = app.new_view().unwrap();
    app.tree_mut().add_child(container, child);

    app.release(child);
    assert_eq!(app.from_id(2), Some(child));

    app.release(container);
    assert_eq!(app.from_id(1), None);
    assert_eq!(app.from_id(2), None);
    assert!(app.all_views().is_empty());

    // ids are never reused
    let next = app.new_view().unwrap();
    assert_eq!(app.id(next), Some(3));
}

#[test]
fn test_web_content_view_needs_ready_app() {
    let mut app = TrellisApp::new(HeadlessToolkit::views());
    let content = HeadlessContent::new(1);
    let err = app.new_web_content_view(&content).unwrap_err();
    assert!(matches!(err, AppError::NotReady { class: "WebContentView" }));

    app.mark_ready();
    let view = app.new_web_content_view(&content).unwrap();
    assert_eq!(app.tree().class_name(view), Some("WebContentView"));
}

#[test]
fn test_logging_init_is_idempotent() {
    logging::init("debug");
    logging::init("not a valid filter [");
}
