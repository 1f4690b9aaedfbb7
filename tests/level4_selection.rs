//! Level 4: Selection & Graph Operation Tests
//!
//! Tests click selection, the node tool, child creation and root protection.

mod common;

use common::harness::CanvasHarness;
use slint_mindmap::{MindMapError, NodeId, NoticeLevel, Tool};

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_click_on_node_selects_it() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    harness.click_node(&root);

    assert_eq!(harness.canvas.selected_node(), Some(&root));
    assert!(harness.canvas.view().node_rows()[0].selected);
}

#[test]
fn test_click_replaces_selection() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    let other = harness.canvas.add_node(100.0, 100.0);

    harness.click_node(&root);
    harness.click_node(&other);

    assert_eq!(harness.canvas.selected_node(), Some(&other));
    let rows = harness.canvas.view().node_rows();
    assert_eq!(rows.iter().filter(|r| r.selected).count(), 1);
}

#[test]
fn test_click_empty_canvas_clears_selection() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    harness.click_node(&root);
    harness.click(10.0, 10.0);

    assert_eq!(harness.canvas.selected_node(), None);
}

#[test]
fn test_select_missing_node_ignored() {
    let mut harness = CanvasHarness::new();
    harness.canvas.select_node(&NodeId::from("node_50"));
    assert_eq!(harness.canvas.selected_node(), None);
}

#[test]
fn test_topmost_node_wins() {
    let mut harness = CanvasHarness::new();
    let below = harness.canvas.add_node(100.0, 100.0);
    let above = harness.canvas.add_node(150.0, 110.0);

    // overlap region of both nodes
    assert_eq!(harness.canvas.node_at(160.0, 120.0), Some(above));
    assert_eq!(harness.canvas.node_at(110.0, 105.0), Some(below));
    assert_eq!(harness.canvas.node_at(5.0, 5.0), None);
}

// ============================================================================
// Node tool
// ============================================================================

#[test]
fn test_node_tool_adds_node_at_click() {
    let mut harness = CanvasHarness::new();
    harness.canvas.set_tool(Tool::Node);
    harness.click(100.0, 50.0);

    let doc = harness.canvas.document();
    assert_eq!(doc.node_count(), 2);
    let node = &doc.nodes()[1];
    assert_eq!(node.text(), "New Node");
    assert_eq!(node.position(), (100.0, 50.0));
    assert!(!node.is_root());
}

#[test]
fn test_node_tool_respects_view_transform() {
    let mut harness = CanvasHarness::new();
    harness.pan((0.0, 0.0), (50.0, 0.0));
    harness.canvas.zoom_in();
    harness.canvas.set_tool(Tool::Node);
    harness.click(160.0, 110.0);

    let (x, y) = harness.canvas.document().nodes()[1].position();
    assert!((x - 100.0).abs() < 1e-9);
    assert!((y - 100.0).abs() < 1e-9);
}

#[test]
fn test_node_tool_click_on_node_selects() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    harness.canvas.set_tool(Tool::Node);
    harness.click_node(&root);

    assert_eq!(harness.canvas.document().node_count(), 1);
    assert_eq!(harness.canvas.selected_node(), Some(&root));
}

#[test]
fn test_select_tool_empty_click_adds_nothing() {
    let mut harness = CanvasHarness::new();
    harness.click(100.0, 50.0);
    assert_eq!(harness.canvas.document().node_count(), 1);
}

// ============================================================================
// Children and deletion
// ============================================================================

#[test]
fn test_add_child_then_delete_root_is_rejected() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    let child = harness.canvas.add_child_node(&root).unwrap();
    harness.canvas.set_node_text(&child, "Idea 1").unwrap();

    let doc = harness.canvas.document();
    assert_eq!(doc.node_count(), 2);
    assert_eq!(doc.connection_count(), 1);
    assert_eq!(doc.connections()[0].from(), &root);
    assert_eq!(doc.connections()[0].to(), &child);

    let result = harness.canvas.delete_node(&root);
    assert!(matches!(result, Err(MindMapError::RootNodeDeletion)));

    let doc = harness.canvas.document();
    assert_eq!(doc.node_count(), 2);
    assert_eq!(doc.connection_count(), 1);
    assert_eq!(doc.node(&child).unwrap().text(), "Idea 1");
}

#[test]
fn test_root_delete_shows_error_notice() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    let _ = harness.canvas.delete_node(&root);

    let notices = harness.canvas.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Cannot delete the root node");
    assert!(harness.canvas.take_notices().is_empty());
}

#[test]
fn test_child_placement() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    for _ in 0..20 {
        let child = harness.canvas.add_child_node(&root).unwrap();
        let (x, y) = harness.node_position(&child);
        assert_eq!(x, 740.0);
        assert!((330.0..=430.0).contains(&y), "y = {}", y);
    }
}

#[test]
fn test_child_of_child() {
    let mut harness = CanvasHarness::new();
    let root = harness.root();
    let child = harness.canvas.add_child_node(&root).unwrap();
    let grandchild = harness.canvas.add_child_node(&child).unwrap();

    assert_eq!(harness.node_position(&grandchild).0, 940.0);
    assert!(harness.canvas.document().connection_exists(&child, &grandchild));
}

#[test]
fn test_delete_missing_node_is_error_without_notice() {
    let mut harness = CanvasHarness::new();
    let result = harness.canvas.delete_node(&NodeId::from("node_77"));
    assert!(matches!(result, Err(MindMapError::NodeNotFound(_))));
    assert!(harness.canvas.take_notices().is_empty());
}

#[test]
fn test_node_ids_never_reused() {
    let mut harness = CanvasHarness::new();
    let a = harness.canvas.add_node(0.0, 0.0);
    harness.canvas.delete_node(&a).unwrap();
    let b = harness.canvas.add_node(0.0, 0.0);

    assert_eq!(a.as_str(), "node_2");
    assert_eq!(b.as_str(), "node_3");
}

#[test]
fn test_delete_removes_rendered_row() {
    let mut harness = CanvasHarness::new();
    let a = harness.canvas.add_node(0.0, 0.0);
    assert_eq!(harness.canvas.view().node_rows().len(), 2);
    harness.canvas.delete_node(&a).unwrap();
    assert_eq!(harness.canvas.view().node_rows().len(), 1);
}
