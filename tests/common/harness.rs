//! Test harness wrapping a canvas over an in-memory store.
//!
//! Provides helpers for simulating clicks, drags and key presses in screen
//! coordinates, the way the window would deliver them.

#![allow(dead_code)]

use super::RecordingRemote;
use slint_mindmap::{
    GraphCanvas, Key, KeyInput, MemoryStore, MindMapConfig, Modifiers, NodeId, PointerInput,
};
use std::sync::Arc;
use std::time::Duration;

pub struct CanvasHarness {
    pub canvas: GraphCanvas,
    pub store: MemoryStore,
    pub remote: RecordingRemote,
}

impl CanvasHarness {
    /// Fresh canvas with only the root node.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Canvas opened over `store`, restoring whatever it holds.
    pub fn with_store(store: MemoryStore) -> Self {
        Self::with_config(MindMapConfig::default(), store)
    }

    pub fn with_config(config: MindMapConfig, store: MemoryStore) -> Self {
        let remote = RecordingRemote::new();
        let canvas = GraphCanvas::open(config, store.clone())
            .unwrap()
            .with_remote(Arc::new(remote.clone()))
            .with_seed(42);
        Self {
            canvas,
            store,
            remote,
        }
    }

    pub fn root(&self) -> NodeId {
        self.canvas.document().root().unwrap().id().clone()
    }

    /// Screen-space center of a node as currently rendered.
    pub fn center_of(&self, id: &NodeId) -> (f64, f64) {
        let row = self
            .canvas
            .view()
            .node_rows()
            .into_iter()
            .find(|row| row.id.as_str() == id.as_str())
            .unwrap_or_else(|| panic!("no rendered row for {}", id));
        (
            (row.x + row.width / 2.0) as f64,
            (row.y + row.height / 2.0) as f64,
        )
    }

    pub fn click(&mut self, x: f64, y: f64) {
        self.canvas.pointer_down(PointerInput::left(x, y));
        self.canvas.pointer_up();
    }

    pub fn click_node(&mut self, id: &NodeId) {
        let (x, y) = self.center_of(id);
        self.click(x, y);
    }

    /// Press on `from`, move to `to` in `steps` moves, release.
    pub fn drag(&mut self, from: (f64, f64), to: (f64, f64), steps: usize) {
        self.canvas.pointer_down(PointerInput::left(from.0, from.1));
        self.move_pointer(from, to, steps);
        self.canvas.pointer_up();
    }

    pub fn pan(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.canvas.pointer_down(PointerInput::middle(from.0, from.1));
        self.move_pointer(from, to, 4);
        self.canvas.pointer_up();
    }

    fn move_pointer(&mut self, from: (f64, f64), to: (f64, f64), steps: usize) {
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            self.canvas
                .pointer_move(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
        }
    }

    pub fn press(&mut self, key: Key) -> bool {
        self.canvas.handle_key(&KeyInput::plain(key))
    }

    pub fn press_ctrl(&mut self, key: Key) -> bool {
        let ctrl = Modifiers {
            control: true,
            ..Modifiers::NONE
        };
        self.canvas.handle_key(&KeyInput::with_modifiers(key, ctrl))
    }

    /// Wait for background remote saves and apply their results.
    pub fn settle_remote(&mut self) {
        self.canvas.wait_for_remote(Duration::from_secs(5));
    }

    pub fn node_position(&self, id: &NodeId) -> (f64, f64) {
        self.canvas.document().node(id).unwrap().position()
    }
}
