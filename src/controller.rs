//! Glue between a Slint window and the [`GraphCanvas`].
//!
//! The [`MindMapController`] shares one canvas across all window callbacks and
//! hands out closures ready to be passed to `on_*` setters.
//!
//! # Example
//!
//! ```ignore
//! use slint::{ModelRc, VecModel};
//! use slint_mindmap::{ConnectionView, FileStore, MindMapConfig, MindMapController, NodeView};
//! use std::rc::Rc;
//!
//! slint::include_modules!();
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let window = MainWindow::new()?;
//!     let config = MindMapConfig::default().with_viewport(1200.0, 800.0);
//!     let ctrl = MindMapController::open(config, FileStore::new("data"))?;
//!
//!     let nodes = Rc::new(VecModel::<NodeData>::default());
//!     ctrl.bind_nodes(nodes.clone(), |row: &NodeView| NodeData {
//!         id: row.id.clone(),
//!         text: row.text.clone(),
//!         x: row.x,
//!         y: row.y,
//!         width: row.width,
//!         height: row.height,
//!         selected: row.selected,
//!     });
//!     let links = Rc::new(VecModel::<LinkData>::default());
//!     ctrl.bind_connections(links.clone(), |row: &ConnectionView| LinkData {
//!         id: row.id.clone(),
//!         path: row.path.clone(),
//!     });
//!     window.set_nodes(ModelRc::from(nodes));
//!     window.set_connections(ModelRc::from(links));
//!
//!     window.on_pointer_pressed(ctrl.pointer_pressed_callback());
//!     window.on_pointer_moved(ctrl.pointer_moved_callback());
//!     window.on_pointer_released(ctrl.pointer_released_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback());
//!     window.on_node_rect_changed(ctrl.node_rect_callback());
//!     window.on_add_child(ctrl.add_child_callback());
//!     window.on_edit_requested(ctrl.edit_requested_callback());
//!     window.on_text_committed(ctrl.text_committed_callback());
//!
//!     let _autosave = ctrl.start_autosave();
//!     window.run()?;
//!     Ok(())
//! }
//! ```

use crate::canvas::{GraphCanvas, Notice};
use crate::config::MindMapConfig;
use crate::error::Result;
use crate::graph::NodeId;
use crate::interaction::{Key, KeyInput, Modifiers, PointerButton, PointerInput, Tool};
use crate::persist::KeyValueStore;
use crate::render::{ConnectionView, NodeView};
use log::debug;
use slint::platform::PointerEventButton;
use slint::{ModelRc, SharedString, Timer, TimerMode, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// How often [`MindMapController::start_autosave`] ticks the canvas.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Shared handle to a canvas. Clone it into callbacks.
#[derive(Clone)]
pub struct MindMapController {
    canvas: Rc<RefCell<GraphCanvas>>,
}

impl MindMapController {
    pub fn new(canvas: GraphCanvas) -> Self {
        Self {
            canvas: Rc::new(RefCell::new(canvas)),
        }
    }

    /// Open the stored mind map (or a fresh one) and wrap it.
    pub fn open(config: MindMapConfig, store: impl KeyValueStore + 'static) -> Result<Self> {
        Ok(Self::new(GraphCanvas::open(config, store)?))
    }

    pub fn canvas(&self) -> Rc<RefCell<GraphCanvas>> {
        self.canvas.clone()
    }

    /// Run `f` with the canvas mutably borrowed.
    pub fn with<R>(&self, f: impl FnOnce(&mut GraphCanvas) -> R) -> R {
        f(&mut self.canvas.borrow_mut())
    }

    /// Keep an application model of node rows in sync with the canvas.
    pub fn bind_nodes<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + PartialEq + 'static,
        F: Fn(&NodeView) -> P + 'static,
    {
        self.canvas.borrow_mut().bind_nodes(model, constructor);
    }

    pub fn bind_connections<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + PartialEq + 'static,
        F: Fn(&ConnectionView) -> P + 'static,
    {
        self.canvas.borrow_mut().bind_connections(model, constructor);
    }

    pub fn nodes_model(&self) -> ModelRc<NodeView> {
        self.canvas.borrow().view().nodes_model()
    }

    pub fn connections_model(&self) -> ModelRc<ConnectionView> {
        self.canvas.borrow().view().connections_model()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.canvas.borrow_mut().take_notices()
    }

    pub fn set_tool(&self, tool: Tool) {
        self.canvas.borrow_mut().set_tool(tool);
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-pressed(x, y, button, alt)`.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32, PointerEventButton, bool) {
        let canvas = self.canvas.clone();
        move |x, y, button, alt| {
            let Some(button) = PointerButton::from_slint(button) else {
                return;
            };
            let input = PointerInput {
                x: x as f64,
                y: y as f64,
                button,
                modifiers: Modifiers {
                    alt,
                    ..Modifiers::NONE
                },
            };
            canvas.borrow_mut().pointer_down(input);
        }
    }

    /// Returns a callback for `pointer-moved(x, y)`.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) {
        let canvas = self.canvas.clone();
        move |x, y| canvas.borrow_mut().pointer_move(x as f64, y as f64)
    }

    /// Returns a callback for `pointer-released()`.
    pub fn pointer_released_callback(&self) -> impl Fn() {
        let canvas = self.canvas.clone();
        move || canvas.borrow_mut().pointer_up()
    }

    /// Returns a callback for `key-pressed(text, shift, control, meta) -> bool`.
    ///
    /// The return value tells the window whether the key was handled.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString, bool, bool, bool) -> bool {
        let canvas = self.canvas.clone();
        move |text, shift, control, meta| {
            let Some(key) = Key::from_text(&text) else {
                return false;
            };
            let modifiers = Modifiers {
                shift,
                alt: false,
                control,
                meta,
            };
            canvas
                .borrow_mut()
                .handle_key(&KeyInput::with_modifiers(key, modifiers))
        }
    }

    /// Returns a callback for `editor-key-pressed(text, shift, current-text) -> bool`.
    pub fn editor_key_pressed_callback(&self) -> impl Fn(SharedString, bool, SharedString) -> bool {
        let canvas = self.canvas.clone();
        move |text, shift, current| {
            let Some(key) = Key::from_text(&text) else {
                return false;
            };
            let modifiers = Modifiers {
                shift,
                ..Modifiers::NONE
            };
            canvas
                .borrow_mut()
                .handle_edit_key(&KeyInput::with_modifiers(key, modifiers), &current)
        }
    }

    /// Returns a callback for `node-rect-changed(id, x, y, width, height)`.
    pub fn node_rect_callback(&self) -> impl Fn(SharedString, f32, f32, f32, f32) {
        let canvas = self.canvas.clone();
        move |id, x, y, w, h| {
            canvas.borrow_mut().report_node_rect(
                &NodeId::from(id.as_str()),
                x as f64,
                y as f64,
                w as f64,
                h as f64,
            );
        }
    }

    /// Returns a callback for `add-child(parent-id)`.
    pub fn add_child_callback(&self) -> impl Fn(SharedString) {
        let canvas = self.canvas.clone();
        move |parent| {
            canvas
                .borrow_mut()
                .add_child_node(&NodeId::from(parent.as_str()));
        }
    }

    /// Returns a callback for `edit-requested(id)` (double click on a label).
    pub fn edit_requested_callback(&self) -> impl Fn(SharedString) {
        let canvas = self.canvas.clone();
        move |id| {
            canvas.borrow_mut().begin_editing(&NodeId::from(id.as_str()));
        }
    }

    /// Returns a callback for `text-committed(text)` (label editor lost focus).
    pub fn text_committed_callback(&self) -> impl Fn(SharedString) {
        let canvas = self.canvas.clone();
        move |text| canvas.borrow_mut().commit_editing(&text)
    }

    // === Timers ===

    /// Tick the canvas from a repeating Slint timer.
    ///
    /// Keep the returned timer alive for as long as autosave should run.
    pub fn start_autosave(&self) -> Timer {
        let timer = Timer::default();
        let canvas = self.canvas.clone();
        timer.start(TimerMode::Repeated, TICK_INTERVAL, move || {
            // a callback further up the stack is using the canvas; next tick
            match canvas.try_borrow_mut() {
                Ok(mut canvas) => canvas.tick(),
                Err(_) => debug!("canvas busy, skipping tick"),
            }
        });
        timer
    }
}
