//! # Slint Mind Map
//!
//! The editing engine behind a mind-map editor: a graph of text nodes linked
//! by curved connections, laid out freely on a pannable, zoomable canvas.
//!
//! ## Features
//!
//! - **Graph model** - [`GraphDocument`] with a single undeletable root node and
//!   cascade delete of connections
//! - **Gestures** - drag, pan, zoom, two-click connect and in-place label editing
//!   through one pointer handler on [`GraphCanvas`]
//! - **Slint projection** - [`CanvasView`] keeps `VecModel`s of screen-space rows
//!   in sync with the graph
//! - **Persistence** - debounced and periodic local saves through a
//!   [`KeyValueStore`], explicit saves posted to a [`RemoteSink`] in the background
//! - **Export** - JSON and SVG downloads
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_mindmap::{GraphCanvas, MemoryStore, MindMapConfig, PointerInput};
//!
//! let mut canvas = GraphCanvas::open(MindMapConfig::default(), MemoryStore::new())?;
//! let root = canvas.document().root().unwrap().id().clone();
//! let child = canvas.add_child_node(&root).unwrap();
//! canvas.pointer_down(PointerInput::left(560.0, 390.0));
//! canvas.save();
//! ```
//!
//! In a Slint application use [`MindMapController`], which hands out ready-made
//! window callbacks and drives autosave from a `slint::Timer`.

pub mod autosave;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod path;
pub mod persist;
pub mod remote;
pub mod render;
pub mod selection;
pub mod state;
pub mod transform;

pub use autosave::{SaveIndicator, SaveScheduler, SaveStatus};
pub use canvas::{GraphCanvas, Notice, NoticeLevel};
pub use config::MindMapConfig;
pub use controller::MindMapController;
pub use error::{MindMapError, Result};
pub use graph::{Connection, ConnectionId, GraphDocument, Node, NodeId};
pub use hit_test::{find_connection_at, find_node_at, ConnectionGeometry, NodeGeometry, NodeRect};
pub use interaction::{
    ConnectState, Gesture, Key, KeyInput, Modifiers, PointerButton, PointerInput, Tool,
};
pub use path::QuadraticCurve;
pub use persist::{
    ConnectionRecord, Download, ExportFormat, ExportRecord, FileStore, KeyValueStore,
    MemoryStore, MindMapRecord, NodeRecord,
};
pub use remote::{HttpRemote, RemoteSaver, RemoteSink};
pub use render::{CanvasView, ConnectionView, Highlights, NodeView};
pub use selection::Selection;
pub use state::GeometryCache;
pub use transform::{ViewTransform, ZoomLimits};
