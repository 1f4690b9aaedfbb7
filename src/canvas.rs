//! The mind-map editing engine.
//!
//! [`GraphCanvas`] owns the [`GraphDocument`] and everything needed to edit it:
//! the view transform, selection, the connect and drag/pan gestures, text
//! editing, the Slint projection and persistence. The application shell owns
//! one instance (usually through a [`MindMapController`](crate::MindMapController))
//! and forwards pointer, keyboard and timer events to it.
//!
//! Event handlers never fail: invariant violations become a [`Notice`] for the
//! user, everything else is logged and the editor keeps its current state.

use crate::autosave::{SaveIndicator, SaveScheduler, SaveStatus};
use crate::config::MindMapConfig;
use crate::error::{MindMapError, Result};
use crate::graph::{ConnectionId, GraphDocument, NodeId};
use crate::hit_test::{find_connection_at, find_node_at};
use crate::interaction::{
    ConnectState, Gesture, Key, KeyInput, PointerButton, PointerInput, Tool,
};
use crate::persist::{Download, ExportFormat, ExportRecord, KeyValueStore, MindMapRecord};
use crate::remote::{HttpRemote, RemoteSaver, RemoteSink};
use crate::render::{CanvasView, ConnectionView, Highlights, NodeView};
use crate::selection::Selection;
use crate::state::GeometryCache;
use crate::transform::{ViewTransform, ZoomLimits};
use log::{debug, error, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slint::VecModel;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Samples used when hit-testing connection curves.
const CONNECTION_HIT_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A message for the user, shown by the shell as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

/// Mind-map editor state and gesture handling.
pub struct GraphCanvas {
    config: MindMapConfig,
    limits: ZoomLimits,
    doc: GraphDocument,
    cache: GeometryCache,
    selection: Selection,
    tool: Tool,
    connect: ConnectState,
    gesture: Gesture,
    editing: Option<NodeId>,
    view: CanvasView,
    store: Box<dyn KeyValueStore>,
    remote: Option<RemoteSaver>,
    scheduler: SaveScheduler,
    indicator: SaveIndicator,
    notices: VecDeque<Notice>,
    rng: SmallRng,
}

impl GraphCanvas {
    /// Create a canvas holding only the root node.
    ///
    /// Fails without creating anything if the config is invalid, including a
    /// missing (zero-sized) render surface.
    pub fn new(config: MindMapConfig, store: impl KeyValueStore + 'static) -> Result<Self> {
        if let Err(e) = config.validate() {
            error!("cannot initialize mind map canvas: {}", e);
            return Err(e);
        }

        let limits = ZoomLimits {
            min: config.min_scale,
            max: config.max_scale,
            factor: config.zoom_factor,
        };
        let cache = GeometryCache::new(config.default_node_width, config.default_node_height);
        let doc = Self::default_document(&config);

        let remote = config.remote_endpoint.as_deref().and_then(|endpoint| {
            match HttpRemote::new(endpoint) {
                Ok(http) => Some(RemoteSaver::new(Arc::new(http))),
                Err(e) => {
                    warn!("remote saving disabled, client for {} failed: {}", endpoint, e);
                    None
                }
            }
        });

        let now = Instant::now();
        let canvas = Self {
            scheduler: SaveScheduler::new(config.save_debounce(), config.autosave_interval(), now),
            indicator: SaveIndicator::new(config.indicator_hide()),
            view: CanvasView::new(config.viewport_width, config.viewport_height),
            limits,
            doc,
            cache,
            selection: Selection::new(),
            tool: Tool::default(),
            connect: ConnectState::default(),
            gesture: Gesture::default(),
            editing: None,
            store: Box::new(store),
            remote,
            notices: VecDeque::new(),
            rng: SmallRng::from_os_rng(),
            config,
        };
        canvas.refresh();
        Ok(canvas)
    }

    /// Create a canvas and restore the stored document, if there is one.
    pub fn open(config: MindMapConfig, store: impl KeyValueStore + 'static) -> Result<Self> {
        let mut canvas = Self::new(config, store)?;
        canvas.load_from_local_storage();
        info!(
            "mind map canvas opened with {} nodes and {} connections",
            canvas.doc.node_count(),
            canvas.doc.connection_count()
        );
        Ok(canvas)
    }

    /// Send explicit saves to `sink` instead of the configured endpoint.
    pub fn with_remote(mut self, sink: Arc<dyn RemoteSink>) -> Self {
        self.remote = Some(RemoteSaver::new(sink));
        self
    }

    /// Make child placement jitter reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    fn default_document(config: &MindMapConfig) -> GraphDocument {
        let (x, y) = Self::root_position(config);
        GraphDocument::with_root(x, y, config.root_text.clone())
    }

    /// Root placement: centered in the viewport.
    fn root_position(config: &MindMapConfig) -> (f64, f64) {
        (
            config.viewport_width / 2.0 - config.default_node_width / 2.0,
            config.viewport_height / 2.0 - config.default_node_height / 2.0,
        )
    }

    // === Accessors ===

    pub fn document(&self) -> &GraphDocument {
        &self.doc
    }

    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }

    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    /// Bind an application model of node rows. See [`CanvasView::bind_nodes`].
    pub fn bind_nodes<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + PartialEq + 'static,
        F: Fn(&NodeView) -> P + 'static,
    {
        self.view.bind_nodes(model, constructor);
    }

    pub fn bind_connections<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + PartialEq + 'static,
        F: Fn(&ConnectionView) -> P + 'static,
    {
        self.view.bind_connections(model, constructor);
    }

    pub fn transform(&self) -> ViewTransform {
        *self.doc.view()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn connect_state(&self) -> &ConnectState {
        &self.connect
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.selection.selected()
    }

    pub fn editing_node(&self) -> Option<&NodeId> {
        self.editing.as_ref()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.indicator.status()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Drain pending user notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    // === Bookkeeping ===

    /// Re-project the model into the Slint models.
    fn refresh(&self) {
        self.view.sync(
            &self.doc,
            &self.cache,
            Highlights {
                selected: self.selection.selected(),
                connect_source: self.connect.source(),
                editing: self.editing.as_ref(),
            },
        );
    }

    /// A persisted part of the document changed.
    fn changed(&mut self) {
        self.scheduler.mark_dirty(Instant::now());
        self.refresh();
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    // === Nodes ===

    /// Add a node with the default label at a canvas-space position.
    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        let text = self.config.new_node_text.clone();
        self.add_node_with_text(x, y, text)
    }

    pub fn add_node_with_text(&mut self, x: f64, y: f64, text: impl Into<String>) -> NodeId {
        let id = self.doc.add_node(x, y, text);
        debug!("added node {} at ({}, {})", id, x, y);
        self.changed();
        id
    }

    /// Add a node to the right of `parent` and connect it.
    ///
    /// Returns `None` and changes nothing if `parent` no longer exists.
    pub fn add_child_node(&mut self, parent: &NodeId) -> Option<NodeId> {
        let (px, py) = self.doc.node(parent)?.position();
        let jitter = self.config.child_jitter_y.max(0.0);
        let dy = self.rng.random_range(-jitter..=jitter);

        let child = self.add_node(px + self.config.child_offset_x, py + dy);
        if let Err(e) = self.connect_nodes(parent, &child) {
            error!("could not connect child {} to {}: {}", child, parent, e);
        }
        Some(child)
    }

    /// Delete a node and its connections.
    ///
    /// The root node is refused: an error notice is queued and nothing changes.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<()> {
        let removed = match self.doc.remove_node(id) {
            Ok(removed) => removed,
            Err(e) => {
                if e.is_user_facing() {
                    self.notify(Notice::error(e.to_string()));
                }
                warn!("delete of {} rejected: {}", id, e);
                return Err(e);
            }
        };
        debug!("deleted node {} and {} connections", id, removed.len());

        self.cache.remove(id);
        self.selection.forget(id);
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
        if self.connect.source() == Some(id) {
            self.connect = ConnectState::Idle;
            self.tool = Tool::Select;
        }
        if matches!(&self.gesture, Gesture::Dragging { node, .. } if node == id) {
            self.gesture = Gesture::None;
        }
        self.changed();
        Ok(())
    }

    /// Replace a node's label.
    pub fn set_node_text(&mut self, id: &NodeId, text: impl Into<String>) -> Result<()> {
        self.doc.set_text(id, text)?;
        self.changed();
        Ok(())
    }

    /// Move a node to a canvas-space position and re-route its connections.
    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64) -> Result<()> {
        self.doc.move_node(id, x, y)?;
        self.doc.update_all_connections(&self.cache);
        self.changed();
        Ok(())
    }

    /// Topmost node under a screen-space point.
    pub fn node_at(&self, screen_x: f64, screen_y: f64) -> Option<NodeId> {
        let (x, y) = self.doc.view().screen_to_canvas(screen_x, screen_y);
        find_node_at(x, y, self.doc.node_rects(&self.cache))
    }

    /// Connection within `tolerance` screen pixels of a screen-space point.
    pub fn connection_at(&self, screen_x: f64, screen_y: f64, tolerance: f64) -> Option<ConnectionId> {
        let view = self.doc.view();
        let (x, y) = view.screen_to_canvas(screen_x, screen_y);
        find_connection_at(
            x,
            y,
            self.doc.connections(),
            view.screen_len_to_canvas(tolerance),
            CONNECTION_HIT_SAMPLES,
        )
    }

    /// Record a node's rendered rectangle, reported by the UI in screen space.
    pub fn report_node_rect(&mut self, id: &NodeId, _x: f64, _y: f64, width: f64, height: f64) {
        if !self.doc.contains_node(id) {
            return;
        }
        let view = *self.doc.view();
        let changed = self.cache.update_size(
            id,
            view.screen_len_to_canvas(width),
            view.screen_len_to_canvas(height),
        );
        if changed {
            for conn in self.doc.connections_of(id) {
                self.doc.update_connection(&conn, &self.cache);
            }
            self.refresh();
        }
    }

    // === Connections ===

    /// Connect two nodes. Parallel connections are allowed.
    pub fn connect_nodes(&mut self, from: &NodeId, to: &NodeId) -> Result<ConnectionId> {
        let id = self.doc.connect(from, to, &self.cache)?;
        debug!("connected {} -> {} as {}", from, to, id);
        self.changed();
        Ok(id)
    }

    pub fn delete_connection(&mut self, id: &ConnectionId) -> bool {
        let removed = self.doc.remove_connection(id);
        if removed {
            self.changed();
        }
        removed
    }

    /// Recompute one connection's curve from its endpoints.
    pub fn update_connection(&mut self, id: &ConnectionId) {
        if self.doc.update_connection(id, &self.cache) {
            self.refresh();
        }
    }

    /// Recompute every connection curve and re-project.
    pub fn update_all_connections(&mut self) {
        self.doc.update_all_connections(&self.cache);
        self.refresh();
    }

    /// Begin the connect gesture from `from` and switch to the connect tool.
    pub fn start_connection(&mut self, from: &NodeId) -> bool {
        if !self.doc.contains_node(from) {
            warn!("cannot start connection from missing node {}", from);
            return false;
        }
        self.connect = ConnectState::Connecting {
            source: from.clone(),
        };
        self.tool = Tool::Connect;
        self.refresh();
        true
    }

    /// Finish the pending connection at `to`.
    ///
    /// Clicking the source again cancels. Either way the gesture ends.
    pub fn complete_connection(&mut self, to: &NodeId) -> Option<ConnectionId> {
        let source = self.connect.source()?.clone();
        let created = if &source == to {
            debug!("connection from {} cancelled", source);
            None
        } else {
            match self.connect_nodes(&source, to) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("could not connect {} -> {}: {}", source, to, e);
                    None
                }
            }
        };
        self.end_connection();
        created
    }

    /// Drop any pending connection and return to the select tool.
    pub fn end_connection(&mut self) {
        self.connect = ConnectState::Idle;
        self.tool = Tool::Select;
        self.refresh();
    }

    /// Switch tools. Choosing a different tool cancels a pending connection.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        if self.connect.source().is_some() {
            self.end_connection();
        }
        self.tool = tool;
        self.refresh();
    }

    // === Selection and editing ===

    pub fn select_node(&mut self, id: &NodeId) {
        if self.doc.contains_node(id) && self.selection.select(id.clone()) {
            self.refresh();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.refresh();
        }
    }

    pub fn begin_editing(&mut self, id: &NodeId) -> bool {
        if !self.doc.contains_node(id) {
            return false;
        }
        self.editing = Some(id.clone());
        self.refresh();
        true
    }

    /// Commit the label being edited (on blur, or Enter without Shift).
    pub fn commit_editing(&mut self, text: &str) {
        let Some(id) = self.editing.take() else {
            return;
        };
        if let Err(e) = self.set_node_text(&id, text) {
            warn!("could not commit text for {}: {}", id, e);
            self.refresh();
        }
    }

    /// Leave the label editor without changing the text.
    pub fn cancel_editing(&mut self) {
        if self.editing.take().is_some() {
            self.refresh();
        }
    }

    /// Key press inside the label editor. Returns `true` if the key is consumed.
    ///
    /// Enter without Shift commits `current_text` instead of inserting a newline.
    pub fn handle_edit_key(&mut self, key: &KeyInput, current_text: &str) -> bool {
        if self.editing.is_none() {
            return false;
        }
        match key.key {
            Key::Enter if !key.modifiers.shift => {
                self.commit_editing(current_text);
                true
            }
            Key::Escape => {
                self.cancel_editing();
                true
            }
            _ => false,
        }
    }

    // === Dragging ===

    /// Begin moving `id` with the pointer at a screen-space position.
    pub fn start_dragging(&mut self, id: &NodeId, screen_x: f64, screen_y: f64) {
        let Some(node) = self.doc.node(id) else {
            return;
        };
        let (nx, ny) = node.position();
        let (px, py) = self.doc.view().screen_to_canvas(screen_x, screen_y);
        self.gesture = Gesture::Dragging {
            node: id.clone(),
            offset: (px - nx, py - ny),
            moved: false,
        };
    }

    // === View ===

    pub fn zoom_in(&mut self) {
        self.doc.view_mut().zoom_in(&self.limits);
        self.view_changed();
    }

    pub fn zoom_out(&mut self) {
        self.doc.view_mut().zoom_out(&self.limits);
        self.view_changed();
    }

    pub fn reset_view(&mut self) {
        self.doc.view_mut().reset();
        self.view_changed();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.doc.view_mut().pan_by(dx, dy);
        self.view_changed();
    }

    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.view.resize(width, height);
    }

    fn view_changed(&mut self) {
        self.scheduler.mark_dirty(Instant::now());
        self.update_all_connections();
    }

    // === Input dispatch ===

    /// Pointer press in screen coordinates.
    pub fn pointer_down(&mut self, input: PointerInput) {
        if input.is_pan() {
            self.gesture = Gesture::Panning {
                last: (input.x, input.y),
            };
            return;
        }
        if input.button != PointerButton::Left {
            return;
        }

        let hit = self.node_at(input.x, input.y);
        let pending = self.connect.source().is_some();
        match hit {
            Some(node) if pending => {
                self.complete_connection(&node);
            }
            Some(node) if self.tool == Tool::Connect => {
                self.start_connection(&node);
            }
            Some(node) => {
                self.select_node(&node);
                self.start_dragging(&node, input.x, input.y);
            }
            None if pending => self.end_connection(),
            None => match self.tool {
                Tool::Node => {
                    let (x, y) = self.doc.view().screen_to_canvas(input.x, input.y);
                    self.add_node(x, y);
                }
                Tool::Select | Tool::Connect => self.clear_selection(),
            },
        }
    }

    /// Pointer motion in screen coordinates.
    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) {
        match self.gesture.clone() {
            Gesture::Dragging { node, offset, .. } => {
                let (px, py) = self.doc.view().screen_to_canvas(screen_x, screen_y);
                if self.doc.move_node(&node, px - offset.0, py - offset.1).is_err() {
                    self.gesture = Gesture::None;
                    return;
                }
                self.gesture = Gesture::Dragging {
                    node,
                    offset,
                    moved: true,
                };
                self.update_all_connections();
            }
            Gesture::Panning { last } => {
                self.doc
                    .view_mut()
                    .pan_by(screen_x - last.0, screen_y - last.1);
                self.gesture = Gesture::Panning {
                    last: (screen_x, screen_y),
                };
                self.update_all_connections();
            }
            Gesture::None => {}
        }
    }

    /// Pointer release. Ends a drag or pan.
    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging { node, moved, .. } => {
                if moved {
                    debug!("finished dragging {}", node);
                    self.changed();
                }
            }
            Gesture::Panning { .. } => self.scheduler.mark_dirty(Instant::now()),
            Gesture::None => {}
        }
    }

    /// Canvas-level key press. Returns `true` if the key was handled.
    ///
    /// While a label is being edited only the save shortcut and Escape apply;
    /// other keys belong to the editor (see [`handle_edit_key`](Self::handle_edit_key)).
    pub fn handle_key(&mut self, key: &KeyInput) -> bool {
        if key.is_save_shortcut() {
            self.save();
            return true;
        }
        if self.editing.is_some() {
            if key.key == Key::Escape {
                self.cancel_editing();
                return true;
            }
            return false;
        }
        match key.key {
            Key::Delete => match self.selection.selected().cloned() {
                Some(id) => {
                    if let Err(e) = self.delete_node(&id) {
                        debug!("delete of {} refused: {}", id, e);
                    }
                    true
                }
                None => false,
            },
            Key::Escape if self.connect.source().is_some() => {
                self.end_connection();
                true
            }
            _ => false,
        }
    }

    // === Persistence ===

    /// Write the document to the local store now.
    pub fn save_to_local_storage(&mut self) -> Result<()> {
        self.save_local_at(Instant::now())
    }

    fn save_local_at(&mut self, now: Instant) -> Result<()> {
        let json = MindMapRecord::from_document(&self.doc).to_json()?;
        self.store.set(&self.config.storage_key, &json)?;
        self.scheduler.saved(now);
        debug!("saved mind map locally ({} bytes)", json.len());
        Ok(())
    }

    /// Replace the document with the stored one.
    ///
    /// Returns `true` if a stored document was loaded. A missing document keeps
    /// the current graph; an unusable one is logged and replaced by the default
    /// single-root graph.
    pub fn load_from_local_storage(&mut self) -> bool {
        let json = match self.store.get(&self.config.storage_key) {
            Ok(Some(json)) => json,
            Ok(None) => return false,
            Err(e) => {
                error!("could not read stored mind map: {}", e);
                return false;
            }
        };
        match self.rebuild_from_json(&json) {
            Ok(skipped) => {
                if skipped > 0 {
                    warn!("dropped {} invalid stored connections", skipped);
                }
                info!(
                    "loaded stored mind map with {} nodes",
                    self.doc.node_count()
                );
                true
            }
            Err(e) => {
                error!("stored mind map is unusable, starting fresh: {}", e);
                self.reset_to_default();
                false
            }
        }
    }

    fn rebuild_from_json(&mut self, json: &str) -> Result<usize> {
        let record = MindMapRecord::from_json(json)?;

        // build on the side so a bad record leaves the editor untouched
        let mut rebuilt = self.doc.clone();
        rebuilt.clear();
        let cache = GeometryCache::new(
            self.config.default_node_width,
            self.config.default_node_height,
        );
        let skipped = record.restore_into(&mut rebuilt, &cache, &self.limits)?;

        self.replace_document(rebuilt, cache);
        self.scheduler.saved(Instant::now());
        Ok(skipped)
    }

    /// Replace the graph with a lone root node. Id counters keep running.
    fn reset_to_default(&mut self) {
        let mut fresh = self.doc.clone();
        fresh.clear();
        let (x, y) = Self::root_position(&self.config);
        fresh.seed_root(x, y, self.config.root_text.clone());
        let cache = GeometryCache::new(
            self.config.default_node_width,
            self.config.default_node_height,
        );
        self.replace_document(fresh, cache);
    }

    fn replace_document(&mut self, doc: GraphDocument, cache: GeometryCache) {
        self.doc = doc;
        self.cache = cache;
        self.selection.clear();
        self.connect = ConnectState::Idle;
        self.tool = Tool::Select;
        self.gesture = Gesture::None;
        self.editing = None;
        self.refresh();
    }

    /// Explicit save: write locally, then post a snapshot to the remote.
    ///
    /// A failed local write still posts the snapshot. The remote result only
    /// updates the save indicator.
    pub fn save(&mut self) {
        let now = Instant::now();
        let local_ok = match self.save_local_at(now) {
            Ok(()) => {
                info!("mind map saved");
                true
            }
            Err(e) => {
                error!("local save failed: {}", e);
                false
            }
        };

        match self.remote.as_mut() {
            Some(remote) => {
                let status = if local_ok {
                    SaveStatus::Saving
                } else {
                    SaveStatus::Failed
                };
                self.indicator.set(status, now);
                if let Err(e) = remote.submit(ExportRecord::from_document(&self.doc)) {
                    error!("remote save not started: {}", e);
                    self.indicator.set(SaveStatus::Failed, now);
                }
            }
            None if local_ok => self.indicator.set(SaveStatus::Saved, now),
            None => self.indicator.set(SaveStatus::Failed, now),
        }
    }

    /// Run timers: due local saves, remote completions and the indicator.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.scheduler.due(now) {
            if let Err(e) = self.save_local_at(now) {
                error!("autosave failed: {}", e);
                self.scheduler.attempted(now);
            }
        }
        let results = match self.remote.as_mut() {
            Some(remote) => remote.poll(),
            None => Vec::new(),
        };
        self.apply_remote_results(results, now);
        self.indicator.tick(now);
    }

    /// Block until in-flight remote saves finish (or `timeout` passes).
    pub fn wait_for_remote(&mut self, timeout: Duration) {
        let results = match self.remote.as_mut() {
            Some(remote) => remote.wait(timeout),
            None => Vec::new(),
        };
        self.apply_remote_results(results, Instant::now());
    }

    fn apply_remote_results(&mut self, results: Vec<Result<()>>, now: Instant) {
        for result in results {
            match result {
                Ok(()) => {
                    debug!("remote save finished");
                    self.indicator.set(SaveStatus::Saved, now);
                }
                Err(e) => {
                    error!("remote save failed: {}", e);
                    self.indicator.set(SaveStatus::Failed, now);
                }
            }
        }
    }

    /// Produce a downloadable export.
    pub fn export(&mut self, format: ExportFormat) -> Result<Download> {
        match format {
            ExportFormat::Json => Ok(Download {
                filename: "mindmap.json".to_string(),
                mime: "application/json",
                contents: ExportRecord::from_document(&self.doc).to_json_pretty()?,
            }),
            ExportFormat::Svg => Ok(Download {
                filename: "mindmap.svg".to_string(),
                mime: "image/svg+xml",
                contents: self.view.overlay_svg(),
            }),
            ExportFormat::Png | ExportFormat::Pdf => {
                let e = MindMapError::UnsupportedExport(format);
                self.notify(Notice::info(e.to_string()));
                Err(e)
            }
        }
    }
}
