//! The mind-map graph: nodes, connections and the document that owns them.
//!
//! [`GraphDocument`] is the single source of truth for the editor. Rendering
//! is a projection of it (see [`CanvasView`](crate::CanvasView)) and is never
//! read back.
//!
//! Invariants kept here:
//! - exactly one node is the root once the document is seeded, and it cannot
//!   be removed;
//! - every connection references two distinct, existing nodes, so removing a
//!   node removes its connections in the same call;
//! - node and connection ids come from monotonic counters and are never
//!   handed out twice in a session.

use crate::error::{MindMapError, Result};
use crate::hit_test::NodeRect;
use crate::path::QuadraticCurve;
use crate::state::GeometryCache;
use crate::transform::ViewTransform;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            fn numbered(n: u64) -> Self {
                Self(format!("{}{}", Self::PREFIX, n))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Counter value encoded in the id, if it follows the `<prefix><n>` form.
            pub fn sequence(&self) -> Option<u64> {
                self.0.strip_prefix(Self::PREFIX)?.parse().ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a node, `node_<n>`.
    NodeId,
    "node_"
);

string_id!(
    /// Identifier of a connection, `conn_<n>`.
    ConnectionId,
    "conn_"
);

/// A labelled box on the canvas. Position is the top-left corner in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    x: f64,
    y: f64,
    text: String,
    is_root: bool,
}

impl Node {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

/// A directed edge between two nodes, held by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    from: NodeId,
    to: NodeId,
    curve: QuadraticCurve,
}

impl Connection {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn from(&self) -> &NodeId {
        &self.from
    }

    pub fn to(&self) -> &NodeId {
        &self.to
    }

    /// Canvas-space curve between the endpoint centers. Derived, never persisted.
    pub fn curve(&self) -> &QuadraticCurve {
        &self.curve
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.from == node || &self.to == node
    }
}

impl crate::hit_test::ConnectionGeometry for Connection {
    fn id(&self) -> &ConnectionId { &self.id }
    fn curve(&self) -> &QuadraticCurve { &self.curve }
}

/// Nodes, connections and the persisted view transform.
#[derive(Debug, Clone, Default)]
pub struct GraphDocument {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    view: ViewTransform,
    node_counter: u64,
    connection_counter: u64,
}

impl GraphDocument {
    /// Create an empty, unseeded document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document seeded with its root node.
    pub fn with_root(x: f64, y: f64, text: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.seed_root(x, y, text);
        doc
    }

    /// Add the root node to a document that has none.
    pub(crate) fn seed_root(&mut self, x: f64, y: f64, text: impl Into<String>) -> NodeId {
        debug_assert!(self.root().is_none());
        let id = self.next_node_id();
        self.nodes.push(Node {
            id: id.clone(),
            x,
            y,
            text: text.into(),
            is_root: true,
        });
        id
    }

    fn next_node_id(&mut self) -> NodeId {
        self.node_counter += 1;
        NodeId::numbered(self.node_counter)
    }

    fn next_connection_id(&mut self) -> ConnectionId {
        self.connection_counter += 1;
        ConnectionId::numbered(self.connection_counter)
    }

    // === Queries ===

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    /// Ids of every connection that starts or ends at `node`.
    pub fn connections_of(&self, node: &NodeId) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|c| c.touches(node))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Whether a connection `from → to` already exists.
    ///
    /// Connections are not deduplicated; this only lets callers ask.
    pub fn connection_exists(&self, from: &NodeId, to: &NodeId) -> bool {
        self.connections
            .iter()
            .any(|c| &c.from == from && &c.to == to)
    }

    /// Canvas-space rectangle of a node.
    pub fn node_rect(&self, id: &NodeId, cache: &GeometryCache) -> Option<NodeRect> {
        let node = self.node(id)?;
        let (width, height) = cache.size_of(id);
        Some(NodeRect {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
            width,
            height,
        })
    }

    /// Canvas-space rectangles of every node in insertion (draw) order.
    pub fn node_rects<'a>(&'a self, cache: &'a GeometryCache) -> impl Iterator<Item = NodeRect> + 'a {
        self.nodes.iter().map(move |node| {
            let (width, height) = cache.size_of(&node.id);
            NodeRect {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                width,
                height,
            }
        })
    }

    // === Mutations ===

    /// Add a non-root node and return its id.
    pub fn add_node(&mut self, x: f64, y: f64, text: impl Into<String>) -> NodeId {
        let id = self.next_node_id();
        self.nodes.push(Node {
            id: id.clone(),
            x,
            y,
            text: text.into(),
            is_root: false,
        });
        id
    }

    /// Insert a node with a known id, as read back from storage.
    ///
    /// Advances the node counter past the id so it is never reissued.
    pub(crate) fn restore_node(
        &mut self,
        id: NodeId,
        x: f64,
        y: f64,
        text: String,
        is_root: bool,
    ) -> Result<()> {
        if self.contains_node(&id) {
            return Err(MindMapError::malformed(format!("duplicate node id {}", id)));
        }
        if is_root && self.root().is_some() {
            return Err(MindMapError::malformed(format!(
                "second root node {}",
                id
            )));
        }
        if let Some(n) = id.sequence() {
            self.node_counter = self.node_counter.max(n);
        }
        self.nodes.push(Node {
            id,
            x,
            y,
            text,
            is_root,
        });
        Ok(())
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns the ids of the removed connections. The root node is refused
    /// with [`MindMapError::RootNodeDeletion`] and nothing changes.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Vec<ConnectionId>> {
        let index = self
            .nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| MindMapError::NodeNotFound(id.clone()))?;
        if self.nodes[index].is_root {
            return Err(MindMapError::RootNodeDeletion);
        }

        self.nodes.remove(index);
        let mut removed = Vec::new();
        self.connections.retain(|c| {
            if c.touches(id) {
                removed.push(c.id.clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    /// Connect two distinct existing nodes.
    ///
    /// Parallel connections between the same pair are allowed. The curve is
    /// laid out with `cache` sizes.
    pub fn connect(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        cache: &GeometryCache,
    ) -> Result<ConnectionId> {
        if from == to {
            return Err(MindMapError::SelfConnection(from.clone()));
        }
        let start = self
            .node_rect(from, cache)
            .ok_or_else(|| MindMapError::NodeNotFound(from.clone()))?
            .center();
        let end = self
            .node_rect(to, cache)
            .ok_or_else(|| MindMapError::NodeNotFound(to.clone()))?
            .center();

        let id = self.next_connection_id();
        self.connections.push(Connection {
            id: id.clone(),
            from: from.clone(),
            to: to.clone(),
            curve: QuadraticCurve::between(start, end),
        });
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: &ConnectionId) -> bool {
        let len_before = self.connections.len();
        self.connections.retain(|c| &c.id != id);
        self.connections.len() != len_before
    }

    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| MindMapError::NodeNotFound(id.clone()))?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    pub fn set_text(&mut self, id: &NodeId, text: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| MindMapError::NodeNotFound(id.clone()))?;
        node.text = text.into();
        Ok(())
    }

    /// Recompute one connection's curve from its endpoints' current rects.
    pub fn update_connection(&mut self, id: &ConnectionId, cache: &GeometryCache) -> bool {
        let Some(index) = self.connections.iter().position(|c| &c.id == id) else {
            return false;
        };
        let (from, to) = {
            let c = &self.connections[index];
            (c.from.clone(), c.to.clone())
        };
        match (self.node_rect(&from, cache), self.node_rect(&to, cache)) {
            (Some(a), Some(b)) => {
                self.connections[index].curve = QuadraticCurve::between(a.center(), b.center());
                true
            }
            _ => false,
        }
    }

    /// Recompute every connection curve.
    pub fn update_all_connections(&mut self, cache: &GeometryCache) {
        let ids: Vec<ConnectionId> = self.connections.iter().map(|c| c.id.clone()).collect();
        for id in &ids {
            self.update_connection(id, cache);
        }
    }

    /// Drop all nodes and connections, keeping the id counters.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.view = ViewTransform::default();
    }
}
