//! Serialized forms of the graph and the local key-value store they live in.
//!
//! The local record keeps the view transform next to the graph so a reload
//! restores the last view:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "node_1", "x": 540, "y": 380, "text": "Central Idea", "isRoot": true }],
//!   "connections": [{ "from": "node_1", "to": "node_2" }],
//!   "scale": 1.0, "translateX": 0.0, "translateY": 0.0
//! }
//! ```
//!
//! The remote endpoint and the JSON export use [`ExportRecord`], which is the
//! same shape without the view transform.

use crate::error::{MindMapError, Result};
use crate::graph::{GraphDocument, NodeId};
use crate::state::GeometryCache;
use crate::transform::{ViewTransform, ZoomLimits};
use log::warn;
use serde::{Deserialize, Serialize, Serializer};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Positions are stored as whole pixels.
fn serialize_coord<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.round() as i64)
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    #[serde(serialize_with = "serialize_coord")]
    pub x: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub y: f64,
    pub text: String,
    #[serde(default)]
    pub is_root: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from: String,
    pub to: String,
}

/// Graph content without view state, as posted to the remote endpoint and exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// The locally stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapRecord {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub translate_x: f64,
    #[serde(default)]
    pub translate_y: f64,
}

fn node_records(doc: &GraphDocument) -> Vec<NodeRecord> {
    doc.nodes()
        .iter()
        .map(|n| {
            let (x, y) = n.position();
            NodeRecord {
                id: n.id().to_string(),
                x,
                y,
                text: n.text().to_string(),
                is_root: n.is_root(),
            }
        })
        .collect()
}

fn connection_records(doc: &GraphDocument) -> Vec<ConnectionRecord> {
    doc.connections()
        .iter()
        .map(|c| ConnectionRecord {
            from: c.from().to_string(),
            to: c.to().to_string(),
        })
        .collect()
}

impl ExportRecord {
    pub fn from_document(doc: &GraphDocument) -> Self {
        Self {
            nodes: node_records(doc),
            connections: connection_records(doc),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl MindMapRecord {
    pub fn from_document(doc: &GraphDocument) -> Self {
        let view = doc.view();
        Self {
            nodes: node_records(doc),
            connections: connection_records(doc),
            scale: view.scale,
            translate_x: view.translate_x,
            translate_y: view.translate_y,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild `doc` from this record: nodes first, then connections.
    ///
    /// `doc` must be empty. Fails if the nodes break the root or id invariants;
    /// connections that point at unknown nodes or at their own source are
    /// skipped. Returns the number of skipped connections.
    pub fn restore_into(
        &self,
        doc: &mut GraphDocument,
        cache: &GeometryCache,
        limits: &ZoomLimits,
    ) -> Result<usize> {
        for node in &self.nodes {
            if !(node.x.is_finite() && node.y.is_finite()) {
                return Err(MindMapError::malformed(format!(
                    "node {} has a non-finite position",
                    node.id
                )));
            }
            doc.restore_node(
                NodeId::from(node.id.as_str()),
                node.x,
                node.y,
                node.text.clone(),
                node.is_root,
            )?;
        }
        if doc.root().is_none() {
            return Err(MindMapError::malformed("document has no root node"));
        }

        let mut skipped = 0;
        for conn in &self.connections {
            let from = NodeId::from(conn.from.as_str());
            let to = NodeId::from(conn.to.as_str());
            if let Err(e) = doc.connect(&from, &to, cache) {
                warn!("skipping stored connection {} -> {}: {}", from, to, e);
                skipped += 1;
            }
        }

        *doc.view_mut() =
            ViewTransform::new(self.scale, self.translate_x, self.translate_y).sanitized(limits);
        Ok(skipped)
    }
}

// ============================================================================
// Key-value stores
// ============================================================================

/// A local string key-value store holding serialized documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Svg,
    Png,
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "JSON",
            Self::Svg => "SVG",
            Self::Png => "PNG",
            Self::Pdf => "PDF",
        };
        f.write_str(name)
    }
}

/// A file offered to the user for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub contents: String,
}
