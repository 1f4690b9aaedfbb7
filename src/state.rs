use crate::graph::NodeId;
use std::collections::HashMap;

/// Measured node sizes in **canvas space**.
///
/// The UI reports node rectangles in screen coordinates after layout; the
/// canvas converts them before storing, so the cache stays valid across zoom
/// and pan changes. Nodes that have not been measured yet use the default size.
#[derive(Debug, Clone)]
pub struct GeometryCache {
    sizes: HashMap<NodeId, (f64, f64)>,
    default_size: (f64, f64),
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new(120.0, 40.0)
    }
}

impl GeometryCache {
    pub fn new(default_width: f64, default_height: f64) -> Self {
        Self {
            sizes: HashMap::new(),
            default_size: (default_width, default_height),
        }
    }

    /// Record a measured canvas-space size. Non-positive sizes are ignored.
    pub fn update_size(&mut self, id: &NodeId, width: f64, height: f64) -> bool {
        if !(width > 0.0 && height > 0.0) {
            return false;
        }
        let changed = self.sizes.get(id) != Some(&(width, height));
        self.sizes.insert(id.clone(), (width, height));
        changed
    }

    /// Size of a node, falling back to the default when unmeasured.
    pub fn size_of(&self, id: &NodeId) -> (f64, f64) {
        self.sizes.get(id).copied().unwrap_or(self.default_size)
    }

    pub fn is_measured(&self, id: &NodeId) -> bool {
        self.sizes.contains_key(id)
    }

    pub fn remove(&mut self, id: &NodeId) {
        self.sizes.remove(id);
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
    }

    pub fn default_size(&self) -> (f64, f64) {
        self.default_size
    }
}
