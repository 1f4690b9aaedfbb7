use crate::graph::NodeId;

/// Exclusive node selection: at most one node is selected at a time.
///
/// Selection is view state only. It decides which node is highlighted and
/// which one the Delete key targets, and is never persisted.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    selected: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a node, replacing any previous selection.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, id: NodeId) -> bool {
        if self.selected.as_ref() == Some(&id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Clear the current selection
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Clear the selection if it points at `id` (used when a node is deleted).
    pub fn forget(&mut self, id: &NodeId) -> bool {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}
