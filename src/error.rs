use crate::graph::NodeId;
use crate::persist::ExportFormat;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MindMapError>;

/// Errors produced by the mind-map engine.
///
/// Only [`MindMapError::RootNodeDeletion`] and [`MindMapError::UnsupportedExport`]
/// are meant to reach the user (as a [`Notice`](crate::canvas::Notice)); the rest
/// are logged and degrade to a safe fallback.
#[derive(Debug, Error)]
pub enum MindMapError {
    #[error("Cannot delete the root node")]
    RootNodeDeletion,

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("cannot connect node {0} to itself")]
    SelfConnection(NodeId),

    #[error("required render surface missing: {what}")]
    MissingSurface { what: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("malformed mind map document: {message}")]
    MalformedDocument { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote save rejected (status {status})")]
    RemoteRejected { status: u16 },

    #[error("{0} export is not available yet")]
    UnsupportedExport(ExportFormat),
}

impl MindMapError {
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error should be shown to the user rather than only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::RootNodeDeletion | Self::UnsupportedExport(_))
    }
}
