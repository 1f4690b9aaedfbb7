//! Editor configuration.
//!
//! [`MindMapConfig`] collects the tunables of the editor: zoom limits, save
//! timing, node placement and the default viewport. Every field has a default,
//! so a config file only needs to name what it overrides:
//!
//! ```json
//! { "maxScale": 4.0, "remoteEndpoint": "https://example.com/api/mindmap" }
//! ```

use crate::error::{MindMapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a [`GraphCanvas`](crate::GraphCanvas).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MindMapConfig {
    /// Key of the single document slot in the local store (default: `"mindmap_data"`).
    pub storage_key: String,
    /// Lower zoom bound (default: 0.25).
    pub min_scale: f64,
    /// Upper zoom bound (default: 3.0).
    pub max_scale: f64,
    /// Multiplier applied per zoom step (default: 1.1).
    pub zoom_factor: f64,
    /// Unconditional local save period (default: 30 s).
    pub autosave_interval_secs: u64,
    /// Quiet time after the last mutation before a debounced save (default: 1000 ms).
    pub save_debounce_millis: u64,
    /// How long a finished save stays on the indicator (default: 2000 ms).
    pub indicator_hide_millis: u64,
    /// Horizontal distance of a child from its parent (default: 200).
    pub child_offset_x: f64,
    /// Maximum vertical jitter of a new child, either direction (default: 50).
    pub child_jitter_y: f64,
    /// Node width used until the UI reports a measured one (default: 120).
    pub default_node_width: f64,
    /// Node height used until the UI reports a measured one (default: 40).
    pub default_node_height: f64,
    /// Label of the seeded root node.
    pub root_text: String,
    /// Label of freshly added nodes.
    pub new_node_text: String,
    /// Width of the render surface in screen pixels.
    pub viewport_width: f64,
    /// Height of the render surface in screen pixels.
    pub viewport_height: f64,
    /// Endpoint for explicit remote saves. No remote save happens when unset.
    pub remote_endpoint: Option<String>,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            storage_key: "mindmap_data".to_string(),
            min_scale: 0.25,
            max_scale: 3.0,
            zoom_factor: 1.1,
            autosave_interval_secs: 30,
            save_debounce_millis: 1000,
            indicator_hide_millis: 2000,
            child_offset_x: 200.0,
            child_jitter_y: 50.0,
            default_node_width: 120.0,
            default_node_height: 40.0,
            root_text: "Central Idea".to_string(),
            new_node_text: "New Node".to_string(),
            viewport_width: 1200.0,
            viewport_height: 800.0,
            remote_endpoint: None,
        }
    }
}

impl MindMapConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the viewport size (builder style).
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the remote save endpoint (builder style).
    pub fn with_remote_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.remote_endpoint = Some(endpoint.into());
        self
    }

    /// Check that the config describes a usable editor.
    ///
    /// A non-positive viewport means the render surface is missing, which is
    /// reported as [`MindMapError::MissingSurface`].
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0)
            || !(self.viewport_height.is_finite() && self.viewport_height > 0.0)
        {
            return Err(MindMapError::MissingSurface {
                what: format!(
                    "viewport {}x{}",
                    self.viewport_width, self.viewport_height
                ),
            });
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(MindMapError::invalid_config(format!(
                "scale bounds [{}, {}] are not a positive range",
                self.min_scale, self.max_scale
            )));
        }
        if self.zoom_factor <= 1.0 {
            return Err(MindMapError::invalid_config(format!(
                "zoom factor {} must be greater than 1",
                self.zoom_factor
            )));
        }
        if self.storage_key.is_empty() {
            return Err(MindMapError::invalid_config("storage key is empty"));
        }
        if self.default_node_width <= 0.0 || self.default_node_height <= 0.0 {
            return Err(MindMapError::invalid_config("default node size must be positive"));
        }
        Ok(())
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_millis)
    }

    pub fn indicator_hide(&self) -> Duration {
        Duration::from_millis(self.indicator_hide_millis)
    }
}
