//! Serializable export settings.
//!
//! [`ExportOptions`] can be built in code or loaded from JSON, for example
//! when a front end hands settings to a worker process:
//!
//! ```json
//! {
//!   "platforms": ["android", "web"],
//!   "scaleMode": "fit",
//!   "compression": "best",
//!   "threads": 4
//! }
//! ```
//!
//! Every field is optional; `{}` yields the defaults.

use serde::{Deserialize, Serialize};

use crate::catalog::Platform;
use crate::raster::ScaleMode;
use crate::writer::PngCompression;

/// Settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Platforms to export, in order. Defaults to all of them.
    pub platforms: Vec<Platform>,

    pub scale_mode: ScaleMode,

    pub compression: PngCompression,

    /// Size of a dedicated worker pool. `None` uses rayon's global pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            scale_mode: ScaleMode::default(),
            compression: PngCompression::default(),
            threads: None,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the export to the given platforms.
    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn with_scale_mode(mut self, scale_mode: ScaleMode) -> Self {
        self.scale_mode = scale_mode;
        self
    }

    pub fn with_compression(mut self, compression: PngCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Platforms to export with duplicates removed, keeping first occurrence.
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        let mut platforms = Vec::with_capacity(self.platforms.len());
        for platform in &self.platforms {
            if !platforms.contains(platform) {
                platforms.push(*platform);
            }
        }
        platforms
    }

    /// Serializes the options to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the options to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
