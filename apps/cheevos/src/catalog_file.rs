//! # Catalog Files
//!
//! Achievement definitions are configuration, not engine logic. They are
//! read from a TOML document with an ordered `[[block]]` array; the built-in
//! default lives in `catalog.toml` next to this crate's manifest.

use cheevos_core::{BlockIndex, CheevoError, Engine};
use serde::Deserialize;
use std::path::Path;

/// The catalog compiled into the binary.
pub const DEFAULT_CATALOG: &str = include_str!("../catalog.toml");

/// Maximum catalog file size (1 MB).
const MAX_CATALOG_FILE_SIZE: u64 = 1024 * 1024;

/// A parsed catalog document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(rename = "block", default)]
    pub blocks: Vec<BlockDef>,
}

/// One `[[block]]` entry: either a one-shot or a series.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDef {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub target: Option<u64>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub targets: Vec<u64>,
    pub description: String,
}

impl BlockDef {
    /// Normalize to parallel label/target lists.
    pub fn series(&self, position: usize) -> Result<(Vec<String>, Vec<u64>), CheevoError> {
        match &self.label {
            Some(label) => {
                if !self.labels.is_empty() || !self.targets.is_empty() {
                    return Err(CheevoError::Config(format!(
                        "block {}: use either `label` or `labels`/`targets`, not both",
                        position
                    )));
                }
                Ok((vec![label.clone()], vec![self.target.unwrap_or(1)]))
            }
            None => {
                if self.target.is_some() {
                    return Err(CheevoError::Config(format!(
                        "block {}: `target` needs `label`; series use `targets`",
                        position
                    )));
                }
                Ok((self.labels.clone(), self.targets.clone()))
            }
        }
    }
}

impl CatalogFile {
    /// Parse a catalog document.
    pub fn parse(text: &str) -> Result<Self, CheevoError> {
        toml::from_str(text).map_err(|e| CheevoError::Config(format!("Invalid catalog: {}", e)))
    }

    /// The built-in catalog.
    pub fn builtin() -> Result<Self, CheevoError> {
        Self::parse(DEFAULT_CATALOG)
    }

    /// Read a catalog from disk, or the built-in one when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, CheevoError> {
        let Some(path) = path else {
            return Self::builtin();
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            CheevoError::Config(format!("Cannot read catalog '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CATALOG_FILE_SIZE {
            return Err(CheevoError::Config(format!(
                "Catalog size {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CATALOG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            CheevoError::Config(format!("Cannot read catalog '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Register every block, in file order.
    pub fn register_all(&self, engine: &mut Engine) -> Result<Vec<BlockIndex>, CheevoError> {
        let mut indices = Vec::with_capacity(self.blocks.len());
        for (position, def) in self.blocks.iter().enumerate() {
            let (labels, targets) = def.series(position)?;
            let index = engine
                .register_series(&labels, &def.description, &targets, |index| {
                    tracing::debug!(block = index.value(), "Catalog block wired");
                })
                .map_err(|e| CheevoError::Config(format!("block {}: {}", position, e)))?;
            indices.push(index);
        }
        Ok(indices)
    }
}
