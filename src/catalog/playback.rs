//! Resolution of catalog ids to playable files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// An id → path index loaded from one of the `*_index.json` files.
#[derive(Debug, Clone)]
pub struct PlaybackIndex {
    root: PathBuf,
    entries: BTreeMap<String, PathBuf>,
}

impl PlaybackIndex {
    /// Load `index_path`, accepting only files that resolve below `root`.
    pub fn load(index_path: &Path, root: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(index_path)
            .with_context(|| format!("Failed to read index: {}", index_path.display()))?;
        let entries: BTreeMap<String, PathBuf> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse index: {}", index_path.display()))?;
        let root = root
            .canonicalize()
            .with_context(|| format!("Library root is not accessible: {}", root.display()))?;

        Ok(Self { root, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical path for `id`, or `None` if there is no playable file.
    pub fn resolve(&self, id: &str) -> Option<PathBuf> {
        let path = self.entries.get(id)?;
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                debug!(id = id, path = ?path, error = %e, "Indexed file is not accessible");
                return None;
            }
        };

        if !canonical.starts_with(&self.root) {
            warn!(id = id, path = ?canonical, root = ?self.root, "Indexed file lies outside the library root");
            return None;
        }
        canonical.is_file().then_some(canonical)
    }
}
