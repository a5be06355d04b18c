//! Flat-file set of token addresses already processed

use crate::logger::{self, LogTag};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// JSON array of addresses, loaded and saved wholesale each cycle
pub struct SeenAddresses {
    path: PathBuf,
    ordered: Vec<String>,
    index: HashSet<String>,
}

impl SeenAddresses {
    /// Load from `path`; a missing or unreadable file starts empty
    pub fn load(path: &Path) -> Self {
        let ordered: Vec<String> = if path.exists() {
            match std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
            {
                Ok(list) => list,
                Err(e) => {
                    logger::warning(
                        LogTag::Discovery,
                        &format!(
                            "Failed to read seen addresses {}: {}, starting empty",
                            path.display(),
                            e
                        ),
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let mut seen = Self {
            path: path.to_path_buf(),
            ordered: Vec::with_capacity(ordered.len()),
            index: HashSet::with_capacity(ordered.len()),
        };
        seen.extend(ordered);
        seen
    }

    pub fn contains(&self, address: &str) -> bool {
        self.index.contains(address)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Add addresses, ignoring ones already present
    pub fn extend<I>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = String>,
    {
        for address in addresses {
            if self.index.insert(address.clone()) {
                self.ordered.push(address);
            }
        }
    }

    /// Write the whole set back to disk
    pub fn save(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }
        let json = serde_json::to_string(&self.ordered)
            .map_err(|e| format!("Failed to serialize seen addresses: {}", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }
}
