use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::KeyValueStorage;

/// Session file name inside the storage directory
const STORE_FILE: &str = "session.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreContents {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// Durable storage backed by a single JSON file on disk.
///
/// Every write is a read-modify-write of the whole file. A file that fails to
/// parse is treated as empty rather than an error, so a corrupted session
/// never wedges the client.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store session state under `dir` (created on first write).
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(STORE_FILE),
        }
    }

    fn load(&self) -> Result<StoreContents> {
        if !self.path.exists() {
            return Ok(StoreContents::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed session file, starting empty");
                Ok(StoreContents::default())
            }
        }
    }

    fn persist(&self, mut contents: StoreContents) -> Result<()> {
        if contents.entries.is_empty() {
            // Last entry gone: drop the file instead of leaving an empty shell
            if self.path.exists() {
                std::fs::remove_file(&self.path).with_context(|| {
                    format!("Failed to remove session file {}", self.path.display())
                })?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        contents.saved_at = Some(Utc::now());
        let serialized = serde_json::to_string_pretty(&contents)?;
        std::fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut contents = self.load()?;
        contents.entries.insert(key.to_string(), value.to_string());
        self.persist(contents)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut contents = self.load()?;
        if contents.entries.remove(key).is_some() {
            self.persist(contents)?;
        }
        Ok(())
    }
}
