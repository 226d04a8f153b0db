//! Configuration stores
//!
//! The calculator treats persistence as an opaque collaborator. Two stores are
//! provided: an in-memory one and a JSON document on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{SavedConfiguration, StoreError};

/// File name used by [`JsonConfigStore`]
pub const CONFIGS_FILE_NAME: &str = "saved_gear_configs.json";

/// Persistence for saved configurations
pub trait ConfigStore {
    /// Persist a new configuration and return its id
    fn save(&mut self, config: SavedConfiguration) -> Result<String, StoreError>;

    /// Load every saved configuration in save order
    fn load_all(&self) -> Result<Vec<SavedConfiguration>, StoreError>;

    /// Delete a configuration by id
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Store that keeps configurations in memory only
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    configs: Vec<SavedConfiguration>,
}

impl MemoryConfigStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn save(&mut self, config: SavedConfiguration) -> Result<String, StoreError> {
        if self.configs.iter().any(|c| c.id == config.id) {
            return Err(StoreError::DuplicateId(config.id));
        }
        let id = config.id.clone();
        self.configs.push(config);
        Ok(id)
    }

    fn load_all(&self) -> Result<Vec<SavedConfiguration>, StoreError> {
        Ok(self.configs.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.configs.len();
        self.configs.retain(|c| c.id != id);
        if self.configs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Store that keeps all configurations in one JSON document.
///
/// Every call reads the document from disk; mutations write it back before
/// returning. A failed write is reported and nothing is retained in memory.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Store backed by `dir/saved_gear_configs.json`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(CONFIGS_FILE_NAME),
        }
    }

    /// Store backed by an explicit file path
    pub fn at_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<SavedConfiguration>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, configs: &[SavedConfiguration]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(configs)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ConfigStore for JsonConfigStore {
    fn save(&mut self, config: SavedConfiguration) -> Result<String, StoreError> {
        let mut configs = self.read()?;
        if configs.iter().any(|c| c.id == config.id) {
            return Err(StoreError::DuplicateId(config.id));
        }
        let id = config.id.clone();
        configs.push(config);
        self.write(&configs)?;
        tracing::info!("Saved configuration {} to {}", id, self.path.display());
        Ok(id)
    }

    fn load_all(&self) -> Result<Vec<SavedConfiguration>, StoreError> {
        self.read()
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let mut configs = self.read()?;
        let before = configs.len();
        configs.retain(|c| c.id != id);
        if configs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write(&configs)?;
        tracing::info!("Deleted configuration {}", id);
        Ok(())
    }
}
