// Configuration loaded from tasklist.yml

use crate::slot::{FileSlots, KeyValueStore, MemorySlots, validate_key};
use crate::sqlite::SqliteSlots;
use crate::store::{DEFAULT_KEY, TaskStore};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "tasklist.yml";
const DB_FILE: &str = "tasklist.db";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
}

/// Where the task list slot lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Directory holding the slot files or database
    pub path: Option<PathBuf>,
    /// Slot key for the task list
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: None,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sqlite,
    Memory,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content).wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
        info!(file = ?path, "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        validate_key(&config.storage.key)?;
        Ok(config)
    }

    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }
}

impl StorageConfig {
    /// Configured directory, else the per-user data directory, else `./.tasklist`
    pub fn data_dir(&self) -> PathBuf {
        self.path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".tasklist"))
    }

    /// Open the configured backend
    pub fn open_slots(&self) -> Result<Box<dyn KeyValueStore>> {
        let slots: Box<dyn KeyValueStore> = match self.backend {
            Backend::File => Box::new(FileSlots::open(self.data_dir())?),
            Backend::Sqlite => Box::new(SqliteSlots::open(self.data_dir().join(DB_FILE))?),
            Backend::Memory => Box::new(MemorySlots::new()),
        };
        debug!(backend = ?self.backend, "Opened slot backend");
        Ok(slots)
    }

    /// Open the backend and load the task list from it
    pub fn open_store(&self) -> Result<TaskStore> {
        validate_key(&self.key)?;
        Ok(TaskStore::open(self.open_slots()?, self.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.backend, Backend::File);
        assert_eq!(config.storage.key, "todos");
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("storage:\n  backend: sqlite\n").unwrap();
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.storage.key, "todos");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "storage:\n  backend: memory\n  path: /tmp/tasks\n  key: work\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.storage.backend, Backend::Memory);
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/tasks")));
        assert_eq!(config.storage.key, "work");
        assert_eq!(config.storage.data_dir(), PathBuf::from("/tmp/tasks"));
    }

    #[test]
    fn test_rejects_unknown_backend_and_fields() {
        assert!(Config::from_yaml("storage:\n  backend: redis\n").is_err());
        assert!(Config::from_yaml("storage:\n  bakend: file\n").is_err());
        assert!(Config::from_yaml("storage:\n  key: \"bad/key\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasklist.yml");
        fs::write(&path, "storage:\n  key: home\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.storage.key, "home");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(temp.path().join("absent.yml").as_path())).is_err());
    }

    #[test]
    fn test_open_store_per_backend() {
        for backend in [Backend::File, Backend::Sqlite] {
            let temp = TempDir::new().unwrap();
            let storage = StorageConfig {
                backend,
                path: Some(temp.path().to_path_buf()),
                key: "todos".to_string(),
            };

            {
                let mut store = storage.open_store().unwrap();
                store.add(TaskDraft::new("Saved")).unwrap();
            }

            let store = storage.open_store().unwrap();
            assert_eq!(store.len(), 1, "backend {:?}", backend);
        }
    }

    #[test]
    fn test_memory_backend_does_not_persist() {
        let storage = StorageConfig {
            backend: Backend::Memory,
            ..StorageConfig::default()
        };

        {
            let mut store = storage.open_store().unwrap();
            store.add(TaskDraft::new("Gone")).unwrap();
        }

        assert!(storage.open_store().unwrap().is_empty());
    }
}
