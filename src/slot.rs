// Key-value slots backing the task list

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A store of named string values, written in full on every `set`
pub trait KeyValueStore {
    /// Read the value stored under `key`, or None if the slot was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Validate a slot key
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Slot key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Slot key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid slot key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Open or create the slot directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create slot directory")?;
        Ok(Self { dir })
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", key))
    }

    fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }
}

impl KeyValueStore for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            debug!(file = ?path, "Slot file does not exist");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).context("Failed to read slot file")?;

        debug!(file = ?path, bytes = content.len(), "Read slot");
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.path_for(key);

        // Writers serialize on a sibling lock file; the slot itself is only replaced by rename
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path_for(key))
            .context("Failed to open slot lock file")?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let temp_path = self.temp_path_for(key);
        if let Err(e) = write_synced(&temp_path, value) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.wrap_err(format!("Failed to write slot {}", key)));
        }
        fs::rename(&temp_path, &path).context("Failed to replace slot file")?;

        if let Ok(dir) = File::open(&self.dir) {
            let _ = dir.sync_all();
        }

        debug!(file = ?path, bytes = value.len(), "Wrote slot");
        // Lock is automatically released when `lock` is dropped
        Ok(())
    }
}

fn write_synced(path: &Path, value: &str) -> Result<()> {
    let mut file = File::create(path).context("Failed to create temporary slot file")?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?; // Ensure data is flushed to disk
    Ok(())
}

/// In-process slots with no durability
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    values: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
