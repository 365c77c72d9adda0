//! Durable storage for the loan collection.
//!
//! Loans live in a single key-value slot ([`BOOKS_KEY`]) holding a JSON array.
//! [`PersistenceBridge`] serializes the whole collection on every save and
//! rehydrates it once at startup; it never writes deltas.

use crate::domain::LoanRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the slot holding the loan collection.
pub const BOOKS_KEY: &str = "books";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize loan records: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("slot {key:?} does not contain a valid loan list: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// What to do when the slot exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// Refuse to start.
    #[default]
    FailFast,
    /// Move the unreadable slot aside and start with an empty collection.
    Reset,
}

/// Minimal string key-value storage, the local equivalent of a browser's
/// `localStorage`.
pub trait KeyValueStore: std::fmt::Debug {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;

    /// Overwrites the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()>;

    /// Moves the value under `key` out of the way without deleting it.
    fn quarantine(&mut self, key: &str) -> PersistenceResult<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        // Write beside the target and rename so readers never see a partial file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))
    }

    fn quarantine(&mut self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        let aside = path.with_extension("json.corrupt");
        fs::rename(&path, &aside).map_err(io_error(&path))
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.to_string(), value.to_string());
        Self { slots }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn quarantine(&mut self, key: &str) -> PersistenceResult<()> {
        if let Some(value) = self.slots.remove(key) {
            self.slots.insert(format!("{key}.corrupt"), value);
        }
        Ok(())
    }
}

/// Mirrors the record store into the [`BOOKS_KEY`] slot of a [`KeyValueStore`].
#[derive(Debug)]
pub struct PersistenceBridge {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Reads the collection. An absent or blank slot is an empty collection.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::Corrupt`] if the slot is not a JSON array of loan
    /// records, or any I/O error from the underlying store.
    pub fn load(&self) -> PersistenceResult<Vec<LoanRecord>> {
        let Some(content) = self.store.get(BOOKS_KEY)? else {
            return Ok(Vec::new());
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| PersistenceError::Corrupt {
            key: BOOKS_KEY.to_string(),
            source,
        })
    }

    /// Like [`load`](Self::load), applying `policy` to a corrupt slot.
    ///
    /// # Errors
    ///
    /// I/O errors always propagate; corruption propagates only under
    /// [`CorruptionPolicy::FailFast`].
    pub fn load_with_policy(&mut self, policy: CorruptionPolicy) -> PersistenceResult<Vec<LoanRecord>> {
        match self.load() {
            Err(err @ PersistenceError::Corrupt { .. }) if policy == CorruptionPolicy::Reset => {
                tracing::warn!(error = %err, "discarding unreadable loan data");
                self.store.quarantine(BOOKS_KEY)?;
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Serializes `records` and overwrites the slot.
    ///
    /// # Errors
    ///
    /// Serialization or storage failures.
    pub fn save(&mut self, records: &[LoanRecord]) -> PersistenceResult<()> {
        let json = serde_json::to_string_pretty(records).map_err(PersistenceError::Serialize)?;
        self.store.set(BOOKS_KEY, &json)?;
        tracing::debug!(count = records.len(), "loan records saved");
        Ok(())
    }
}
