use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::StorageError;

/// A whole JSON document: top-level object keyed by username or userid.
pub type Document = Map<String, Value>;

pub const USERS_FILE: &str = "users.json";
pub const ONGOING_FILE: &str = "ongoing.json";
pub const COMPLETED_FILE: &str = "completed.json";

/// The three persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Ongoing,
    Completed,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Users => USERS_FILE,
            Collection::Ongoing => ONGOING_FILE,
            Collection::Completed => COMPLETED_FILE,
        }
    }
}

/// Whole-document load/save. Every store goes through this seam, so file
/// locking or another backend can be added without touching business logic.
pub trait Storage {
    /// Returns the current document; never fails (tolerant read).
    fn load(&self, collection: Collection) -> Document;

    /// Replaces the whole document.
    fn save(&self, collection: Collection, doc: &Document) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn load(&self, collection: Collection) -> Document {
        (**self).load(collection)
    }

    fn save(&self, collection: Collection, doc: &Document) -> Result<(), StorageError> {
        (**self).save(collection, doc)
    }
}

/// Loads a JSON object from `path`.
///
/// Returns an empty document if the file does not exist, cannot be read,
/// or does not hold a JSON object.
pub fn load_document(path: &Path) -> Document {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Document::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "document could not be read, treating as empty");
            return Document::new();
        }
    };
    if s.trim().is_empty() {
        return Document::new();
    }
    match serde_json::from_str::<Value>(&s) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::warn!(path = %path.display(), "unreadable document, treating as empty");
            Document::new()
        }
    }
}

/// Writes `doc` to `path` through a temp file in the same directory and an
/// atomic rename, so a crash mid-write leaves the previous file intact.
pub fn save_document(path: &Path, doc: &Document) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io { path: path.to_path_buf(), source };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(io_err)?;

    let s = serde_json::to_string_pretty(doc).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
    tmp.write_all(s.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    tracing::debug!(path = %path.display(), bytes = s.len(), "document saved");
    Ok(())
}

/// Directory-backed storage holding `users.json`, `ongoing.json` and
/// `completed.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> JsonFileStorage {
        JsonFileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, collection: Collection) -> Document {
        load_document(&self.path(collection))
    }

    fn save(&self, collection: Collection, doc: &Document) -> Result<(), StorageError> {
        save_document(&self.path(collection), doc)
    }
}

/// In-memory storage for tests. Writes to a collection can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: RefCell<HashMap<Collection, Document>>,
    failing: RefCell<HashSet<Collection>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

    /// Makes every subsequent save to `collection` fail.
    pub fn fail_saves(&self, collection: Collection) {
        self.failing.borrow_mut().insert(collection);
    }

    pub fn restore_saves(&self, collection: Collection) {
        self.failing.borrow_mut().remove(&collection);
    }
}

impl Storage for MemoryStorage {
    fn load(&self, collection: Collection) -> Document {
        self.docs.borrow().get(&collection).cloned().unwrap_or_default()
    }

    fn save(&self, collection: Collection, doc: &Document) -> Result<(), StorageError> {
        if self.failing.borrow().contains(&collection) {
            return Err(StorageError::Rejected(collection.file_name().to_string()));
        }
        self.docs.borrow_mut().insert(collection, doc.clone());
        Ok(())
    }
}
