//! Key-value persistence and the `StoredValue` bridge.
//!
//! Stores speak strings (JSON-encoded payloads); [`StoredValue`] adds the
//! typed, signal-backed view on top. Reads fall back to a default on
//! anything unexpected; writes are optimistic and never roll back.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use picot_core::{Signal, signal};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Synchronous string key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str);
}

/// Plain in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// File-backed store: one JSON object per file, loaded lazily and rewritten
/// whole on every write.
pub struct JsonFileStore {
    path: PathBuf,
    cache: RefCell<Option<HashMap<String, String>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RefCell::new(None),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        if let Some(cache) = self.cache.borrow().as_ref() {
            return cache.clone();
        }
        let loaded = match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("{}: unreadable store file, starting empty: {e}", self.path.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        *self.cache.borrow_mut() = Some(loaded.clone());
        loaded
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Encode {
            key: String::from("<store>"),
            source: e,
        })?;
        fs::write(&self.path, text)?;
        *self.cache.borrow_mut() = Some(entries.clone());
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some()
            && let Err(e) = self.persist(&entries)
        {
            log::warn!("remove('{key}'): persist failed: {e}");
        }
    }
}

/// Typed value mirrored into a [`KvStore`].
///
/// The signal always holds the last successfully decoded value (or the
/// default). Writes update the signal first, then persist best-effort: a
/// failed persist is logged and absorbed, never rolled back or surfaced.
pub struct StoredValue<T: 'static> {
    store: Rc<dyn KvStore>,
    key: String,
    default: T,
    value: Signal<T>,
}

impl<T> StoredValue<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    pub fn new(store: Rc<dyn KvStore>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = signal(read(store.as_ref(), &key, &default));
        Self {
            store,
            key,
            default,
            value,
        }
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Reactive view of the value.
    pub fn signal(&self) -> Signal<T> {
        self.value.clone()
    }

    pub fn set(&self, value: T) {
        self.value.set(value.clone());
        match serde_json::to_string(&value) {
            Ok(encoded) => {
                if let Err(e) = self.store.set(&self.key, &encoded) {
                    log::warn!("write('{}') failed, keeping in-memory value: {e}", self.key);
                }
            }
            Err(e) => {
                log::warn!("write('{}'): value not encodable: {e}", self.key);
            }
        }
    }

    /// Re-reads from the store under a (possibly new) key and default,
    /// replacing whatever the in-memory signal held.
    pub fn rebind(&mut self, key: impl Into<String>, default: T) {
        self.key = key.into();
        self.default = default;
        self.value
            .set(read(self.store.as_ref(), &self.key, &self.default));
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

fn read<T: DeserializeOwned + Clone>(store: &dyn KvStore, key: &str, default: &T) -> T {
    match store.get(key) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::debug!("read('{key}'): undecodable value, using default: {e}");
            default.clone()
        }),
        None => default.clone(),
    }
}
