//! JSON file counter storage

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::{NumberingConfig, DEFAULT_ROOT_KEY};
use crate::numbering::NumberFormat;
use crate::traits::*;
use crate::types::*;

type CounterMap = BTreeMap<String, Counter>;

/// One lock per counter file, shared by every store in the process
static FILE_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = FILE_LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.entry(lock_key(path)).or_default().clone()
}

/// Canonical form of `path`; the file itself need not exist yet
fn lock_key(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Counter storage backed by a JSON document on disk.
///
/// All counters live under a single namespaced root key, so the file can be
/// shared with other settings. Other root keys are preserved on write.
/// Reservations are atomic within one process: every store opened on the
/// same file shares one lock.
#[derive(Debug, Clone)]
pub struct JsonFileCounterStore {
    path: PathBuf,
    root_key: String,
    lock: Arc<Mutex<()>>,
}

impl JsonFileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_root_key(path, DEFAULT_ROOT_KEY)
    }

    pub fn with_root_key(path: impl Into<PathBuf>, root_key: impl Into<String>) -> Self {
        let path = path.into();
        let lock = lock_for(&path);
        Self {
            path,
            root_key: root_key.into(),
            lock,
        }
    }

    pub fn from_config(path: impl Into<PathBuf>, config: &NumberingConfig) -> Self {
        Self::with_root_key(path, config.root_key.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    fn guard(&self) -> NumberingResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| NumberingError::Storage("counter file lock poisoned".to_string()))
    }

    fn read_document(&self) -> NumberingResult<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(NumberingError::Storage(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(NumberingError::Storage(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Counter file is corrupt");
                Err(NumberingError::Storage(format!(
                    "cannot parse {}: {}",
                    self.path.display(),
                    e
                )))
            }
        }
    }

    fn load(&self) -> NumberingResult<(Map<String, Value>, CounterMap)> {
        let document = self.read_document()?;
        let counters = match document.get(&self.root_key) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                NumberingError::Storage(format!("invalid counters under '{}': {}", self.root_key, e))
            })?,
            None => CounterMap::new(),
        };
        Ok((document, counters))
    }

    fn store(&self, mut document: Map<String, Value>, counters: &CounterMap) -> NumberingResult<()> {
        let value =
            serde_json::to_value(counters).map_err(|e| NumberingError::Storage(e.to_string()))?;
        document.insert(self.root_key.clone(), value);
        let json = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|e| NumberingError::Storage(e.to_string()))?;

        let write_err = |e: std::io::Error| {
            NumberingError::Storage(format!("cannot write {}: {}", self.path.display(), e))
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for JsonFileCounterStore {
    async fn get_counter(&self, key: &str) -> NumberingResult<Option<Counter>> {
        let _guard = self.guard()?;
        let (_, mut counters) = self.load()?;
        Ok(counters.remove(key))
    }

    async fn save_counter(&mut self, counter: &Counter) -> NumberingResult<()> {
        let _guard = self.guard()?;
        let (document, mut counters) = self.load()?;
        counters.insert(counter.key.clone(), counter.clone());
        self.store(document, &counters)
    }

    async fn list_counters(&self) -> NumberingResult<Vec<Counter>> {
        let _guard = self.guard()?;
        let (_, counters) = self.load()?;
        Ok(counters.into_values().collect())
    }

    async fn delete_counter(&mut self, key: &str) -> NumberingResult<()> {
        let _guard = self.guard()?;
        let (document, mut counters) = self.load()?;
        if counters.remove(key).is_none() {
            return Err(NumberingError::CounterNotFound(key.to_string()));
        }
        self.store(document, &counters)
    }

    async fn reserve_next(
        &mut self,
        template: &CounterTemplate,
        now: NaiveDateTime,
    ) -> NumberingResult<Counter> {
        let _guard = self.guard()?;
        let (document, mut counters) = self.load()?;
        let format = counters
            .get(&template.key)
            .map_or(template.format.as_str(), |existing| existing.format.as_str());
        NumberFormat::parse(format)?;

        let counter = counters.entry(template.key.clone()).or_insert_with(|| {
            debug!(key = %template.key, path = %self.path.display(), "Creating counter");
            template.instantiate(now)
        });
        counter.advance(now);
        let reserved = counter.clone();
        self.store(document, &counters)?;
        Ok(reserved)
    }
}
