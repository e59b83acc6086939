//! In-memory counter storage for testing and single-process use

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::numbering::NumberFormat;
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation; clones share the same counters
#[derive(Debug, Clone)]
pub struct MemoryCounterStore {
    counters: Arc<RwLock<HashMap<String, Counter>>>,
}

impl MemoryCounterStore {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            counters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all counters (useful for testing)
    pub fn clear(&self) -> NumberingResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> NumberingResult<RwLockReadGuard<'_, HashMap<String, Counter>>> {
        self.counters
            .read()
            .map_err(|_| NumberingError::Storage("counter lock poisoned".to_string()))
    }

    fn write(&self) -> NumberingResult<RwLockWriteGuard<'_, HashMap<String, Counter>>> {
        self.counters
            .write()
            .map_err(|_| NumberingError::Storage("counter lock poisoned".to_string()))
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get_counter(&self, key: &str) -> NumberingResult<Option<Counter>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn save_counter(&mut self, counter: &Counter) -> NumberingResult<()> {
        self.write()?.insert(counter.key.clone(), counter.clone());
        Ok(())
    }

    async fn list_counters(&self) -> NumberingResult<Vec<Counter>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn delete_counter(&mut self, key: &str) -> NumberingResult<()> {
        if self.write()?.remove(key).is_some() {
            Ok(())
        } else {
            Err(NumberingError::CounterNotFound(key.to_string()))
        }
    }

    async fn reserve_next(
        &mut self,
        template: &CounterTemplate,
        now: NaiveDateTime,
    ) -> NumberingResult<Counter> {
        let mut counters = self.write()?;
        let format = counters
            .get(&template.key)
            .map_or(template.format.as_str(), |existing| existing.format.as_str());
        NumberFormat::parse(format)?;

        let counter = counters.entry(template.key.clone()).or_insert_with(|| {
            debug!(key = %template.key, "Creating counter");
            template.instantiate(now)
        });
        counter.advance(now);
        Ok(counter.clone())
    }
}
