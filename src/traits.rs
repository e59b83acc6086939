//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::types::*;

/// Storage abstraction for document counters
///
/// This trait allows the numbering engine to work with any storage backend
/// (a database sequence table, a JSON file, in-memory, etc.) by implementing
/// these methods.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Get a counter by document type
    async fn get_counter(&self, key: &str) -> NumberingResult<Option<Counter>>;

    /// Insert or replace a counter
    async fn save_counter(&mut self, counter: &Counter) -> NumberingResult<()>;

    /// List all counters
    async fn list_counters(&self) -> NumberingResult<Vec<Counter>>;

    /// Delete a counter
    async fn delete_counter(&mut self, key: &str) -> NumberingResult<()>;

    /// Reserve the next sequence value for `template.key`.
    ///
    /// Creates the counter from `template` if it does not exist, applies the
    /// reset policy as of `now`, increments, persists and returns the updated
    /// counter. The whole read-modify-write must be atomic with respect to
    /// other reservations on the same store.
    async fn reserve_next(
        &mut self,
        template: &CounterTemplate,
        now: NaiveDateTime,
    ) -> NumberingResult<Counter>;
}

/// Trait for implementing custom counter validation rules
pub trait CounterValidator: Send + Sync {
    /// Validate a counter before it is saved
    fn validate_counter(&self, counter: &Counter) -> NumberingResult<()>;
}

/// Default counter validator: checks the key and the format string
pub struct DefaultCounterValidator;

impl CounterValidator for DefaultCounterValidator {
    fn validate_counter(&self, counter: &Counter) -> NumberingResult<()> {
        crate::utils::validate_document_type(&counter.key)?;
        crate::numbering::NumberFormat::parse(&counter.format)?;
        Ok(())
    }
}
