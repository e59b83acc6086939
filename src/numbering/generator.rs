//! Document number generation

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::NumberingConfig;
use crate::numbering::{DocumentTypeRegistry, NumberFormat};
use crate::traits::*;
use crate::types::*;

/// Issues formatted document numbers from per-type counters
pub struct NumberGenerator<S: CounterStore> {
    storage: S,
    registry: DocumentTypeRegistry,
    validator: Box<dyn CounterValidator>,
}

impl<S: CounterStore> NumberGenerator<S> {
    /// Create a generator over the standard document types
    pub fn new(storage: S) -> Self {
        Self::with_registry(storage, DocumentTypeRegistry::new())
    }

    pub fn with_registry(storage: S, registry: DocumentTypeRegistry) -> Self {
        Self {
            storage,
            registry,
            validator: Box::new(DefaultCounterValidator),
        }
    }

    /// Create a generator from a loaded configuration
    pub fn from_config(storage: S, config: &NumberingConfig) -> NumberingResult<Self> {
        Ok(Self::with_registry(storage, config.registry()?))
    }

    /// Replace the counter validator
    pub fn with_validator(mut self, validator: Box<dyn CounterValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn registry(&self) -> &DocumentTypeRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Issue the next number for `document_type` as of now
    pub async fn generate(&mut self, document_type: &str) -> NumberingResult<String> {
        self.generate_at(document_type, chrono::Utc::now().naive_utc())
            .await
    }

    /// Issue the next number for `document_type` as of `now`
    pub async fn generate_at(
        &mut self,
        document_type: &str,
        now: NaiveDateTime,
    ) -> NumberingResult<String> {
        let template = self.template_for(document_type).await?;
        let counter = self.storage.reserve_next(&template, now).await?;
        let format = NumberFormat::parse(&counter.format)?;
        let number = format.render(counter.current, now);

        debug!(
            document_type = %document_type,
            sequence = counter.current,
            number = %number,
            "Issued document number"
        );
        Ok(number)
    }

    /// Preview the next number without consuming it
    pub async fn peek(&self, document_type: &str) -> NumberingResult<String> {
        self.peek_at(document_type, chrono::Utc::now().naive_utc())
            .await
    }

    pub async fn peek_at(
        &self,
        document_type: &str,
        now: NaiveDateTime,
    ) -> NumberingResult<String> {
        let counter = self.counter_or_template(document_type, now).await?;
        let format = NumberFormat::parse(&counter.format)?;
        Ok(format.render(counter.next_value(now), now))
    }

    /// Zero a counter so the next number starts at 1
    pub async fn reset(&mut self, document_type: &str) -> NumberingResult<()> {
        self.reset_at(document_type, chrono::Utc::now().naive_utc())
            .await
    }

    pub async fn reset_at(&mut self, document_type: &str, now: NaiveDateTime) -> NumberingResult<()> {
        let mut counter = self
            .storage
            .get_counter(document_type)
            .await?
            .ok_or_else(|| NumberingError::CounterNotFound(document_type.to_string()))?;
        counter.reset(now);
        self.storage.save_counter(&counter).await?;

        info!(document_type = %document_type, "Counter reset");
        Ok(())
    }

    /// Change the format and reset period of a document type.
    ///
    /// An existing counter keeps its current value. Unknown document types
    /// are registered.
    pub async fn configure(
        &mut self,
        document_type: &str,
        format: &str,
        reset_period: ResetPeriod,
    ) -> NumberingResult<Counter> {
        let now = chrono::Utc::now().naive_utc();
        let template = CounterTemplate::new(document_type, format, reset_period);

        let mut counter = match self.storage.get_counter(document_type).await? {
            Some(existing) => existing,
            None => template.instantiate(now),
        };
        counter.format = format.to_string();
        counter.reset_period = reset_period;
        counter.updated_at = now;

        self.validator.validate_counter(&counter)?;
        self.registry.register(template)?;
        self.storage.save_counter(&counter).await?;

        info!(
            document_type = %document_type,
            format = %format,
            reset_period = %reset_period,
            "Counter configured"
        );
        Ok(counter)
    }

    /// Recover year, month and sequence from a number issued for `document_type`
    pub async fn parse(&self, document_type: &str, number: &str) -> NumberingResult<ParsedNumber> {
        let format = match self.storage.get_counter(document_type).await? {
            Some(counter) => counter.format,
            None => self.registry.template(document_type)?.format.clone(),
        };
        NumberFormat::parse(&format)?.parse_number(number)
    }

    /// Get the stored counter for a document type
    pub async fn counter(&self, document_type: &str) -> NumberingResult<Option<Counter>> {
        self.storage.get_counter(document_type).await
    }

    /// All stored counters, sorted by key
    pub async fn counters(&self) -> NumberingResult<Vec<Counter>> {
        let mut counters = self.storage.list_counters().await?;
        counters.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(counters)
    }

    /// Registry template, else one rebuilt from a counter configured earlier
    async fn template_for(&self, document_type: &str) -> NumberingResult<CounterTemplate> {
        if let Ok(template) = self.registry.template(document_type) {
            return Ok(template.clone());
        }
        match self.storage.get_counter(document_type).await? {
            Some(counter) => Ok(CounterTemplate::new(
                counter.key,
                counter.format,
                counter.reset_period,
            )),
            None => Err(NumberingError::UnknownDocumentType(
                document_type.to_string(),
            )),
        }
    }

    async fn counter_or_template(
        &self,
        document_type: &str,
        now: NaiveDateTime,
    ) -> NumberingResult<Counter> {
        match self.storage.get_counter(document_type).await? {
            Some(counter) => Ok(counter),
            None => Ok(self.registry.template(document_type)?.instantiate(now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering::DocumentType;
    use crate::utils::MemoryCounterStore;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_sequential_numbers() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());
        let now = at(2024, 5, 2);

        assert_eq!(generator.generate_at("purchase-order", now).await.unwrap(), "PO-2024-0001");
        assert_eq!(generator.generate_at("purchase-order", now).await.unwrap(), "PO-2024-0002");
        assert_eq!(generator.generate_at("vendor", now).await.unwrap(), "VND-0001");
    }

    #[tokio::test]
    async fn test_yearly_reset() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());

        generator.generate_at("purchase-order", at(2024, 12, 30)).await.unwrap();
        generator.generate_at("purchase-order", at(2024, 12, 31)).await.unwrap();
        let next = generator
            .generate_at("purchase-order", at(2025, 1, 1))
            .await
            .unwrap();
        assert_eq!(next, "PO-2025-0001");
    }

    #[tokio::test]
    async fn test_monthly_reset() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());

        let first = generator
            .generate_at("goods-receiving-voucher", at(2024, 1, 31))
            .await
            .unwrap();
        let second = generator
            .generate_at("goods-receiving-voucher", at(2024, 2, 1))
            .await
            .unwrap();
        assert_eq!(first, "GRV-2401-001");
        assert_eq!(second, "GRV-2402-001");
    }

    #[tokio::test]
    async fn test_never_reset() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());

        generator.generate_at("vendor", at(2024, 1, 1)).await.unwrap();
        let next = generator.generate_at("vendor", at(2031, 1, 1)).await.unwrap();
        assert_eq!(next, "VND-0002");
    }

    #[tokio::test]
    async fn test_unknown_document_type() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());
        let result = generator.generate("spaceship").await;
        assert!(matches!(result, Err(NumberingError::UnknownDocumentType(_))));
        assert!(generator.counters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_peek_does_not_consume() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());
        let now = at(2024, 3, 3);

        assert_eq!(generator.peek_at("invoice", now).await.unwrap(), "INV-2024-0001");
        assert_eq!(generator.peek_at("invoice", now).await.unwrap(), "INV-2024-0001");
        assert_eq!(generator.generate_at("invoice", now).await.unwrap(), "INV-2024-0001");
        assert_eq!(generator.peek_at("invoice", now).await.unwrap(), "INV-2024-0002");
        assert_eq!(
            generator.peek_at("invoice", at(2025, 1, 1)).await.unwrap(),
            "INV-2025-0001"
        );
    }

    #[tokio::test]
    async fn test_reset_counter() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());
        let now = at(2024, 3, 3);

        generator.generate_at("quotation", now).await.unwrap();
        generator.generate_at("quotation", now).await.unwrap();
        generator.reset_at("quotation", now).await.unwrap();
        assert_eq!(generator.generate_at("quotation", now).await.unwrap(), "QT-2403-001");

        assert!(matches!(
            generator.reset_at("delivery-note", now).await,
            Err(NumberingError::CounterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_configure_keeps_sequence() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());
        let now = chrono::Utc::now().naive_utc();

        generator.generate_at("purchase-order", now).await.unwrap();
        let counter = generator
            .configure("purchase-order", "LPO{##}", ResetPeriod::Never)
            .await
            .unwrap();
        assert_eq!(counter.current, 1);
        assert_eq!(generator.generate_at("purchase-order", now).await.unwrap(), "LPO02");

        assert!(generator
            .configure("purchase-order", "LPO", ResetPeriod::Never)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_configured_type_survives_new_generator() {
        let store = MemoryCounterStore::new();
        let now = at(2024, 6, 1);

        let mut generator = NumberGenerator::new(store.clone());
        generator
            .configure("credit-note", "CN-{####}", ResetPeriod::Never)
            .await
            .unwrap();
        assert_eq!(generator.generate_at("credit-note", now).await.unwrap(), "CN-0001");

        let mut restarted = NumberGenerator::new(store.clone());
        assert!(!restarted.registry().contains("credit-note"));
        assert_eq!(restarted.peek_at("credit-note", now).await.unwrap(), "CN-0002");
        assert_eq!(restarted.generate_at("credit-note", now).await.unwrap(), "CN-0002");
        let parsed = restarted.parse("credit-note", "CN-0002").await.unwrap();
        assert_eq!(parsed.sequence, 2);
    }

    #[tokio::test]
    async fn test_invalid_stored_format_consumes_nothing() {
        let mut store = MemoryCounterStore::new();
        let now = at(2024, 6, 1);
        let mut counter = DocumentType::PurchaseOrder.template().instantiate(now);
        counter.current = 7;
        counter.format = "BAD".to_string();
        store.save_counter(&counter).await.unwrap();

        let mut generator = NumberGenerator::new(store.clone());
        for _ in 0..3 {
            assert!(matches!(
                generator.generate_at("purchase-order", now).await,
                Err(NumberingError::InvalidFormat(_))
            ));
        }
        let stored = store.get_counter("purchase-order").await.unwrap().unwrap();
        assert_eq!(stored.current, 7);
    }

    #[tokio::test]
    async fn test_parse_issued_number() {
        let mut generator = NumberGenerator::new(MemoryCounterStore::new());
        let now = at(2024, 8, 20);

        for _ in 0..4 {
            generator.generate_at("goods-receiving-voucher", now).await.unwrap();
        }
        let number = generator
            .generate_at("goods-receiving-voucher", now)
            .await
            .unwrap();
        let parsed = generator.parse("goods-receiving-voucher", &number).await.unwrap();
        assert_eq!(parsed.sequence, 5);
        assert_eq!(parsed.year, Some(2024));
        assert_eq!(parsed.month, Some(8));
    }
}
