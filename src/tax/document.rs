//! Line items and purchase documents with derived totals

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::tax::calculator::*;

/// Document line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_code: String,
    pub description: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    /// Rate in percent; falls back to the document's rates when absent
    pub tax_rate: Option<BigDecimal>,
    /// Cached, see [`LineItem::recalculate`]
    #[serde(default)]
    pub tax_amount: BigDecimal,
    /// Cached, see [`LineItem::recalculate`]
    #[serde(default)]
    pub total: BigDecimal,
}

impl LineItem {
    /// Create a line item with empty caches
    pub fn new(
        item_code: impl Into<String>,
        description: impl Into<String>,
        quantity: BigDecimal,
        unit_price: BigDecimal,
        tax_rate: Option<BigDecimal>,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            description: description.into(),
            quantity,
            unit_price,
            tax_rate,
            tax_amount: BigDecimal::zero(),
            total: BigDecimal::zero(),
        }
    }

    /// Create a line item and compute its caches under `settings`
    pub fn priced(
        item_code: impl Into<String>,
        description: impl Into<String>,
        quantity: BigDecimal,
        unit_price: BigDecimal,
        tax_rate: Option<BigDecimal>,
        settings: &TaxSettings,
    ) -> Result<Self, TaxError> {
        let mut item = Self::new(item_code, description, quantity, unit_price, tax_rate);
        item.recalculate(settings)?;
        Ok(item)
    }

    /// Quantity times unit price
    pub fn subtotal(&self) -> BigDecimal {
        &self.quantity * &self.unit_price
    }

    /// Rate this line is taxed at under `settings`
    pub fn effective_rate(&self, settings: &TaxSettings) -> BigDecimal {
        settings.rate_for(&self.item_code, self.tax_rate.as_ref())
    }

    /// Re-derive `tax_amount` and `total`
    pub fn recalculate(&mut self, settings: &TaxSettings) -> Result<(), TaxError> {
        let rate = self.effective_rate(settings);
        let amounts = compute_item(&self.quantity, &self.unit_price, &rate, settings)?;
        self.tax_amount = amounts.tax_amount;
        self.total = amounts.total;
        Ok(())
    }
}

/// An editable purchasing document whose totals are always current.
///
/// Deserializing re-derives every line cache and the totals; stored values
/// for them are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PurchaseDocumentData")]
pub struct PurchaseDocument {
    /// Document number, if one was issued
    pub number: Option<String>,
    /// ISO currency code used when formatting amounts
    pub currency: String,
    tax_settings: TaxSettings,
    items: Vec<LineItem>,
    totals: DocumentTotals,
}

/// Serialized form of [`PurchaseDocument`] without the derived totals
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseDocumentData {
    number: Option<String>,
    currency: String,
    tax_settings: TaxSettings,
    #[serde(default)]
    items: Vec<LineItem>,
}

impl TryFrom<PurchaseDocumentData> for PurchaseDocument {
    type Error = TaxError;

    fn try_from(data: PurchaseDocumentData) -> Result<Self, Self::Error> {
        let mut document = PurchaseDocument::new(data.currency, data.tax_settings)?;
        document.number = data.number;
        let mut items = data.items;
        for item in &mut items {
            item.recalculate(&document.tax_settings)?;
        }
        document.items = items;
        document.recalculate_totals()?;
        Ok(document)
    }
}

impl PurchaseDocument {
    pub fn new(currency: impl Into<String>, tax_settings: TaxSettings) -> Result<Self, TaxError> {
        tax_settings.validate()?;
        Ok(Self {
            number: None,
            currency: currency.into(),
            tax_settings,
            items: Vec::new(),
            totals: DocumentTotals::default(),
        })
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn tax_settings(&self) -> &TaxSettings {
        &self.tax_settings
    }

    pub fn totals(&self) -> &DocumentTotals {
        &self.totals
    }

    /// Add a line item to the document
    pub fn add_item(&mut self, mut item: LineItem) -> Result<(), TaxError> {
        item.recalculate(&self.tax_settings)?;
        self.items.push(item);
        self.recalculate_totals()
    }

    /// Remove and return the line item at `index`
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, TaxError> {
        if index >= self.items.len() {
            return Err(TaxError::ItemNotFound(format!("index {}", index)));
        }
        let removed = self.items.remove(index);
        self.recalculate_totals()?;
        Ok(removed)
    }

    /// Replace the line item at `index`
    pub fn update_item(&mut self, index: usize, mut item: LineItem) -> Result<(), TaxError> {
        if index >= self.items.len() {
            return Err(TaxError::ItemNotFound(format!("index {}", index)));
        }
        item.recalculate(&self.tax_settings)?;
        self.items[index] = item;
        self.recalculate_totals()
    }

    /// Switch tax settings; every line is re-derived under the new settings
    pub fn set_tax_settings(&mut self, tax_settings: TaxSettings) -> Result<(), TaxError> {
        tax_settings.validate()?;
        let mut items = self.items.clone();
        for item in &mut items {
            item.recalculate(&tax_settings)?;
        }
        self.tax_settings = tax_settings;
        self.items = items;
        self.recalculate_totals()
    }

    /// Recalculate all totals after modifications
    fn recalculate_totals(&mut self) -> Result<(), TaxError> {
        self.totals = compute_document_totals(&self.items, &self.tax_settings)?;
        Ok(())
    }
}
