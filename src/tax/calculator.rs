//! Tax calculation engine for line items and document totals

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tax::LineItem;
use crate::utils::money::{hundred, round_money};

/// How tax is derived from prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// Prices already contain the tax; it is carved out of them
    Inclusive,
    /// Tax is added on top of the prices
    Exclusive,
    /// Each line carries its own rate, added on top
    PerItem,
    /// One rate applied to the document subtotal
    Overall,
}

/// Where a line's tax comes from relative to its price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTaxBasis {
    /// `tax = subtotal * rate / (100 + rate)`, total unchanged
    Inclusive,
    /// `tax = subtotal * rate / 100`, added to the total
    Exclusive,
}

/// Source of truth for document totals
#[derive(Debug, Clone, PartialEq)]
pub enum TaxMode {
    /// Sum the cached per-line tax amounts and totals
    PerLine(LineTaxBasis),
    /// Recompute tax from the subtotal at one rate, ignoring per-line values
    Overall { rate: BigDecimal },
}

impl TaxType {
    /// Line basis; `Overall` lines are shown with tax added on top
    pub fn line_basis(&self) -> LineTaxBasis {
        match self {
            TaxType::Inclusive => LineTaxBasis::Inclusive,
            TaxType::Exclusive | TaxType::PerItem | TaxType::Overall => LineTaxBasis::Exclusive,
        }
    }
}

/// Tax configuration of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    #[serde(rename = "type")]
    pub tax_type: TaxType,
    /// Rate in percent used when a line has no rate of its own
    pub default_rate: BigDecimal,
    /// Rates in percent keyed by item code
    #[serde(default)]
    pub custom_rates: HashMap<String, BigDecimal>,
}

impl TaxSettings {
    pub fn new(tax_type: TaxType, default_rate: BigDecimal) -> Self {
        Self {
            tax_type,
            default_rate,
            custom_rates: HashMap::new(),
        }
    }

    pub fn inclusive(default_rate: BigDecimal) -> Self {
        Self::new(TaxType::Inclusive, default_rate)
    }

    pub fn exclusive(default_rate: BigDecimal) -> Self {
        Self::new(TaxType::Exclusive, default_rate)
    }

    pub fn per_item(default_rate: BigDecimal) -> Self {
        Self::new(TaxType::PerItem, default_rate)
    }

    pub fn overall(default_rate: BigDecimal) -> Self {
        Self::new(TaxType::Overall, default_rate)
    }

    /// Set a custom rate for an item code
    pub fn set_custom_rate(
        &mut self,
        item_code: impl Into<String>,
        rate: BigDecimal,
    ) -> Result<(), TaxError> {
        validate_rate(&rate)?;
        self.custom_rates.insert(item_code.into(), rate);
        Ok(())
    }

    pub fn with_custom_rate(
        mut self,
        item_code: impl Into<String>,
        rate: BigDecimal,
    ) -> Result<Self, TaxError> {
        self.set_custom_rate(item_code, rate)?;
        Ok(self)
    }

    pub fn mode(&self) -> TaxMode {
        match self.tax_type {
            TaxType::Overall => TaxMode::Overall {
                rate: self.default_rate.clone(),
            },
            other => TaxMode::PerLine(other.line_basis()),
        }
    }

    /// Rate for a line: its own rate, then the custom rate for its code,
    /// then the default rate
    pub fn rate_for(&self, item_code: &str, explicit: Option<&BigDecimal>) -> BigDecimal {
        explicit
            .or_else(|| self.custom_rates.get(item_code))
            .unwrap_or(&self.default_rate)
            .clone()
    }

    pub fn validate(&self) -> Result<(), TaxError> {
        validate_rate(&self.default_rate)?;
        for rate in self.custom_rates.values() {
            validate_rate(rate)?;
        }
        Ok(())
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self::exclusive(BigDecimal::zero())
    }
}

/// Tax and total of one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAmounts {
    pub total: BigDecimal,
    pub tax_amount: BigDecimal,
}

/// Derived totals of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
}

impl Default for DocumentTotals {
    fn default() -> Self {
        Self {
            subtotal: round_money(&BigDecimal::zero()),
            tax_amount: round_money(&BigDecimal::zero()),
            total: round_money(&BigDecimal::zero()),
        }
    }
}

/// Compute the tax and total of one line.
///
/// Both outputs are rounded to cents here, not at display time.
pub fn compute_item(
    quantity: &BigDecimal,
    unit_price: &BigDecimal,
    tax_rate: &BigDecimal,
    settings: &TaxSettings,
) -> Result<ItemAmounts, TaxError> {
    validate_quantity(quantity)?;
    validate_unit_price(unit_price)?;
    validate_rate(tax_rate)?;

    let subtotal = quantity * unit_price;
    let (tax_amount, total) = match settings.tax_type.line_basis() {
        LineTaxBasis::Exclusive => {
            let tax = (&subtotal * tax_rate) / hundred();
            let total = &subtotal + &tax;
            (tax, total)
        }
        LineTaxBasis::Inclusive => {
            let tax = (&subtotal * tax_rate) / (hundred() + tax_rate);
            (tax, subtotal)
        }
    };

    Ok(ItemAmounts {
        total: round_money(&total),
        tax_amount: round_money(&tax_amount),
    })
}

/// Sum line items into document totals.
///
/// In `overall` mode the tax is recomputed from the subtotal and any cached
/// per-line amounts are ignored. In every other mode the cached per-line
/// `tax_amount` and `total` are summed as they are.
pub fn compute_document_totals(
    items: &[LineItem],
    settings: &TaxSettings,
) -> Result<DocumentTotals, TaxError> {
    for item in items {
        validate_quantity(&item.quantity)?;
        validate_unit_price(&item.unit_price)?;
    }

    let subtotal: BigDecimal = items
        .iter()
        .map(|item| &item.quantity * &item.unit_price)
        .sum();

    let (tax_amount, total) = match settings.mode() {
        TaxMode::Overall { rate } => {
            validate_rate(&rate)?;
            let tax = round_money(&((&subtotal * &rate) / hundred()));
            let total = round_money(&subtotal) + &tax;
            (tax, total)
        }
        TaxMode::PerLine(_) => {
            let tax: BigDecimal = items.iter().map(|item| &item.tax_amount).sum();
            let total: BigDecimal = items.iter().map(|item| &item.total).sum();
            (tax, total)
        }
    };

    Ok(DocumentTotals {
        subtotal: round_money(&subtotal),
        tax_amount: round_money(&tax_amount),
        total: round_money(&total),
    })
}

/// Tax calculator bound to one set of tax settings
#[derive(Debug, Clone, Default)]
pub struct TaxCalculator {
    settings: TaxSettings,
}

impl TaxCalculator {
    pub fn new(settings: TaxSettings) -> Result<Self, TaxError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &TaxSettings {
        &self.settings
    }

    /// Compute a line at an explicit rate
    pub fn compute_item(
        &self,
        quantity: &BigDecimal,
        unit_price: &BigDecimal,
        tax_rate: &BigDecimal,
    ) -> Result<ItemAmounts, TaxError> {
        compute_item(quantity, unit_price, tax_rate, &self.settings)
    }

    /// Compute a line at the rate resolved for its item code
    pub fn compute_for_code(
        &self,
        item_code: &str,
        quantity: &BigDecimal,
        unit_price: &BigDecimal,
    ) -> Result<ItemAmounts, TaxError> {
        let rate = self.settings.rate_for(item_code, None);
        compute_item(quantity, unit_price, &rate, &self.settings)
    }

    pub fn compute_document_totals(&self, items: &[LineItem]) -> Result<DocumentTotals, TaxError> {
        compute_document_totals(items, &self.settings)
    }
}

pub(crate) fn validate_quantity(quantity: &BigDecimal) -> Result<(), TaxError> {
    if *quantity < BigDecimal::zero() {
        return Err(TaxError::NegativeQuantity(quantity.to_string()));
    }
    Ok(())
}

pub(crate) fn validate_unit_price(unit_price: &BigDecimal) -> Result<(), TaxError> {
    if *unit_price < BigDecimal::zero() {
        return Err(TaxError::NegativeUnitPrice(unit_price.to_string()));
    }
    Ok(())
}

pub(crate) fn validate_rate(rate: &BigDecimal) -> Result<(), TaxError> {
    if *rate < BigDecimal::zero() {
        return Err(TaxError::InvalidRate(format!(
            "tax rate cannot be negative: {}",
            rate
        )));
    }
    Ok(())
}

/// Tax-related errors
#[derive(Debug, thiserror::Error)]
pub enum TaxError {
    #[error("Quantity cannot be negative: {0}")]
    NegativeQuantity(String),
    #[error("Unit price cannot be negative: {0}")]
    NegativeUnitPrice(String),
    #[error("Invalid tax rate: {0}")]
    InvalidRate(String),
    #[error("Line item not found: {0}")]
    ItemNotFound(String),
}
