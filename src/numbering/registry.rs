//! Known document types and their default numbering

use std::collections::HashMap;

use crate::numbering::NumberFormat;
use crate::types::*;

/// Standard document types with built-in numbering defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    PurchaseOrder,
    PurchaseRequisition,
    GoodsReceivingVoucher,
    Invoice,
    Quotation,
    DeliveryNote,
    Vendor,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        DocumentType::PurchaseOrder,
        DocumentType::PurchaseRequisition,
        DocumentType::GoodsReceivingVoucher,
        DocumentType::Invoice,
        DocumentType::Quotation,
        DocumentType::DeliveryNote,
        DocumentType::Vendor,
    ];

    /// Counter key used in storage
    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::PurchaseOrder => "purchase-order",
            DocumentType::PurchaseRequisition => "purchase-requisition",
            DocumentType::GoodsReceivingVoucher => "goods-receiving-voucher",
            DocumentType::Invoice => "invoice",
            DocumentType::Quotation => "quotation",
            DocumentType::DeliveryNote => "delivery-note",
            DocumentType::Vendor => "vendor",
        }
    }

    pub fn default_format(&self) -> &'static str {
        match self {
            DocumentType::PurchaseOrder => "PO-{YYYY}-{####}",
            DocumentType::PurchaseRequisition => "PR-{YYYY}-{####}",
            DocumentType::GoodsReceivingVoucher => "GRV-{YY}{MM}-{###}",
            DocumentType::Invoice => "INV-{YYYY}-{####}",
            DocumentType::Quotation => "QT-{YY}{MM}-{###}",
            DocumentType::DeliveryNote => "DN-{YYYY}-{####}",
            DocumentType::Vendor => "VND-{####}",
        }
    }

    pub fn default_reset_period(&self) -> ResetPeriod {
        match self {
            DocumentType::GoodsReceivingVoucher | DocumentType::Quotation => ResetPeriod::Monthly,
            DocumentType::Vendor => ResetPeriod::Never,
            _ => ResetPeriod::Yearly,
        }
    }

    /// Look up a standard document type by its storage key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.key() == key)
    }

    pub fn template(&self) -> CounterTemplate {
        CounterTemplate::new(self.key(), self.default_format(), self.default_reset_period())
    }
}

/// Registry mapping document type keys to counter templates
#[derive(Debug, Clone)]
pub struct DocumentTypeRegistry {
    templates: HashMap<String, CounterTemplate>,
}

impl DocumentTypeRegistry {
    /// Create a registry with every standard document type
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.setup_standard_types();
        registry
    }

    /// Create a registry that knows no document types
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    fn setup_standard_types(&mut self) {
        for document_type in DocumentType::ALL.iter() {
            let template = document_type.template();
            self.templates.insert(template.key.clone(), template);
        }
    }

    /// Register or override a document type
    pub fn register(&mut self, template: CounterTemplate) -> NumberingResult<()> {
        crate::utils::validate_document_type(&template.key)?;
        NumberFormat::parse(&template.format)?;
        self.templates.insert(template.key.clone(), template);
        Ok(())
    }

    /// Template for a document type, failing for unknown types
    pub fn template(&self, key: &str) -> NumberingResult<&CounterTemplate> {
        self.templates
            .get(key)
            .ok_or_else(|| NumberingError::UnknownDocumentType(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// All registered keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for DocumentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_formats_are_valid() {
        for document_type in DocumentType::ALL.iter() {
            assert!(NumberFormat::parse(document_type.default_format()).is_ok());
            assert_eq!(DocumentType::from_key(document_type.key()), Some(*document_type));
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = DocumentTypeRegistry::new();
        let template = registry.template("goods-receiving-voucher").unwrap();
        assert_eq!(template.reset_period, ResetPeriod::Monthly);
        assert!(matches!(
            registry.template("spaceship"),
            Err(NumberingError::UnknownDocumentType(_))
        ));
    }

    #[test]
    fn test_register_override() {
        let mut registry = DocumentTypeRegistry::new();
        registry
            .register(CounterTemplate::new(
                "purchase-order",
                "LPO/{YY}/{###}",
                ResetPeriod::Never,
            ))
            .unwrap();
        assert_eq!(
            registry.template("purchase-order").unwrap().format,
            "LPO/{YY}/{###}"
        );

        let bad = CounterTemplate::new("purchase-order", "LPO", ResetPeriod::Never);
        assert!(registry.register(bad).is_err());
    }
}
