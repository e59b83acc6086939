//! # Purchasing Core
//!
//! Document numbering and tax calculation for purchasing documents.
//!
//! ## Features
//!
//! - **Document numbering**: per-type counters with yearly/monthly reset and
//!   format strings such as `PO-{YYYY}-{####}`
//! - **Atomic reservation**: counter stores reserve the next value in one
//!   read-modify-write, so concurrent callers never share a number
//! - **Tax calculation**: inclusive, exclusive, per-item and overall tax on
//!   line items and documents
//! - **Formatting**: currency strings and amounts in English words
//! - **Storage abstraction**: trait-based counter storage with in-memory and
//!   JSON file implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use purchasing_core::{compute_item, format_currency, TaxSettings};
//! use bigdecimal::BigDecimal;
//!
//! let settings = TaxSettings::exclusive(BigDecimal::from(16));
//! let line = compute_item(
//!     &BigDecimal::from(2),
//!     &BigDecimal::from(100),
//!     &BigDecimal::from(16),
//!     &settings,
//! )
//! .unwrap();
//! assert_eq!(format_currency(&line.total, "KES"), "KES 232.00");
//! ```

pub mod config;
pub mod formatting;
pub mod numbering;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use formatting::*;
pub use numbering::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
