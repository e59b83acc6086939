//! Tax calculation for line items and documents

pub mod calculator;
pub mod document;

pub use calculator::*;
pub use document::*;
