//! Document numbering: format strings, document types and the generator

pub mod format;
pub mod generator;
pub mod registry;

pub use format::*;
pub use generator::*;
pub use registry::*;
