//! Typed module - Decoding documents against a schema.
//!
//! This module turns YAML/JSON text into typed values and loads documents
//! from disk.

mod errors;
mod loader;
mod parser;

pub use errors::*;
pub use loader::*;
pub use parser::*;
