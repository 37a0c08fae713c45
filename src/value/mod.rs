//! Value module - In-memory representation of typed object graphs.
//!
//! Values are produced by decoding a document against a schema and are the
//! input to comparison.

mod value;

pub use value::*;
