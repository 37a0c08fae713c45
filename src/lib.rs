//! # Structured Compare
//!
//! Structural comparison of typed documents that share one schema.
//!
//! Two documents (for example two exported configuration snapshots) are
//! decoded against a schema into typed values and compared. The result is a
//! tree mirroring the schema that marks, at every level, whether that part of
//! the document differs. Collections of records that carry an identity are
//! matched by identity, so reordering alone is not a difference.
//!
//! ## Modules
//!
//! - [`schema`] - Schema descriptor language: scalars, records, sequences
//! - [`value`] - In-memory representation of typed object graphs
//! - [`typed`] - Decoding documents against a schema and loading them from disk
//! - [`compare`] - The comparison engine and the difference tree

pub mod compare;
pub mod schema;
pub mod typed;
pub mod value;

pub use compare::{compare, Change, Comparer, ComparisonNode, DifferenceTree, DocumentPair};
pub use schema::Schema;
pub use typed::{FormatError, Loader, ParseableType, Parser};
pub use value::Value;
