//! Schema module defines the descriptor language for comparable documents.
//!
//! A schema lists named types; each type is a scalar, a record with an ordered
//! field list, or a sequence. Records may declare an identity field, a field
//! used to name them in comparison output, and whether they are boundary
//! types that receive their own comparison node.

mod elements;

pub use elements::*;
