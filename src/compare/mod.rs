//! Compare module - Structural comparison of typed documents.
//!
//! The engine walks two values of one schema and builds a difference tree.
//! Sequences of records with an identity are joined on that identity before
//! their elements are compared; all other sequences are compared by position.

mod align;
mod comparer;
mod engine;
mod identity;
mod reconcile;
mod tree;


pub use align::*;
pub use comparer::*;
pub use engine::*;
pub use identity::*;
pub use reconcile::*;
pub use tree::*;
