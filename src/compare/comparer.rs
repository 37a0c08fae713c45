//! File-level comparison.

use std::path::Path;

use log::info;

use super::engine::compare;
use super::tree::DifferenceTree;
use crate::schema::Schema;
use crate::typed::{FormatError, Loader, ParseableType};
use crate::value::Value;

/// DocumentPair holds two loaded documents, ready to be compared.
#[derive(Debug, Clone)]
pub struct DocumentPair {
    pub source: Value,
    pub target: Value,
}

/// Comparer loads two documents of one schema type and compares them.
#[derive(Debug, Clone)]
pub struct Comparer {
    loader: Loader,
}

impl Comparer {
    pub fn new(parseable: ParseableType) -> Self {
        Comparer {
            loader: Loader::new(parseable),
        }
    }

    /// Uses a preconfigured loader, e.g. one reading a non-default archive entry.
    pub fn with_loader(loader: Loader) -> Self {
        Comparer { loader }
    }

    pub fn schema(&self) -> &Schema {
        &self.loader.parseable().schema
    }

    /// Loads both documents. Either failing to load aborts the comparison.
    pub fn load_pair(
        &self,
        source_path: impl AsRef<Path>,
        target_path: impl AsRef<Path>,
    ) -> Result<DocumentPair, FormatError> {
        let (source_path, target_path) = (source_path.as_ref(), target_path.as_ref());
        info!(
            "loading {} and {}",
            source_path.display(),
            target_path.display()
        );
        Ok(DocumentPair {
            source: self.loader.load(source_path)?,
            target: self.loader.load(target_path)?,
        })
    }

    /// Compares a loaded pair.
    pub fn compare<'a>(&'a self, pair: &'a DocumentPair) -> DifferenceTree<'a> {
        compare(self.schema(), &pair.source, &pair.target)
    }
}
