//! Loading typed documents from disk.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use super::errors::{FormatCause, FormatError};
use super::parser::ParseableType;
use crate::value::Value;

/// Entry read from `.zip` containers unless another is configured.
pub const DEFAULT_PAYLOAD_NAME: &str = "customizations.yaml";

/// Loader materializes documents of one schema type from files.
///
/// Plain `.yaml`, `.yml` and `.json` files are decoded directly. Files ending
/// in `.gz` are a gzip stream whose content is the document. Files ending in
/// `.zip` are an archive holding the document as the entry named by
/// `payload_name`.
#[derive(Debug, Clone)]
pub struct Loader {
    parseable: ParseableType,
    payload_name: String,
}

impl Loader {
    pub fn new(parseable: ParseableType) -> Self {
        Loader {
            parseable,
            payload_name: DEFAULT_PAYLOAD_NAME.to_string(),
        }
    }

    /// Sets the archive entry holding the document.
    pub fn with_payload_name(mut self, name: impl Into<String>) -> Self {
        self.payload_name = name.into();
        self
    }

    pub fn parseable(&self) -> &ParseableType {
        &self.parseable
    }

    pub fn payload_name(&self) -> &str {
        &self.payload_name
    }

    /// Loads and decodes the document at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Value, FormatError> {
        let path = path.as_ref();
        let fail = |cause: FormatCause| FormatError::new(path, cause);

        let raw = fs::read(path).map_err(|e| fail(e.into()))?;
        let payload = match container_kind(path) {
            Some(Container::Gzip) => {
                debug!("extracting gzip payload from {}", path.display());
                extract_gzip(&raw).map_err(|e| fail(e.into()))?
            }
            Some(Container::Zip) => {
                debug!(
                    "extracting '{}' from archive {}",
                    self.payload_name,
                    path.display()
                );
                extract_zip(&raw, &self.payload_name).map_err(fail)?
            }
            None => raw,
        };

        let text = String::from_utf8(payload).map_err(|e| fail(e.into()))?;
        if text.trim().is_empty() {
            return Err(fail(FormatCause::MissingPayload));
        }

        debug!("decoding {} ({} bytes)", path.display(), text.len());
        self.parseable
            .from_yaml(&text)
            .map_err(|e| fail(e.into()))
    }
}

enum Container {
    Gzip,
    Zip,
}

fn container_kind(path: &Path) -> Option<Container> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    if ext.eq_ignore_ascii_case("gz") {
        Some(Container::Gzip)
    } else if ext.eq_ignore_ascii_case("zip") {
        Some(Container::Zip)
    } else {
        None
    }
}

fn extract_gzip(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload)?;
    Ok(payload)
}

fn extract_zip(archive: &[u8], name: &str) -> Result<Vec<u8>, FormatCause> {
    let mut archive = ZipArchive::new(Cursor::new(archive))?;
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(FormatCause::MissingPayload),
        Err(e) => return Err(e.into()),
    };
    let mut payload = Vec::new();
    entry.read_to_end(&mut payload)?;
    Ok(payload)
}
