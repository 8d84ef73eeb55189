//! Loading of configuration documents from disk.
//!
//! Documents are decoded by file extension: `.toml` files as TOML, anything
//! else as JSON.

use std::{fs, path::Path};

use proxy_config::BaselineDefaults;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::Error;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Encoding of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Decodes a document from text in the given format.
pub fn parse_document<T: DeserializeOwned>(
    content: &str,
    format: DocumentFormat,
) -> Result<T, Error> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(Error::ParseJsonFile),
        DocumentFormat::Toml => toml::from_str(content).map_err(Error::ParseTomlFile),
    }
}

/// Reads and decodes the document at `path`.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let format = DocumentFormat::from_path(path);
    debug!(message = "Loading document", path = ?path, format = ?format);

    let content = fs::read_to_string(path).map_err(|e| {
        error!(message = "Failed to read document", path = ?path, error = %e);
        Error::LoadFile(e)
    })?;

    parse_document(&content, format).map_err(|e| {
        error!(message = "Failed to parse document", path = ?path, error = ?e);
        e
    })
}

/// Loads the baseline values from a TOML file, or the built-in values when
/// no file is given.
pub fn load_baseline_defaults(path: Option<&Path>) -> Result<BaselineDefaults, Error> {
    let Some(path) = path else {
        return Ok(BaselineDefaults::default());
    };

    debug!(message = "Loading baseline defaults", path = ?path);
    let content = fs::read_to_string(path).map_err(|e| {
        error!(message = "Failed to read baseline defaults", path = ?path, error = %e);
        Error::LoadFile(e)
    })?;

    Ok(BaselineDefaults::from_toml_str(&content)?)
}
