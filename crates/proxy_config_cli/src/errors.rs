use std::io;

use proxy_config::ConfigurationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the proxy-config CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// Merging or gap filling failed on the loaded documents.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Failed to read a document from the filesystem.
    #[error("Failed to load file.")]
    LoadFile(io::Error),

    /// A `.toml` document could not be decoded into the expected shape.
    #[error("Failed to parse TOML document.")]
    ParseTomlFile(toml::de::Error),

    /// A JSON document could not be decoded into the expected shape.
    #[error("Failed to parse JSON document.")]
    ParseJsonFile(serde_json::Error),

    /// The result could not be rendered as JSON.
    #[error("Failed to serialize the proxy configuration.")]
    Serialize(serde_json::Error),
}
