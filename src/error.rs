//! Error types for loading round sources.
//!
//! Only structural failures live here. A bad cell never becomes an error; it
//! degrades to an absent value during normalization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that halt a pipeline pass before a record set exists.
#[derive(Debug, Error)]
pub enum LoadError {
    // === Source access ===
    /// Local source file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote source could not be fetched (network, timeout or HTTP status).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // === Tabular sources ===
    /// CSV header or record stream is unreadable.
    #[error("failed to parse CSV {location}: {source}")]
    CsvParse {
        location: String,
        #[source]
        source: csv::Error,
    },

    /// CSV source has no header row at all.
    #[error("CSV source {location} has no header row")]
    MissingHeader { location: String },

    /// Configured delimiter is not ASCII.
    #[error("delimiter {delimiter:?} is not an ASCII character")]
    InvalidDelimiter { delimiter: char },

    // === JSON sources ===
    /// Document is not valid JSON.
    #[error("failed to parse JSON {location}: {source}")]
    JsonParse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document has no top-level `rounds` array.
    #[error("JSON source {location} has no `rounds` array")]
    MissingRounds { location: String },

    // === Configuration ===
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not a valid dashboard configuration.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for loading operations.
pub type Result<T, E = LoadError> = std::result::Result<T, E>;
