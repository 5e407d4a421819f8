/*!
 * Error types for the i18n-harvest application.
 *
 * This module contains custom error types for the different stages of a run,
 * using the thiserror crate for ergonomic error definitions:
 * - `ScanError`: a declaration body could not be decoded
 * - `ValidationError`: a decoded entry is missing required fields
 * - `ProviderError`: the external translation call failed
 * - `PersistenceError`: a cache snapshot or catalog file could not be read or written
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a buffer for translation declarations
#[derive(Error, Debug)]
pub enum ScanError {
    /// A marker was found but the structured value after it is malformed
    #[error(
        "found t({{ at {location}, but the value after it is not valid JSON\n\
         Make sure it is valid JSON, not JS, for example by encasing the keys into quotes\n\
         err: {source}\n\
         content: {preview}"
    )]
    Decode {
        /// `file:line` of the offending marker
        location: String,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
        /// Bounded preview of the input following the marker
        preview: String,
    },
}

/// Errors raised when a decoded entry misses required content
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The declaration has no `code`
    #[error("missing code in translation declaration: location={location}, entry={entry}")]
    MissingCode {
        /// `file:line` of the declaration
        location: String,
        /// Full rendering of the entry
        entry: String,
    },

    /// Neither `msg` nor any `msgs` value is present
    #[error(
        "missing translation: 'msg' is empty and 'msgs' has no non-empty entries: location={location}, entry={entry}"
    )]
    MissingMessage {
        /// `file:line` of the declaration
        location: String,
        /// Full rendering of the entry
        entry: String,
    },
}

/// Errors that can occur when talking to the translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider returned a different number of texts than it was sent
    #[error("Provider returned {actual} translations for {expected} texts")]
    CountMismatch {
        /// Number of texts sent
        expected: usize,
        /// Number of texts received
        actual: usize,
    },
}

/// Errors raised while reading or writing durable state
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing data for the given path failed
    #[error("Failed to serialize data for {path}: {source}")]
    Serialize {
        /// Destination path
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file at the given path holds malformed data
    #[error("Failed to parse {path}: {source}")]
    Deserialize {
        /// Source path
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur during batch translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The cache could not be persisted after a batch
    #[error("Failed to save cache: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from scanning a source file
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Error from validating an entry
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from persisting state
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
