//! Error taxonomy.
//!
//! Catalog, write and run errors are fatal and end the process. A
//! [`TranslationError`] only ever concerns one item and is absorbed by the
//! pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// The source catalog could not be read, decoded or parsed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid {encoding} text")]
    Decode { encoding: &'static str },

    #[error("malformed catalog at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl CatalogError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Transport-level failure talking to the model service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One item could not be translated.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to translate {source_text:?}: {cause}")]
    Request {
        source_text: String,
        #[source]
        cause: ClientError,
    },

    #[error("no completion content for {source_text:?}")]
    EmptyResponse { source_text: String },

    #[error("invalid model response for {source_text:?}: {message}")]
    InvalidResponse {
        source_text: String,
        message: String,
    },
}

impl TranslationError {
    /// Source text of the item that failed.
    pub fn source_text(&self) -> &str {
        match self {
            Self::Request { source_text, .. }
            | Self::EmptyResponse { source_text }
            | Self::InvalidResponse { source_text, .. } => source_text,
        }
    }
}

/// The CSV output could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("input file {0:?} does not exist")]
    InputNotFound(PathBuf),

    #[error("unsupported format {format:?} (supported: {})", supported.join(", "))]
    UnsupportedFormat {
        format: String,
        supported: Vec<String>,
    },

    #[error("unsupported model {model:?} (supported: {})", supported.join(", "))]
    UnsupportedModel {
        model: String,
        supported: Vec<String>,
    },

    #[error("no API key given; pass --api-key or set OPENAI_API_KEY")]
    MissingApiKey,

    #[error("failed to set up the model client: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
