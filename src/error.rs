//! Error kinds for the fetch / parse / expand pipeline

use crate::schema::Category;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the pipeline can surface. Nothing is retried or recovered.
#[derive(Debug, Error)]
pub enum PokedexError {
    /// Bad argument combination or file extension
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input file missing or unreadable
    #[error("failed to read input file {}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote answered 404 for an identifier
    #[error("{category} '{id}' not found")]
    NotFound { category: Category, id: String },

    /// Network, TLS, timeout or non-404 error status
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A required key is missing or has the wrong shape
    #[error("malformed {category} payload for '{id}': {reason}")]
    MalformedPayload {
        category: Category,
        id: String,
        reason: String,
    },
}

impl PokedexError {
    pub(crate) fn malformed(
        category: Category,
        id: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        PokedexError::MalformedPayload {
            category,
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PokedexError>;
