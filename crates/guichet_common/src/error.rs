//! Shared error type for the guichet crates.
//!
//! A short location text is not an error: the dialogue engine turns it into
//! a retry reply. Errors here are the ones the HTTP edge has to surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuichetError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{what} #{id} not found")]
    NotFound { what: &'static str, id: u64 },

    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuichetError>;
