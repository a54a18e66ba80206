//! Error types for the attestation dashboard core.

use thiserror::Error;

/// Error type for the attestation dashboard core.
#[derive(Error, Debug)]
pub enum AttestboardError {
    /// Indexer request or GraphQL-level error.
    #[error("indexer error: {0}")]
    Indexer(String),

    /// Response did not match the typed contract.
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Wallet session/adapter error.
    #[error("wallet error: {0}")]
    Wallet(String),
}

impl From<serde_json::Error> for AttestboardError {
    fn from(err: serde_json::Error) -> Self {
        AttestboardError::Decode(err.to_string())
    }
}
