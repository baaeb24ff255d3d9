//! Error types for the booking API client.
//!
//! # Design
//! Remote failures are not errors here: a 404 or a 500 is a response like any
//! other and is handed back to the caller. `ApiError` only covers what goes
//! wrong on this side of the wire, plus `UnexpectedStatus` for the few
//! helpers (the booking guard, token fetch) that need a specific status to
//! make progress.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The auth endpoint answered without a token.
    #[error("authentication refused: {reason}")]
    Unauthenticated { reason: String },

    #[error("expected HTTP {expected}, got {status}: {body}")]
    UnexpectedStatus {
        expected: u16,
        status: u16,
        body: String,
    },
}
