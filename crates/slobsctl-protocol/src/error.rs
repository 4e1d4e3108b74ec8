//! Protocol error types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// The JSON-RPC error object a reply may carry.
///
/// Its presence means the remote rejected or failed the call; the channel
/// itself is still healthy.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("remote error {code}: {message}")]
pub struct RemoteError {
    /// Numeric error type.
    pub code: i64,
    /// Short description of the error.
    pub message: String,
    /// Additional structured information, if any.
    #[serde(default)]
    pub data: Value,
}

/// Errors that can occur during a request/reply exchange.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to serialize a request to its wire line.
    #[error("failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The reply line was not a well-formed response object.
    #[error("malformed reply: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The channel failed mid-exchange (closed, unreachable, timed out).
    #[error("transport failure: {0}")]
    Io(#[from] std::io::Error),

    /// The remote answered with a JSON-RPC error object.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A success reply carried no result where one was expected.
    #[error("reply carried neither a result nor an error")]
    MissingResult,
}

impl ProtocolError {
    /// Whether this error ends the run.
    ///
    /// A [`RemoteError`] is an outcome of one call; everything else means
    /// the channel can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Remote(_))
    }
}
