//! Line-oriented wire encoding.
//!
//! One JSON object per line in each direction, UTF-8. `serde_json` never
//! emits raw newlines inside a compact document, so an encoded request is
//! always exactly one line.

use serde::de::DeserializeOwned;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{Request, Response};

/// Encodes a request to its single wire line (without the trailing newline).
pub fn encode_request(request: &Request) -> ProtocolResult<String> {
    serde_json::to_string(request).map_err(ProtocolError::Serialization)
}

/// Decodes one reply line into a typed response envelope.
pub fn decode_response<T: DeserializeOwned>(line: &str) -> ProtocolResult<Response<T>> {
    serde_json::from_str(line.trim_end()).map_err(ProtocolError::Malformed)
}
