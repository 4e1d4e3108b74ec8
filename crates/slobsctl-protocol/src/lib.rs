//! JSON-RPC envelopes and wire encoding for the remote's control channel.
//!
//! The remote speaks JSON-RPC 2.0 over a duplex byte channel, one UTF-8
//! encoded JSON object per line in each direction.
//!
//! # Envelope Structure
//!
//! Requests carry `{jsonrpc, id, method, params}` where `params` is the
//! remote's dialect: a `{resource, args}` object for regular calls, or the
//! bare resource name for the generic model fetch. Replies carry
//! `{jsonrpc, id, error, result}`; success is exactly "error is absent".
//!
//! # Example
//!
//! ```rust
//! use slobsctl_protocol::{Request, Response, encode_request, decode_response};
//!
//! let request = Request::call(1, "toggleStreaming", "StreamingService", vec![]);
//! let line = encode_request(&request).unwrap();
//! let reply: Response<bool> =
//!     decode_response(r#"{"jsonrpc":"2.0","id":1,"error":null,"result":true}"#).unwrap();
//! assert!(reply.error.is_none());
//! ```

mod error;
mod message;
mod wire;

pub use error::{ProtocolError, ProtocolResult, RemoteError};
pub use message::{Params, Request, Response};
pub use wire::{decode_response, encode_request};

/// JSON-RPC version constant.
pub const PROTOCOL_VERSION: &str = "2.0";
