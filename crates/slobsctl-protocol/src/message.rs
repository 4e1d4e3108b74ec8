//! Request and response envelopes for the remote's JSON-RPC dialect.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PROTOCOL_VERSION;
use crate::error::{ProtocolError, ProtocolResult, RemoteError};

/// Parameters of a request.
///
/// The remote addresses everything through named resources. Regular calls
/// pass a `{resource, args}` object; the generic model fetch (`getModel`)
/// passes the bare resource name instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// `{"resource": ..., "args": [...]}`
    Call { resource: String, args: Vec<Value> },
    /// Bare resource name, e.g. `"StreamingService"`.
    Resource(String),
}

impl Params {
    /// The resource this request is addressed to.
    pub fn resource(&self) -> &str {
        match self {
            Self::Call { resource, .. } => resource,
            Self::Resource(resource) => resource,
        }
    }
}

/// A JSON-RPC request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// JSON-RPC version number, always "2.0".
    pub jsonrpc: String,
    /// Call id, fresh per request; used to correlate the reply.
    pub id: u64,
    /// Name of the method to invoke on the resource.
    pub method: String,
    /// Method parameters in the remote's dialect.
    pub params: Params,
}

impl Request {
    /// Creates a regular call against a resource.
    pub fn call(
        id: u64,
        method: impl Into<String>,
        resource: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            jsonrpc: PROTOCOL_VERSION.to_string(),
            id,
            method: method.into(),
            params: Params::Call {
                resource: resource.into(),
                args,
            },
        }
    }

    /// Creates a generic model fetch for a resource.
    pub fn get_model(id: u64, resource: impl Into<String>) -> Self {
        Self {
            jsonrpc: PROTOCOL_VERSION.to_string(),
            id,
            method: "getModel".to_string(),
            params: Params::Resource(resource.into()),
        }
    }
}

/// A JSON-RPC response envelope.
///
/// Success is exactly `error == None`. `result` is decoded into whatever the
/// caller expects for the method; callers that must not trust the payload
/// (mutating calls with unreliable results) use [`Response::ack`] instead of
/// [`Response::into_result`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Response<T> {
    /// JSON-RPC version number.
    #[serde(default)]
    pub jsonrpc: String,
    /// Id of the request this reply answers.
    #[serde(default)]
    pub id: u64,
    /// Error object; present iff the call failed remotely.
    #[serde(default)]
    pub error: Option<RemoteError>,
    /// Decoded result; `None` when absent or null.
    #[serde(default)]
    pub result: Option<T>,
}

impl<T> Response<T> {
    /// Converts into the decoded result, surfacing a remote error as a value.
    pub fn into_result(self) -> ProtocolResult<T> {
        if let Some(error) = self.error {
            return Err(ProtocolError::Remote(error));
        }
        self.result.ok_or(ProtocolError::MissingResult)
    }

    /// Succeeds iff no error object is present; the payload is ignored.
    pub fn ack(self) -> ProtocolResult<()> {
        match self.error {
            Some(error) => Err(ProtocolError::Remote(error)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_params_resource() {
        let request = Request::call(3, "setVisibility", "SceneItem[\"s\",\"i\"]", vec![]);
        assert_eq!(request.params.resource(), "SceneItem[\"s\",\"i\"]");

        let request = Request::get_model(4, "StreamingService");
        assert_eq!(request.params.resource(), "StreamingService");
        assert_eq!(request.method, "getModel");
    }

    #[test]
    fn response_success_into_result() {
        let json = r#"{"jsonrpc":"2.0","id":9,"error":null,"result":{"value":5}}"#;
        let response: Response<Value> = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, 9);
        let result = response.into_result().unwrap();
        assert_eq!(result["value"], 5);
    }

    #[test]
    fn response_error_into_result() {
        let json = r#"{"jsonrpc":"2.0","id":9,"error":{"code":-32600,"message":"bad request"}}"#;
        let response: Response<Value> = serde_json::from_str(json).unwrap();
        let err = response.into_result().unwrap_err();
        match err {
            ProtocolError::Remote(remote) => {
                assert_eq!(remote.code, -32600);
                assert_eq!(remote.message, "bad request");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn response_null_result_is_missing() {
        let json = r#"{"jsonrpc":"2.0","id":1,"error":null,"result":null}"#;
        let response: Response<bool> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            response.into_result(),
            Err(ProtocolError::MissingResult)
        ));
    }

    #[test]
    fn ack_ignores_payload() {
        // The remote's mutating calls return payloads of unreliable shape;
        // ack must succeed on any of them as long as no error is present.
        for line in [
            r#"{"jsonrpc":"2.0","id":1,"error":null,"result":null}"#,
            r#"{"jsonrpc":"2.0","id":1,"error":null,"result":true}"#,
            r#"{"jsonrpc":"2.0","id":1,"error":null,"result":{"_type":"SUBSCRIPTION"}}"#,
        ] {
            let response: Response<Value> = serde_json::from_str(line).unwrap();
            response.ack().unwrap();
        }

        let line = r#"{"jsonrpc":"2.0","id":1,"error":{"code":5,"message":"busy"},"result":true}"#;
        let response: Response<Value> = serde_json::from_str(line).unwrap();
        assert!(response.ack().is_err());
    }
}
