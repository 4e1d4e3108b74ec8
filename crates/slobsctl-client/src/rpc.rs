//! RPC client: binds the JSON-RPC envelopes to a connection.
//!
//! One call at a time by contract. The channel frames one reply line per
//! request line, so replies are matched to requests by ordering; the id in
//! the reply is checked but only advisorily (a mismatch is logged, not
//! failed), since no concurrent calls are ever outstanding.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use slobsctl_protocol::{ProtocolResult, Request, Response, decode_response, encode_request};

use crate::connection::{AsyncConnection, Connection};

/// Blocking RPC client over a [`Connection`].
pub struct RpcClient<C> {
    connection: C,
    next_id: u64,
}

impl<C> RpcClient<C> {
    /// Creates a client over a connected channel.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            next_id: 1,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Consumes the client, returning the underlying connection.
    pub fn into_connection(self) -> C {
        self.connection
    }
}

impl<C: Connection> RpcClient<C> {
    fn exchange<T: DeserializeOwned>(&mut self, request: &Request) -> ProtocolResult<Response<T>> {
        let line = encode_request(request)?;
        debug!(
            id = request.id,
            method = %request.method,
            resource = %request.params.resource(),
            "sending request"
        );
        let reply = self.connection.send_and_receive_line(&line)?;
        let response: Response<T> = decode_response(&reply)?;
        if response.id != request.id {
            warn!(
                expected = request.id,
                received = response.id,
                "reply id mismatch"
            );
        }
        Ok(response)
    }

    /// Calls `method` on `resource` and decodes the result as `T`.
    pub fn call<T: DeserializeOwned>(
        &mut self,
        method: &str,
        resource: &str,
        args: Vec<Value>,
    ) -> ProtocolResult<T> {
        let request = Request::call(self.fresh_id(), method, resource, args);
        self.exchange(&request)?.into_result()
    }

    /// Calls `method` on `resource`, ignoring the result payload.
    ///
    /// Success is solely "no error object in the reply". This is the only
    /// correct reading for the remote's mutating calls, whose result shapes
    /// are not reliable.
    pub fn call_ack(&mut self, method: &str, resource: &str, args: Vec<Value>) -> ProtocolResult<()> {
        let request = Request::call(self.fresh_id(), method, resource, args);
        self.exchange::<Value>(&request)?.ack()
    }

    /// Fetches the model of a resource via the generic `getModel` call.
    pub fn get_model<T: DeserializeOwned>(&mut self, resource: &str) -> ProtocolResult<T> {
        let request = Request::get_model(self.fresh_id(), resource);
        self.exchange(&request)?.into_result()
    }
}

/// Suspending RPC client over an [`AsyncConnection`].
///
/// Same contract as [`RpcClient`]; provided for callers that cannot block a
/// thread. The command engine itself only uses the blocking form.
pub struct AsyncRpcClient<C> {
    connection: C,
    next_id: u64,
}

impl<C> AsyncRpcClient<C> {
    /// Creates a client over a connected channel.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            next_id: 1,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Consumes the client, returning the underlying connection.
    pub fn into_connection(self) -> C {
        self.connection
    }
}

impl<C: AsyncConnection> AsyncRpcClient<C> {
    async fn exchange<T: DeserializeOwned>(
        &mut self,
        request: &Request,
    ) -> ProtocolResult<Response<T>> {
        let line = encode_request(request)?;
        debug!(
            id = request.id,
            method = %request.method,
            resource = %request.params.resource(),
            "sending request"
        );
        let reply = self.connection.send_and_receive_line(&line).await?;
        let response: Response<T> = decode_response(&reply)?;
        if response.id != request.id {
            warn!(
                expected = request.id,
                received = response.id,
                "reply id mismatch"
            );
        }
        Ok(response)
    }

    /// Calls `method` on `resource` and decodes the result as `T`.
    pub async fn call<T: DeserializeOwned>(
        &mut self,
        method: &str,
        resource: &str,
        args: Vec<Value>,
    ) -> ProtocolResult<T> {
        let request = Request::call(self.fresh_id(), method, resource, args);
        self.exchange(&request).await?.into_result()
    }

    /// Calls `method` on `resource`, ignoring the result payload.
    pub async fn call_ack(
        &mut self,
        method: &str,
        resource: &str,
        args: Vec<Value>,
    ) -> ProtocolResult<()> {
        let request = Request::call(self.fresh_id(), method, resource, args);
        self.exchange::<Value>(&request).await?.ack()
    }

    /// Fetches the model of a resource via the generic `getModel` call.
    pub async fn get_model<T: DeserializeOwned>(&mut self, resource: &str) -> ProtocolResult<T> {
        let request = Request::get_model(self.fresh_id(), resource);
        self.exchange(&request).await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnection;
    use serde_json::json;
    use slobsctl_protocol::ProtocolError;

    #[test]
    fn call_decodes_typed_result() {
        let conn = FakeConnection::new(vec![
            r#"{"jsonrpc":"2.0","id":0,"error":null,"result":["a","b"]}"#.to_string(),
        ]);
        let mut rpc = RpcClient::new(conn);
        let names: Vec<String> = rpc.call("getNames", "ScenesService", vec![]).unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn ids_increment_per_call() {
        let conn = FakeConnection::new(vec![
            r#"{"jsonrpc":"2.0","id":0,"error":null,"result":1}"#.to_string(),
            r#"{"jsonrpc":"2.0","id":0,"error":null,"result":2}"#.to_string(),
        ]);
        let mut rpc = RpcClient::new(conn);
        let _: u64 = rpc.call("a", "R", vec![]).unwrap();
        let _: u64 = rpc.call("b", "R", vec![]).unwrap();

        let sent = rpc.connection().requests();
        assert_eq!(sent[0]["id"], 1);
        assert_eq!(sent[1]["id"], 2);
    }

    #[test]
    fn ack_succeeds_on_any_payload() {
        let conn = FakeConnection::new(vec![
            r#"{"jsonrpc":"2.0","id":0,"error":null,"result":null}"#.to_string(),
        ]);
        let mut rpc = RpcClient::new(conn);
        rpc.call_ack("toggleStreaming", "StreamingService", vec![])
            .unwrap();
    }

    #[test]
    fn remote_error_is_surfaced_as_value() {
        let conn = FakeConnection::new(vec![
            r#"{"jsonrpc":"2.0","id":0,"error":{"code":9,"message":"resource not found"}}"#
                .to_string(),
        ]);
        let mut rpc = RpcClient::new(conn);
        let err = rpc
            .call::<Value>("getModel", "NoSuchService", vec![])
            .unwrap_err();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("resource not found"));
    }

    #[test]
    fn exhausted_channel_is_fatal() {
        let mut rpc = RpcClient::new(FakeConnection::new(vec![]));
        let err = rpc
            .call::<Value>("getScenes", "ScenesService", vec![])
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_reply_is_fatal() {
        let conn = FakeConnection::new(vec!["garbage".to_string()]);
        let mut rpc = RpcClient::new(conn);
        let err = rpc
            .call::<Value>("getScenes", "ScenesService", vec![])
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn get_model_uses_bare_resource_params() {
        let conn = FakeConnection::new(vec![
            r#"{"jsonrpc":"2.0","id":0,"error":null,"result":{}}"#.to_string(),
        ]);
        let mut rpc = RpcClient::new(conn);
        let _: Value = rpc.get_model("StreamingService").unwrap();
        let sent = rpc.connection().requests();
        assert_eq!(sent[0]["params"], json!("StreamingService"));
    }

    struct FakeAsyncConnection {
        replies: std::collections::VecDeque<String>,
    }

    impl AsyncConnection for FakeAsyncConnection {
        async fn send_and_receive_line(&mut self, _line: &str) -> std::io::Result<String> {
            self.replies.pop_front().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted")
            })
        }
    }

    #[tokio::test]
    async fn async_call_decodes_typed_result() {
        let conn = FakeAsyncConnection {
            replies: vec![r#"{"jsonrpc":"2.0","id":1,"error":null,"result":true}"#.to_string()]
                .into(),
        };
        let mut rpc = AsyncRpcClient::new(conn);
        let flag: bool = rpc.call("isLive", "StreamingService", vec![]).await.unwrap();
        assert!(flag);
    }
}
