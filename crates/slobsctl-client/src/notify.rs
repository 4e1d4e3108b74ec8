//! Notification sink: mirrors engine failures into the remote's own UI.
//!
//! When a command is rejected (precondition or lookup), the operator is
//! usually looking at the remote application, not at this tool's stderr. The
//! engine therefore pushes a warning into the remote's notification area via
//! the one-way `push` call. The sink is an injected capability so tests can
//! record pushes without a live channel.

use slobsctl_core::{NotificationKind, NotificationOptions};
use slobsctl_protocol::{ProtocolError, ProtocolResult};

use crate::connection::Connection;
use crate::rpc::RpcClient;

/// Resource name of the remote's notification service.
pub const NOTIFICATIONS_SERVICE: &str = "NotificationsService";

/// Prefix marking a notification as coming from this bridge.
pub const MESSAGE_PREFIX: &str = "Remote: ";

/// Where engine-raised warnings go.
pub trait NotificationSink<C: Connection> {
    /// Pushes one user-facing message.
    ///
    /// Fire-and-forget: the engine never inspects the outcome beyond
    /// protocol-level success.
    fn push(
        &mut self,
        rpc: &mut RpcClient<C>,
        message: &str,
        kind: NotificationKind,
    ) -> ProtocolResult<()>;
}

/// The real sink: pushes into the remote application's notification area
/// over the same channel the engine uses for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteNotifier;

impl<C: Connection> NotificationSink<C> for RemoteNotifier {
    fn push(
        &mut self,
        rpc: &mut RpcClient<C>,
        message: &str,
        kind: NotificationKind,
    ) -> ProtocolResult<()> {
        let options =
            NotificationOptions::new(format!("{MESSAGE_PREFIX}{message}")).with_kind(kind);
        let args = vec![serde_json::to_value(&options).map_err(ProtocolError::Serialization)?];
        rpc.call_ack("push", NOTIFICATIONS_SERVICE, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeConnection, ok_reply};
    use serde_json::json;

    #[test]
    fn push_prefixes_and_defaults() {
        let conn = FakeConnection::new(vec![ok_reply(json!(null))]);
        let mut rpc = RpcClient::new(conn);
        RemoteNotifier
            .push(&mut rpc, "Stream is already live.", NotificationKind::Warning)
            .unwrap();

        let sent = rpc.connection().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["method"], "push");
        assert_eq!(sent[0]["params"]["resource"], NOTIFICATIONS_SERVICE);

        let options = &sent[0]["params"]["args"][0];
        assert_eq!(options["message"], "Remote: Stream is already live.");
        assert_eq!(options["type"], "WARNING");
        assert_eq!(options["playSound"], true);
        assert_eq!(options["lifeTime"], 8000);
        assert_eq!(options["unread"], true);
    }
}
