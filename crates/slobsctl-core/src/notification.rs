//! Notification records for the remote application's own notification UI.
//!
//! The bridge mirrors its failure messages into the remote so the operator
//! sees them inside the application they are looking at, via the one-way
//! `push` call on `NotificationsService`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a pushed notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
}

/// Options sent with a `push` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub message: String,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Play the remote's notification sound.
    pub play_sound: bool,

    /// Status-bar visibility in milliseconds.
    pub life_time: u32,

    /// Show a timestamp next to the message.
    pub show_time: bool,

    /// Leave the notification unread in the remote's list.
    pub unread: bool,
}

impl NotificationOptions {
    /// Creates options with the remote's conventional defaults: sound on,
    /// visible for 8 seconds, no timestamp, unread.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
            play_sound: true,
            life_time: 8000,
            show_time: false,
            unread: true,
        }
    }

    /// Builder: set the severity.
    pub fn with_kind(mut self, kind: NotificationKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A notification as echoed back by the remote after a `push`.
///
/// The bridge never inspects this beyond protocol-level success; it is kept
/// for completeness of the dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub data: Value,

    pub unread: bool,

    /// Unix timestamp in milliseconds.
    pub date: i64,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub life_time: i64,

    pub show_time: bool,

    pub play_sound: bool,

    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::Warning).unwrap(),
            "\"WARNING\""
        );
        let parsed: NotificationKind = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(parsed, NotificationKind::Info);
    }

    #[test]
    fn options_defaults() {
        let opts = NotificationOptions::new("Remote: Stream is already live.");
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["type"], "INFO");
        assert_eq!(json["playSound"], true);
        assert_eq!(json["lifeTime"], 8000);
        assert_eq!(json["showTime"], false);
        assert_eq!(json["unread"], true);
    }

    #[test]
    fn options_with_kind() {
        let opts = NotificationOptions::new("msg").with_kind(NotificationKind::Warning);
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["type"], "WARNING");
    }

    #[test]
    fn notification_from_remote_json() {
        let json = r#"{
            "id": 7,
            "unread": true,
            "date": 1709410445123,
            "type": "WARNING",
            "lifeTime": 8000,
            "showTime": false,
            "playSound": true,
            "message": "Remote: Scene 'Replay' not found."
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.id, 7);
        assert!(n.code.is_none());
    }
}
