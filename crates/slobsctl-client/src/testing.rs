//! Test doubles shared by the unit tests in this crate.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use serde_json::{Value, json};

use crate::connection::Connection;
use crate::control::Sleeper;

/// Transport spy: answers each request from a scripted reply queue and
/// records every request line it saw.
pub(crate) struct FakeConnection {
    replies: VecDeque<String>,
    sent: Vec<String>,
}

impl FakeConnection {
    pub(crate) fn new(replies: Vec<String>) -> Self {
        Self {
            replies: replies.into(),
            sent: Vec::new(),
        }
    }

    /// Every recorded request, parsed.
    pub(crate) fn requests(&self) -> Vec<Value> {
        self.sent
            .iter()
            .map(|line| serde_json::from_str(line).expect("recorded request is valid JSON"))
            .collect()
    }

    /// `(method, resource)` of every recorded request, in order.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.requests()
            .iter()
            .map(|req| {
                let method = req["method"].as_str().unwrap_or_default().to_string();
                let resource = match &req["params"] {
                    Value::String(resource) => resource.clone(),
                    params => params["resource"].as_str().unwrap_or_default().to_string(),
                };
                (method, resource)
            })
            .collect()
    }

    /// How many requests invoked `method`.
    pub(crate) fn count_method(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }
}

impl Connection for FakeConnection {
    fn send_and_receive_line(&mut self, line: &str) -> io::Result<String> {
        self.sent.push(line.to_string());
        let reply = self
            .replies
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "reply script exhausted"))?;

        // Patch the correlation id so each scripted reply matches the
        // request that consumed it.
        let request: Value = serde_json::from_str(line).expect("request is valid JSON");
        let mut reply: Value = match serde_json::from_str(&reply) {
            Ok(value) => value,
            // Deliberately malformed scripts pass through untouched.
            Err(_) => return Ok(reply),
        };
        reply["id"] = request["id"].clone();
        Ok(reply.to_string())
    }
}

/// Records requested sleeps instead of serving them.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    pub(crate) slept: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// A success reply carrying `result`.
pub(crate) fn ok_reply(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": 0, "error": null, "result": result}).to_string()
}

/// An error reply.
pub(crate) fn error_reply(code: i64, message: &str) -> String {
    json!({"jsonrpc": "2.0", "id": 0, "error": {"code": code, "message": message}}).to_string()
}

/// A `getModel` reply for the streaming service.
pub(crate) fn state_reply(streaming: &str, recording: &str, replay: &str) -> String {
    ok_reply(json!({
        "streamingStatus": streaming,
        "streamingStatusTime": "2024-03-02T20:14:05.123Z",
        "recordingStatus": recording,
        "recordingStatusTime": "2024-03-02T20:14:05.123Z",
        "replayBufferStatus": replay,
        "replayBufferStatusTime": "2024-03-02T20:14:05.123Z",
    }))
}

/// A scene record as the remote would return it.
pub(crate) fn scene(id: &str, name: &str) -> Value {
    json!({
        "_type": "Scene",
        "resourceId": format!("Scene[\"{id}\"]"),
        "id": id,
        "name": name,
        "nodes": [],
    })
}

/// A `getScenes` reply.
pub(crate) fn scenes_reply(scenes: &[(&str, &str)]) -> String {
    ok_reply(Value::Array(
        scenes.iter().map(|(id, name)| scene(id, name)).collect(),
    ))
}

/// An `activeScene` reply.
pub(crate) fn active_scene_reply(id: &str, name: &str) -> String {
    ok_reply(scene(id, name))
}

/// A scene item record.
pub(crate) fn item(id: &str, name: &str, visible: bool) -> Value {
    json!({
        "_type": "SceneItem",
        "resourceId": format!("SceneItem[\"{id}\"]"),
        "id": id,
        "name": name,
        "sceneId": "scene-1",
        "sourceId": format!("source-{id}"),
        "sceneNodeType": "item",
        "visible": visible,
        "locked": false,
    })
}

/// A scene folder record.
pub(crate) fn folder(id: &str, name: &str) -> Value {
    json!({
        "_type": "SceneItemFolder",
        "resourceId": format!("SceneItemFolder[\"{id}\"]"),
        "id": id,
        "name": name,
        "sceneId": "scene-1",
        "sceneNodeType": "folder",
        "childrenIds": ["child-1", "child-2"],
    })
}

/// A `getSelection` reply for a folder's members.
pub(crate) fn selection_reply(id: &str) -> String {
    ok_reply(json!({
        "_type": "Selection",
        "resourceId": format!("Selection[\"{id}\"]"),
        "selectedIds": ["child-1", "child-2"],
    }))
}

/// A `getSettingsFormData` reply for the Output category. `rb_time` is the
/// raw value of the `RecRBTime` parameter; `None` omits the whole subcategory.
pub(crate) fn settings_reply(rb_time: Option<Value>) -> String {
    let mut subcategories = vec![json!({
        "nameSubCategory": "Recording",
        "parameters": [
            {"name": "RecFormat", "type": "OBS_PROPERTY_LIST", "currentValue": "mkv"},
        ],
    })];
    if let Some(value) = rb_time {
        subcategories.push(json!({
            "nameSubCategory": "Replay Buffer",
            "parameters": [
                {"name": "RecRB", "type": "OBS_PROPERTY_BOOL", "currentValue": true},
                {"name": "RecRBTime", "type": "OBS_PROPERTY_INT", "currentValue": value},
            ],
        }));
    }
    ok_reply(Value::Array(subcategories))
}
