//! The guarded command engine.
//!
//! Every command here is a small state machine over a live, externally
//! mutated system: fetch the remote's state, check it against a fixed
//! legality table, and only then mutate. The checks are mandatory because
//! the remote's start/stop calls are toggles; issuing one from the wrong
//! state would invert the intent (e.g. stopping an already-live stream).
//!
//! The state is only guaranteed valid at the moment it was read; the race
//! window of one round trip between check and act is accepted, since the
//! remote exposes no transactional read-modify-write.
//!
//! Multi-step commands (scene swap, timed visibility, save-and-switch)
//! interleave calls with plain blocking sleeps on the calling thread. Once a
//! sequence starts it runs to completion or until a call fails; there is no
//! cancellation and no rollback of already-applied steps.

use std::str::FromStr;
use std::time::Duration;

use serde_json::json;
use tracing::info;

use slobsctl_core::{
    NotificationKind, RecordingState, ReplayBufferState, Scene, SceneFolder, SceneItem, Selection,
    SettingsSubCategory, StreamingServiceState, StreamingState,
};
use slobsctl_protocol::ProtocolResult;

use crate::connection::Connection;
use crate::notify::{NotificationSink, RemoteNotifier};
use crate::rpc::RpcClient;

const STREAMING_SERVICE: &str = "StreamingService";
const SCENES_SERVICE: &str = "ScenesService";
const SETTINGS_SERVICE: &str = "SettingsService";

/// Interval between state fetches while waiting for a replay save to settle.
const SAVE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Floor on the showcase wait in save-and-switch, in seconds.
const MIN_REVERT_WAIT_SECS: u64 = 5;

/// Outcome of one command.
///
/// Business rejections (preconditions, lookups) land here with
/// `success == false`; they are expected outcomes, not errors. Only
/// transport-level failures surface as `Err` from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlStatus {
    pub success: bool,
    pub message: Option<String>,
}

impl ControlStatus {
    /// A successful command.
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// A rejected command with a human-readable reason.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Visibility sequence applied by the timed show/hide commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowMode {
    /// Optional pre-delay, then show.
    On,
    /// Optional pre-delay, then hide.
    Off,
    /// Show, wait, hide.
    OnOff,
    /// Hide, wait, show.
    OffOn,
}

impl FromStr for ShowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "onoff" => Ok(Self::OnOff),
            "offon" => Ok(Self::OffOn),
            other => Err(format!(
                "unknown visibility mode '{other}', use `on`, `off`, `onoff` or `offon`"
            )),
        }
    }
}

/// Blocking delay provider.
///
/// Exists so tests observe the engine's delays instead of serving them;
/// production code always uses [`ThreadSleeper`].
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// The guarded command engine over a connected RPC client.
pub struct Control<C, N = RemoteNotifier, S = ThreadSleeper> {
    rpc: RpcClient<C>,
    notifier: N,
    sleeper: S,
}

impl<C: Connection> Control<C> {
    /// Creates an engine with the real notification sink and thread sleeps.
    pub fn new(rpc: RpcClient<C>) -> Self {
        Self::with_parts(rpc, RemoteNotifier, ThreadSleeper)
    }
}

impl<C, N, S> Control<C, N, S>
where
    C: Connection,
    N: NotificationSink<C>,
    S: Sleeper,
{
    /// Creates an engine from explicit parts.
    pub fn with_parts(rpc: RpcClient<C>, notifier: N, sleeper: S) -> Self {
        Self {
            rpc,
            notifier,
            sleeper,
        }
    }

    /// Consumes the engine, returning the underlying connection.
    pub fn into_connection(self) -> C {
        self.rpc.into_connection()
    }

    // ----- streaming -------------------------------------------------------

    /// Starts the stream, unless one is already up.
    pub fn start_streaming(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.streaming_status {
                StreamingState::Offline | StreamingState::Ending => {
                    ctl.rpc.call_ack("toggleStreaming", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Stream is already live or is reconnecting"),
            }
        })
    }

    /// Stops the stream, unless none is up.
    pub fn stop_streaming(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.streaming_status {
                StreamingState::Live | StreamingState::Starting | StreamingState::Reconnecting => {
                    ctl.rpc.call_ack("toggleStreaming", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Stream is already stopped or is stopping"),
            }
        })
    }

    // ----- recording -------------------------------------------------------

    /// Starts the recording, unless one is already running.
    pub fn start_recording(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.recording_status {
                RecordingState::Offline | RecordingState::Stopping => {
                    ctl.rpc.call_ack("toggleRecording", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Recording is already started or is starting"),
            }
        })
    }

    /// Stops the recording, unless none is running.
    pub fn stop_recording(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.recording_status {
                RecordingState::Recording | RecordingState::Starting => {
                    ctl.rpc.call_ack("toggleRecording", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Recording is already stopped or is stopping"),
            }
        })
    }

    // ----- replay buffer ---------------------------------------------------

    /// Starts the replay buffer, unless it is already running.
    pub fn start_replay_buffer(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.replay_buffer_status {
                ReplayBufferState::Offline | ReplayBufferState::Stopping => {
                    ctl.rpc
                        .call_ack("startReplayBuffer", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Replay Buffer is already running"),
            }
        })
    }

    /// Stops the replay buffer, unless it is already down.
    pub fn stop_replay_buffer(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.replay_buffer_status {
                ReplayBufferState::Running | ReplayBufferState::Saving => {
                    ctl.rpc
                        .call_ack("stopReplayBuffer", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Replay Buffer is already stopped or is stopping"),
            }
        })
    }

    /// Saves the replay buffer, if it is running and not already saving.
    pub fn save_replay_buffer(&mut self) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let state = ctl.service_state()?;
            match state.replay_buffer_status {
                ReplayBufferState::Running => {
                    ctl.rpc.call_ack("saveReplay", STREAMING_SERVICE, vec![])?;
                    Ok(ControlStatus::ok())
                }
                _ => ctl.reject("Replay Buffer is stopped or is already saving"),
            }
        })
    }

    /// Saves the replay buffer, then showcases `scene` while the clip is
    /// written out, returning to the previously active scene afterwards.
    ///
    /// The showcase lasts the configured buffer length minus `offset`
    /// seconds, but never less than five, so the wait always covers the
    /// saved clip. The save itself has no completion event; the engine polls
    /// the state every 200 ms until it leaves `saving`.
    pub fn save_replay_and_switch(
        &mut self,
        scene: &str,
        offset: u64,
    ) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let form: Vec<SettingsSubCategory> =
                ctl.rpc
                    .call("getSettingsFormData", SETTINGS_SERVICE, vec![json!("Output")])?;
            let Some(buffer_len) = replay_buffer_seconds(&form) else {
                return ctl.reject("Unable to find the Replay Buffer length from settings");
            };

            let state = ctl.service_state()?;
            if matches!(
                state.replay_buffer_status,
                ReplayBufferState::Offline | ReplayBufferState::Stopping
            ) {
                return ctl.reject("Replay Buffer is not running or is stopping");
            }

            // A save may already be in flight; issuing another would clash.
            if state.replay_buffer_status == ReplayBufferState::Running {
                ctl.rpc.call_ack("saveReplay", STREAMING_SERVICE, vec![])?;
            }

            loop {
                ctl.sleeper.sleep(SAVE_POLL_INTERVAL);
                let polled = ctl.service_state()?;
                if polled.replay_buffer_status != ReplayBufferState::Saving {
                    break;
                }
            }

            let scenes: Vec<Scene> = ctl.rpc.call("getScenes", SCENES_SERVICE, vec![])?;
            let Some(target) = scenes.iter().find(|s| s.name == scene) else {
                return ctl.reject(&format!(
                    "Saved the Replay Buffer but could not find the targeted scene '{scene}'"
                ));
            };

            let current: Scene = ctl.rpc.call("activeScene", SCENES_SERVICE, vec![])?;
            if target.id == current.id {
                return Ok(ControlStatus::ok());
            }

            ctl.rpc
                .call_ack("makeSceneActive", SCENES_SERVICE, vec![json!(target.id)])?;
            let wait = revert_wait_secs(buffer_len, offset);
            info!(seconds = wait, scene = %target.name, "showing replay scene");
            ctl.sleeper.sleep(Duration::from_secs(wait));
            ctl.rpc
                .call_ack("makeSceneActive", SCENES_SERVICE, vec![json!(current.id)])?;
            Ok(ControlStatus::ok())
        })
    }

    // ----- scenes ----------------------------------------------------------

    /// Changes to `scene`, optionally waiting `delay` seconds first.
    pub fn change_to_scene(&mut self, scene: &str, delay: u64) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            if delay > 0 {
                ctl.sleeper.sleep(Duration::from_secs(delay));
            }
            let scenes: Vec<Scene> = ctl.rpc.call("getScenes", SCENES_SERVICE, vec![])?;
            match scenes.iter().find(|s| s.name == scene) {
                Some(found) => {
                    ctl.rpc
                        .call_ack("makeSceneActive", SCENES_SERVICE, vec![json!(found.id)])?;
                    Ok(ControlStatus::ok())
                }
                None => ctl.reject(&format!("Scene '{scene}' not found to change to")),
            }
        })
    }

    /// Changes to `target`, stays there `delay` seconds, then changes to
    /// `return_scene` (or whatever was active when the swap began).
    ///
    /// Both names are resolved in a single pass over the scene list; the
    /// active scene is captured before that pass. If neither resolves, the
    /// target's absence is reported first.
    pub fn swap_scenes(
        &mut self,
        target: &str,
        delay: u64,
        return_scene: Option<&str>,
    ) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let scenes: Vec<Scene> = ctl.rpc.call("getScenes", SCENES_SERVICE, vec![])?;

            let mut return_id = match return_scene {
                None => {
                    let active: Scene = ctl.rpc.call("activeScene", SCENES_SERVICE, vec![])?;
                    Some(active.id)
                }
                Some(_) => None,
            };

            let mut target_id = None;
            for s in &scenes {
                if s.name == target {
                    target_id = Some(s.id.clone());
                }
                if return_id.is_none() && return_scene.is_some_and(|name| name == s.name) {
                    return_id = Some(s.id.clone());
                }
                if target_id.is_some() && return_id.is_some() {
                    break;
                }
            }

            let Some(target_id) = target_id else {
                return ctl.reject(&format!("Scene '{target}' not found to change to"));
            };
            let Some(return_id) = return_id else {
                // Only reachable when an explicit return scene was named.
                let name = return_scene.unwrap_or(target);
                return ctl.reject(&format!("Scene '{name}' not found to return to"));
            };

            ctl.rpc
                .call_ack("makeSceneActive", SCENES_SERVICE, vec![json!(target_id)])?;
            if delay > 0 {
                ctl.sleeper.sleep(Duration::from_secs(delay));
            }
            ctl.rpc
                .call_ack("makeSceneActive", SCENES_SERVICE, vec![json!(return_id)])?;
            Ok(ControlStatus::ok())
        })
    }

    // ----- visibility ------------------------------------------------------

    /// Applies a visibility sequence to the named source, looked up in
    /// `scene` or in the currently active scene.
    pub fn set_item_visibility(
        &mut self,
        item: &str,
        mode: ShowMode,
        delay: u64,
        scene: Option<&str>,
    ) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let scene_resource = match ctl.scene_resource(scene)? {
                Ok(resource) => resource,
                Err(fail) => return Ok(fail),
            };

            let items: Vec<SceneItem> = ctl.rpc.call("getItems", &scene_resource, vec![])?;
            match items.iter().find(|i| i.name == item) {
                Some(found) => {
                    ctl.apply_visibility(&found.resource_id, mode, delay)?;
                    Ok(ControlStatus::ok())
                }
                None => {
                    let message = match scene {
                        None => format!("Source '{item}' not found in current scene"),
                        Some(name) => format!("Source '{item}' not found in scene '{name}'"),
                    };
                    ctl.reject(&message)
                }
            }
        })
    }

    /// Applies a visibility sequence to all members of the named folder at
    /// once, looked up in `scene` or in the currently active scene.
    pub fn set_folder_visibility(
        &mut self,
        folder: &str,
        mode: ShowMode,
        delay: u64,
        scene: Option<&str>,
    ) -> ProtocolResult<ControlStatus> {
        self.run(|ctl| {
            let scene_resource = match ctl.scene_resource(scene)? {
                Ok(resource) => resource,
                Err(fail) => return Ok(fail),
            };

            let folders: Vec<SceneFolder> = ctl.rpc.call("getFolders", &scene_resource, vec![])?;
            match folders.iter().find(|f| f.name == folder) {
                Some(found) => {
                    // One call against the folder's selection flips every
                    // member atomically, instead of per-item calls.
                    let selection: Selection =
                        ctl.rpc.call("getSelection", &found.resource_id, vec![])?;
                    ctl.apply_visibility(&selection.resource_id, mode, delay)?;
                    Ok(ControlStatus::ok())
                }
                None => {
                    let message = match scene {
                        None => format!("Folder '{folder}' not found in current scene"),
                        Some(name) => format!("Folder '{folder}' not found in scene '{name}'"),
                    };
                    ctl.reject(&message)
                }
            }
        })
    }

    // ----- internals -------------------------------------------------------

    /// Runs one command body, folding remote rejections into a failed
    /// status. Only channel-level failures propagate as errors.
    fn run(
        &mut self,
        body: impl FnOnce(&mut Self) -> ProtocolResult<ControlStatus>,
    ) -> ProtocolResult<ControlStatus> {
        match body(self) {
            Err(err) if !err.is_fatal() => Ok(ControlStatus::failure(err.to_string())),
            other => other,
        }
    }

    fn service_state(&mut self) -> ProtocolResult<StreamingServiceState> {
        self.rpc.get_model(STREAMING_SERVICE)
    }

    /// Rejects the command: one notification into the remote, one failure
    /// status back to the caller.
    fn reject(&mut self, message: &str) -> ProtocolResult<ControlStatus> {
        self.notify(&format!("{message}."))?;
        Ok(ControlStatus::failure(message))
    }

    /// Pushes a warning into the remote's notification area. A remote
    /// rejection of the push itself is logged and swallowed so it cannot
    /// mask the message being reported.
    fn notify(&mut self, message: &str) -> ProtocolResult<()> {
        match self
            .notifier
            .push(&mut self.rpc, message, NotificationKind::Warning)
        {
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "notification push rejected by remote");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    /// Resolves the scene to operate in: the named one, or the active one.
    /// `Err(status)` is the rejection for a named scene that does not exist.
    fn scene_resource(
        &mut self,
        scene: Option<&str>,
    ) -> ProtocolResult<Result<String, ControlStatus>> {
        match scene {
            None => {
                let active: Scene = self.rpc.call("activeScene", SCENES_SERVICE, vec![])?;
                Ok(Ok(active.resource_id))
            }
            Some(name) => {
                let scenes: Vec<Scene> = self.rpc.call("getScenes", SCENES_SERVICE, vec![])?;
                match scenes.into_iter().find(|s| s.name == name) {
                    Some(found) => Ok(Ok(found.resource_id)),
                    None => self.reject(&format!("Scene '{name}' not found")).map(Err),
                }
            }
        }
    }

    /// Applies `mode` against a resolved item or selection resource.
    fn apply_visibility(
        &mut self,
        resource_id: &str,
        mode: ShowMode,
        delay: u64,
    ) -> ProtocolResult<()> {
        let delay = Duration::from_secs(delay);
        match mode {
            ShowMode::On => {
                if !delay.is_zero() {
                    self.sleeper.sleep(delay);
                }
                self.set_visibility(resource_id, true)
            }
            ShowMode::Off => {
                if !delay.is_zero() {
                    self.sleeper.sleep(delay);
                }
                self.set_visibility(resource_id, false)
            }
            ShowMode::OnOff => {
                self.set_visibility(resource_id, true)?;
                self.sleeper.sleep(delay);
                self.set_visibility(resource_id, false)
            }
            ShowMode::OffOn => {
                self.set_visibility(resource_id, false)?;
                self.sleeper.sleep(delay);
                self.set_visibility(resource_id, true)
            }
        }
    }

    fn set_visibility(&mut self, resource_id: &str, visible: bool) -> ProtocolResult<()> {
        self.rpc
            .call_ack("setVisibility", resource_id, vec![json!(visible)])
    }
}

/// Reads the replay buffer length in seconds from the Output settings form.
fn replay_buffer_seconds(form: &[SettingsSubCategory]) -> Option<u64> {
    form.iter()
        .find(|sub| sub.name_sub_category == "Replay Buffer")?
        .parameters
        .iter()
        .find(|param| param.name == "RecRBTime")?
        .current_value_as_u64()
}

/// How long to stay on the showcase scene before reverting.
fn revert_wait_secs(buffer_len: u64, offset: u64) -> u64 {
    buffer_len.saturating_sub(offset).max(MIN_REVERT_WAIT_SECS)
}
