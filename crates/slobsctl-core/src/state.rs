//! Status model of the remote streaming service.
//!
//! This module provides the read-only snapshot returned by the remote's
//! `getModel` call on the `StreamingService` resource:
//! - [`StreamingState`]: the live stream lifecycle
//! - [`RecordingState`]: the local recording lifecycle
//! - [`ReplayBufferState`]: the replay buffer lifecycle
//! - [`StreamingServiceState`]: the combined snapshot
//!
//! The remote mutates these asynchronously on its own; a snapshot is only
//! guaranteed valid at the moment it was read.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the outgoing stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingState {
    /// No stream is running.
    Offline,
    /// Stream startup has been requested and is in progress.
    Starting,
    /// The stream is live.
    Live,
    /// The connection dropped and the remote is re-establishing it.
    Reconnecting,
    /// Stream shutdown is in progress.
    Ending,
}

/// Lifecycle state of the local recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording is running.
    Offline,
    /// Recording startup is in progress.
    Starting,
    /// Recording to disk.
    Recording,
    /// Recording shutdown is in progress.
    Stopping,
}

/// Lifecycle state of the replay buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayBufferState {
    /// The buffer is not running.
    Offline,
    /// The buffer is capturing.
    Running,
    /// A save of the buffered clip is in progress.
    Saving,
    /// Buffer shutdown is in progress.
    Stopping,
}

impl std::fmt::Display for StreamingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Offline => "offline",
            Self::Starting => "starting",
            Self::Live => "live",
            Self::Reconnecting => "reconnecting",
            Self::Ending => "ending",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Offline => "offline",
            Self::Starting => "starting",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for ReplayBufferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Offline => "offline",
            Self::Running => "running",
            Self::Saving => "saving",
            Self::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

/// Combined status snapshot of the remote streaming service.
///
/// The `*_status_time` fields carry the remote's own timestamps for the last
/// transition; they are opaque to this tool and kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingServiceState {
    /// Current stream state.
    pub streaming_status: StreamingState,

    /// Timestamp of the last stream transition.
    #[serde(default)]
    pub streaming_status_time: String,

    /// Current recording state.
    pub recording_status: RecordingState,

    /// Timestamp of the last recording transition.
    #[serde(default)]
    pub recording_status_time: String,

    /// Current replay buffer state.
    pub replay_buffer_status: ReplayBufferState,

    /// Timestamp of the last replay buffer transition.
    #[serde(default)]
    pub replay_buffer_status_time: String,
}
