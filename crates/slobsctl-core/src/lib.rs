//! Core types: remote status model, scenes, settings, notifications
//!
//! These are the data-transfer records exchanged with the remote broadcast
//! application. They are decoded fresh on every call and never cached; the
//! field names mirror the remote's JSON dialect.

pub mod notification;
pub mod scene;
pub mod settings;
pub mod state;
pub mod tracing;

pub use notification::{Notification, NotificationKind, NotificationOptions};
pub use scene::{Scene, SceneFolder, SceneItem, SceneNode, SceneNodeKind, Selection};
pub use settings::{SettingsParameter, SettingsSubCategory};
pub use state::{RecordingState, ReplayBufferState, StreamingServiceState, StreamingState};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
