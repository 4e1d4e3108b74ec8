//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::control::ShowMode;

/// slobsctl - remote-control a running broadcast application
#[derive(Debug, Parser)]
#[command(name = "slobsctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address of the machine running the application
    #[arg(long, short = 'a', env = "SLOBSCTL_ADDRESS")]
    pub address: Option<String>,

    /// Path to configuration file
    #[arg(long, short = 'c', env = "SLOBSCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Connection timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the stream
    StartStreaming,

    /// Stop the stream
    StopStreaming,

    /// Start the recording
    StartRecording,

    /// Stop the recording
    StopRecording,

    /// Start the replay buffer
    StartReplayBuffer,

    /// Stop the replay buffer
    StopReplayBuffer,

    /// Save the replay buffer
    SaveReplayBuffer,

    /// Save the replay buffer, then showcase a scene while the clip is written
    SaveReplaySwitch {
        /// Scene to change to once the save completes
        scene: String,

        /// Seconds subtracted from the buffer length before changing back
        #[arg(long, default_value_t = 3)]
        offset: u64,
    },

    /// Change to a scene
    ChangeScene {
        /// Scene to change to
        scene: String,

        /// Seconds to wait before changing
        #[arg(long, default_value_t = 0)]
        delay: u64,
    },

    /// Change to a scene, wait, then change to a return scene
    SwapScenes {
        /// Scene to change to
        target: String,

        /// Seconds to stay on the target scene
        delay: u64,

        /// Scene to return to; the currently active scene if omitted
        return_scene: Option<String>,
    },

    /// Show or hide a source, optionally timed
    ItemVisibility {
        /// Source to show or hide
        source: String,

        /// Visibility sequence: on, off, onoff or offon
        mode: ShowMode,

        /// Seconds before the change (on/off) or between the two changes
        /// (onoff/offon)
        #[arg(long, default_value_t = 0)]
        delay: u64,

        /// Scene to look the source up in; the active scene if omitted
        #[arg(long)]
        scene: Option<String>,
    },

    /// Show or hide all members of a folder at once, optionally timed
    FolderVisibility {
        /// Folder to show or hide
        folder: String,

        /// Visibility sequence: on, off, onoff or offon
        mode: ShowMode,

        /// Seconds before the change (on/off) or between the two changes
        /// (onoff/offon)
        #[arg(long, default_value_t = 0)]
        delay: u64,

        /// Scene to look the folder up in; the active scene if omitted
        #[arg(long)]
        scene: Option<String>,
    },
}

impl Command {
    /// Command name as typed on the command line, for error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartStreaming => "start-streaming",
            Self::StopStreaming => "stop-streaming",
            Self::StartRecording => "start-recording",
            Self::StopRecording => "stop-recording",
            Self::StartReplayBuffer => "start-replay-buffer",
            Self::StopReplayBuffer => "stop-replay-buffer",
            Self::SaveReplayBuffer => "save-replay-buffer",
            Self::SaveReplaySwitch { .. } => "save-replay-switch",
            Self::ChangeScene { .. } => "change-scene",
            Self::SwapScenes { .. } => "swap-scenes",
            Self::ItemVisibility { .. } => "item-visibility",
            Self::FolderVisibility { .. } => "folder-visibility",
        }
    }
}
