//! slobsctl CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use slobsctl_client::cli::{Cli, Command};
use slobsctl_client::config::ClientConfig;
use slobsctl_client::control::{Control, ControlStatus};
use slobsctl_client::error::{ClientError, ClientResult};
use slobsctl_client::{PipeConnection, RpcClient};
use slobsctl_core::tracing::{TracingConfig, init_tracing};
use slobsctl_protocol::ProtocolResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    // Load configuration; flags override the file.
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config)?,
        None => ClientConfig::load().map_err(ClientError::Config)?,
    };
    let address = cli
        .address
        .unwrap_or_else(|| config.connection.address.clone());
    let timeout = Duration::from_secs(cli.timeout.unwrap_or(config.connection.timeout));

    // One connection for the whole run, used serially.
    let connection = PipeConnection::connect(&address, timeout)?;
    let mut control = Control::new(RpcClient::new(connection));

    let status = dispatch(&mut control, &cli.command)?;

    if let Err(e) = control.into_connection().close() {
        debug!(error = %e, "connection did not close cleanly");
    }

    if status.success {
        Ok(())
    } else {
        let message = status
            .message
            .unwrap_or_else(|| "command failed".to_string());
        Err(ClientError::Command(format!(
            "{} for {}",
            message,
            cli.command.name()
        )))
    }
}

fn dispatch(
    control: &mut Control<PipeConnection>,
    command: &Command,
) -> ProtocolResult<ControlStatus> {
    match command {
        Command::StartStreaming => control.start_streaming(),
        Command::StopStreaming => control.stop_streaming(),
        Command::StartRecording => control.start_recording(),
        Command::StopRecording => control.stop_recording(),
        Command::StartReplayBuffer => control.start_replay_buffer(),
        Command::StopReplayBuffer => control.stop_replay_buffer(),
        Command::SaveReplayBuffer => control.save_replay_buffer(),
        Command::SaveReplaySwitch { scene, offset } => {
            control.save_replay_and_switch(scene, *offset)
        }
        Command::ChangeScene { scene, delay } => control.change_to_scene(scene, *delay),
        Command::SwapScenes {
            target,
            delay,
            return_scene,
        } => control.swap_scenes(target, *delay, return_scene.as_deref()),
        Command::ItemVisibility {
            source,
            mode,
            delay,
            scene,
        } => control.set_item_visibility(source, *mode, *delay, scene.as_deref()),
        Command::FolderVisibility {
            folder,
            mode,
            delay,
            scene,
        } => control.set_folder_visibility(folder, *mode, *delay, scene.as_deref()),
    }
}
