//! CLI, connection layer and guarded command engine
//!
//! This crate provides the `slobsctl` command-line interface: it connects to
//! the remote broadcast application's control channel, issues JSON-RPC calls
//! through [`rpc::RpcClient`], and drives the guarded commands in
//! [`control::Control`].

pub mod cli;
pub mod config;
pub mod connection;
pub mod control;
pub mod error;
pub mod notify;
pub mod rpc;

#[cfg(test)]
pub(crate) mod testing;

pub use cli::Cli;
pub use connection::{AsyncConnection, AsyncPipeConnection, ConnectError, Connection, PipeConnection};
pub use control::{Control, ControlStatus, ShowMode};
pub use error::{ClientError, ClientResult};
pub use rpc::{AsyncRpcClient, RpcClient};
