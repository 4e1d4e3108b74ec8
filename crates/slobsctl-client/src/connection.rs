//! Connection layer for the remote's control channel.
//!
//! The remote exposes its control channel as a duplex byte stream named
//! `slobs`: a named pipe on Windows, a local socket on Unix-like systems.
//! Requests and replies travel as one UTF-8 JSON object per line.
//!
//! The [`Connection`] trait is the narrow seam the RPC client depends on:
//! send one line, receive one line. [`AsyncConnection`] is the suspending
//! variant. The connection is a single exclusively-owned resource: opened
//! once, used serially, closed on exit. A dropped channel is fatal for the
//! run; there is no reconnect.

use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use tracing::debug;

/// Name of the remote's control channel endpoint.
pub const PIPE_NAME: &str = "slobs";

/// Conventional socket path on Unix-like systems.
#[cfg(unix)]
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/slobs";

/// A connected duplex channel carrying one request line and one reply line
/// per exchange, in strict alternation.
pub trait Connection {
    /// Sends one request line and blocks until the single reply line arrives.
    ///
    /// The request must not contain a newline; the returned reply may still
    /// carry its line terminator.
    fn send_and_receive_line(&mut self, line: &str) -> io::Result<String>;
}

/// Suspending variant of [`Connection`].
pub trait AsyncConnection {
    /// Sends one request line and resolves once the single reply line arrives.
    fn send_and_receive_line(
        &mut self,
        line: &str,
    ) -> impl std::future::Future<Output = io::Result<String>> + Send;
}

/// Reasons establishing the connection can fail, surfaced distinctly so the
/// operator knows what to fix.
#[derive(Debug)]
pub enum ConnectError {
    /// The endpoint exists but refused us.
    Unauthorized,
    /// The endpoint did not answer within the timeout.
    Timeout(Duration),
    /// The address does not name a reachable endpoint.
    InvalidAddress {
        address: String,
        source: io::Error,
    },
    /// Anything else.
    Other(io::Error),
}

impl ConnectError {
    fn from_io(address: &str, err: io::Error, timeout: Duration) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::Unauthorized,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout(timeout),
            io::ErrorKind::NotFound
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::AddrNotAvailable => Self::InvalidAddress {
                address: address.to_string(),
                source: err,
            },
            _ => Self::Other(err),
        }
    }
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(
                f,
                "unauthorized access: if the remote application is running elevated, \
                 run this tool elevated as well"
            ),
            Self::Timeout(timeout) => write!(
                f,
                "connection timed out after {}s: make sure the remote application is \
                 running and the address is correct",
                timeout.as_secs()
            ),
            Self::InvalidAddress { address, source } => {
                write!(f, "invalid address '{}': {}", address, source)
            }
            Self::Other(err) => write!(f, "connection failed: {}", err),
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAddress { source, .. } => Some(source),
            Self::Other(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(unix)]
type PipeStream = std::os::unix::net::UnixStream;
#[cfg(windows)]
type PipeStream = std::fs::File;

/// Blocking connection to the remote's control channel.
///
/// The address is interpreted per platform: on Windows it is the host of the
/// named pipe (`\\<host>\pipe\slobs`, with loopback addresses mapped to the
/// local `.`); on Unix an absolute address is taken as the socket path and
/// anything else falls back to [`DEFAULT_SOCKET_PATH`].
pub struct PipeConnection {
    reader: BufReader<PipeStream>,
    writer: PipeStream,
}

impl PipeConnection {
    /// Connects to the remote at `address`.
    ///
    /// The timeout also arms the per-exchange read/write deadlines where the
    /// platform supports them, so a hung remote surfaces as a transport
    /// failure instead of blocking forever.
    pub fn connect(address: &str, timeout: Duration) -> Result<Self, ConnectError> {
        let stream = open_stream(address, timeout)?;
        let writer = stream.try_clone().map_err(ConnectError::Other)?;
        debug!(address, "connected to remote control channel");
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Closes the channel.
    pub fn close(self) -> io::Result<()> {
        #[cfg(unix)]
        self.writer.shutdown(std::net::Shutdown::Both)?;
        Ok(())
    }
}

impl Connection for PipeConnection {
    fn send_and_receive_line(&mut self, line: &str) -> io::Result<String> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "channel closed by remote",
            ));
        }
        Ok(reply)
    }
}

#[cfg(unix)]
fn open_stream(address: &str, timeout: Duration) -> Result<PipeStream, ConnectError> {
    let path = socket_path(address);
    let stream = std::os::unix::net::UnixStream::connect(&path)
        .map_err(|e| ConnectError::from_io(address, e, timeout))?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(ConnectError::Other)?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(ConnectError::Other)?;
    Ok(stream)
}

#[cfg(unix)]
fn socket_path(address: &str) -> std::path::PathBuf {
    if address.starts_with('/') {
        std::path::PathBuf::from(address)
    } else {
        std::path::PathBuf::from(DEFAULT_SOCKET_PATH)
    }
}

#[cfg(windows)]
fn open_stream(address: &str, timeout: Duration) -> Result<PipeStream, ConnectError> {
    // Named pipes opened through the filesystem API either connect or fail
    // immediately; there is no deadline to arm on the handle.
    let path = pipe_path(address);
    std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|e| ConnectError::from_io(address, e, timeout))
}

#[cfg(windows)]
fn pipe_path(address: &str) -> String {
    let host = match address {
        "127.0.0.1" | "localhost" | "::1" => ".",
        other => other,
    };
    format!(r"\\{host}\pipe\{PIPE_NAME}")
}

#[cfg(unix)]
type AsyncPipeStream = tokio::net::UnixStream;
#[cfg(windows)]
type AsyncPipeStream = tokio::net::windows::named_pipe::NamedPipeClient;

/// Suspending connection to the remote's control channel.
///
/// Same addressing rules as [`PipeConnection`]. Per-exchange deadlines are
/// not armed here; callers that need one wrap the exchange in a timer.
pub struct AsyncPipeConnection {
    reader: tokio::io::BufReader<ReadHalf<AsyncPipeStream>>,
    writer: WriteHalf<AsyncPipeStream>,
}

impl AsyncPipeConnection {
    /// Connects to the remote at `address`.
    pub async fn connect(address: &str, timeout: Duration) -> Result<Self, ConnectError> {
        let stream = open_stream_async(address, timeout).await?;
        let (read, write) = tokio::io::split(stream);
        debug!(address, "connected to remote control channel");
        Ok(Self {
            reader: tokio::io::BufReader::new(read),
            writer: write,
        })
    }

    /// Closes the channel.
    pub async fn close(mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}

impl AsyncConnection for AsyncPipeConnection {
    async fn send_and_receive_line(&mut self, line: &str) -> io::Result<String> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply).await? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "channel closed by remote",
            ));
        }
        Ok(reply)
    }
}

#[cfg(unix)]
async fn open_stream_async(address: &str, timeout: Duration) -> Result<AsyncPipeStream, ConnectError> {
    let path = socket_path(address);
    match tokio::time::timeout(timeout, tokio::net::UnixStream::connect(&path)).await {
        Err(_) => Err(ConnectError::Timeout(timeout)),
        Ok(Err(e)) => Err(ConnectError::from_io(address, e, timeout)),
        Ok(Ok(stream)) => Ok(stream),
    }
}

#[cfg(windows)]
async fn open_stream_async(address: &str, timeout: Duration) -> Result<AsyncPipeStream, ConnectError> {
    let path = pipe_path(address);
    tokio::net::windows::named_pipe::ClientOptions::new()
        .open(&path)
        .map_err(|e| ConnectError::from_io(address, e, timeout))
}
