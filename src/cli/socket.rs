//! Unix Domain Socket communication for daemon control

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

use crate::application::OrchestratorHandle;
use crate::domain::DeviceCategory;

/// Socket path resolver
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Create socket path, preferring XDG_RUNTIME_DIR with a temp-dir
    /// fallback
    pub fn new() -> Self {
        let path = std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join("autodock.sock"))
            .unwrap_or_else(|_| std::env::temp_dir().join("autodock.sock"));
        Self { path }
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if socket file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove socket file if it exists
    pub fn cleanup(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed control request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtlRequest {
    Status,
    Override {
        category: DeviceCategory,
        name: String,
    },
    Clear {
        category: DeviceCategory,
    },
}

/// Parse one line of the control protocol.
///
/// Device names may contain spaces, so `override` takes the rest of the
/// line after the category.
pub fn parse_request(line: &str) -> Result<CtlRequest, String> {
    let line = line.trim();
    let mut parts = line.splitn(3, ' ');

    match parts.next() {
        Some("status") => Ok(CtlRequest::Status),
        Some("override") => {
            let category: DeviceCategory = parts
                .next()
                .ok_or_else(|| "missing category".to_string())?
                .parse()
                .map_err(|e: crate::domain::InvalidCategoryError| e.to_string())?;
            let name = parts.next().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err("missing device name".to_string());
            }
            Ok(CtlRequest::Override {
                category,
                name: name.to_string(),
            })
        }
        Some("clear") => {
            let category: DeviceCategory = parts
                .next()
                .ok_or_else(|| "missing category".to_string())?
                .parse()
                .map_err(|e: crate::domain::InvalidCategoryError| e.to_string())?;
            Ok(CtlRequest::Clear { category })
        }
        _ => Err("unknown command".to_string()),
    }
}

/// Daemon socket server - listens for control requests and forwards them
/// to the orchestrator handle
pub struct DaemonSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl DaemonSocketServer {
    /// Create a new socket server
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }

    /// Bind to the socket
    pub fn bind(&mut self) -> io::Result<()> {
        // Remove stale socket file if it exists
        self.socket_path.cleanup()?;

        let listener = UnixListener::bind(self.socket_path.path())?;
        self.listener = Some(listener);
        Ok(())
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        self.socket_path.path()
    }

    /// Accept and handle connections, one request per connection.
    pub async fn run(&self, handle: OrchestratorHandle) -> io::Result<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Socket not bound"))?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let handle = handle.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, handle).await {
                            eprintln!("Socket connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    eprintln!("Socket accept error: {}", e);
                }
            }
        }
    }

    /// Cleanup socket file
    pub fn cleanup(&self) {
        let _ = self.socket_path.cleanup();
    }
}

impl Drop for DaemonSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Handle a single client connection
async fn handle_connection(stream: UnixStream, handle: OrchestratorHandle) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;

    let response = match parse_request(&line) {
        Ok(CtlRequest::Status) => match handle.last_evaluation() {
            Some((selection, posture)) => format!("{} | {}\n", posture, selection.summary()),
            None => "starting\n".to_string(),
        },
        Ok(CtlRequest::Override { category, name }) => {
            if handle.set_override(category, Some(name)).await {
                "ok\n".to_string()
            } else {
                "error: daemon is shutting down\n".to_string()
            }
        }
        Ok(CtlRequest::Clear { category }) => {
            if handle.set_override(category, None).await {
                "ok\n".to_string()
            } else {
                "error: daemon is shutting down\n".to_string()
            }
        }
        Err(message) => format!("error: {}\n", message),
    };

    writer.write_all(response.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

/// Daemon socket client - connects and sends commands
pub struct DaemonSocketClient {
    socket_path: SocketPath,
}

impl DaemonSocketClient {
    /// Create a new socket client
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }

    /// Check if daemon appears to be running (socket exists)
    pub fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    /// Send a command and receive response
    pub async fn send_command(&self, cmd: &str) -> io::Result<String> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        let (reader, mut writer) = stream.into_split();

        writer.write_all(format!("{}\n", cmd).as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut response = String::new();
        reader.read_line(&mut response).await?;

        Ok(response)
    }
}
