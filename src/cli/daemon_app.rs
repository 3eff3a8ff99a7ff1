//! Daemon app runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::ConfigStore;
use crate::application::{
    DetectorConfig, Orchestrator, OrchestratorConfig, PostureDetector,
};
use crate::infrastructure::{JsonConfigStore, PactlWriter, SysfsProbe, SystemInventory};

use super::args::RunOptions;
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals;
use super::sink::CliSink;
use super::socket::{DaemonSocketServer, SocketPath};
use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Run the switching daemon in the foreground
pub async fn run_daemon(options: RunOptions) -> ExitCode {
    let presenter = Presenter::new();

    // Acquire PID file
    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => {
                presenter.error(&e.to_string());
            }
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Prime the config cache before anything evaluates
    let store = Arc::new(JsonConfigStore::new());
    if let Err(e) = store.load().await {
        presenter.warn(&format!("Config unreadable, using defaults: {}", e));
    }

    // Adapters and core components
    let inventory = SystemInventory::new(Duration::from_secs(options.rescan_secs.max(1)));
    let watcher_task = inventory.spawn_watcher();

    let probe = Arc::new(SysfsProbe::new());
    let detector = Arc::new(PostureDetector::new(
        probe,
        DetectorConfig {
            poll_interval: Duration::from_secs(options.poll_secs.max(1)),
        },
    ));
    let detector_task = detector.spawn();

    let writer = Arc::new(PactlWriter::new());
    let sink = Arc::new(CliSink::new(options.notify));

    let orchestrator = Orchestrator::new(
        Arc::clone(&inventory),
        writer,
        Arc::clone(&store),
        Arc::clone(&detector),
        sink,
        OrchestratorConfig {
            debounce_window: Duration::from_millis(options.debounce_ms),
            startup_delay: Duration::from_secs(1),
        },
    );
    let (handle, orchestrator_task) = orchestrator.spawn();

    // Control socket
    let socket_path = SocketPath::new();
    let mut socket_server = DaemonSocketServer::new(socket_path.clone());
    if let Err(e) = socket_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        let _ = pid_file.release();
        return ExitCode::from(EXIT_ERROR);
    }
    let server_handle = handle.clone();
    let socket_task = tokio::spawn(async move {
        let _ = socket_server.run(server_handle).await;
    });

    presenter.info(&format!(
        "Watching posture and devices | PID: {} | Socket: {}",
        std::process::id(),
        socket_path.path().display()
    ));

    let exit = match signals::wait_for_shutdown().await {
        Ok(signal) => {
            presenter.info(&format!("Received {}, shutting down", signal));
            EXIT_SUCCESS
        }
        Err(e) => {
            presenter.error(&format!("Signal handler failed: {}", e));
            EXIT_ERROR
        }
    };

    // Socket server Drop cleans up the socket file
    socket_task.abort();
    orchestrator_task.abort();
    detector_task.abort();
    watcher_task.abort();
    let _ = pid_file.release();

    ExitCode::from(exit)
}
