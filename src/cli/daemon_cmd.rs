//! Control command handler - sends requests to the running daemon via IPC

use crate::domain::DeviceCategory;

use super::presenter::Presenter;
use super::socket::{DaemonSocketClient, SocketPath};

/// Control actions a separate CLI invocation can send to the daemon
#[derive(Debug, Clone)]
pub enum CtlAction {
    Status,
    Override {
        category: DeviceCategory,
        name: String,
    },
    Clear {
        category: DeviceCategory,
    },
}

/// Handle a control subcommand
pub async fn handle_ctl_command(action: CtlAction, presenter: &Presenter) -> Result<(), String> {
    let client = DaemonSocketClient::new(SocketPath::new());

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: autodock run".to_string());
    }

    let cmd = match &action {
        CtlAction::Status => "status".to_string(),
        CtlAction::Override { category, name } => format!("override {} {}", category, name),
        CtlAction::Clear { category } => format!("clear {}", category),
    };

    let response = client
        .send_command(&cmd)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    let response = response.trim();
    if let Some(stripped) = response.strip_prefix("error:") {
        return Err(stripped.trim().to_string());
    }

    match action {
        CtlAction::Status => {
            presenter.info(&format!("Daemon: {}", response));
        }
        CtlAction::Override { category, name } => {
            presenter.success(&format!("{} pinned to \"{}\"", category, name));
        }
        CtlAction::Clear { category } => {
            presenter.success(&format!("{} override cleared", category));
        }
    }

    Ok(())
}
