//! Platform posture probe port interface

use thiserror::Error;
use tokio::sync::broadcast;

/// Errors from reading the platform posture signals
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("Failed to read lid state: {0}")]
    LidReadFailed(String),

    #[error("Failed to read display state: {0}")]
    DisplayReadFailed(String),
}

/// Port for the two raw posture signals.
///
/// Reads are fast synchronous queries. `changes` is the optional push
/// stream for display reconfiguration; platforms without one rely on the
/// detector's poll backstop.
pub trait PlatformProbe: Send + Sync {
    /// Lid flag from the power-management subsystem.
    fn lid_closed(&self) -> Result<bool, ProbeError>;

    /// Whether the built-in display is online. Machines without a built-in
    /// display report `true`.
    fn builtin_display_active(&self) -> Result<bool, ProbeError>;

    /// Push notifications for display reconfiguration, when available.
    fn changes(&self) -> Option<broadcast::Receiver<()>> {
        None
    }
}
