//! Posture detector
//!
//! Combines the lid flag and built-in display activity into one posture
//! value. Neither platform signal is reliable alone, so the detector pairs
//! a push subscription (display reconfiguration, when the platform has
//! one) with a poll backstop on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::ports::{PlatformProbe, ProbeError};
use crate::domain::Posture;

/// Detector timing knobs.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Poll interval for the backstop read of the combined signal.
    pub poll_interval: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Posture detector with a cached value and a change stream.
///
/// The change stream emits only on an actual change of value; duplicate
/// reads are suppressed. The cached value is mutated only through
/// `refresh`, which the monitoring task serializes.
pub struct PostureDetector<P: PlatformProbe> {
    probe: Arc<P>,
    state: watch::Sender<Posture>,
    config: DetectorConfig,
}

impl<P: PlatformProbe + 'static> PostureDetector<P> {
    /// Create a detector, taking the initial posture from the probe.
    ///
    /// A failing initial read defaults to open: absence of evidence is
    /// treated open-like.
    pub fn new(probe: Arc<P>, config: DetectorConfig) -> Self {
        let initial = read_posture(probe.as_ref()).unwrap_or(Posture::Open);
        let (state, _) = watch::channel(initial);
        Self {
            probe,
            state,
            config,
        }
    }

    /// Current cached posture.
    pub fn current(&self) -> Posture {
        *self.state.borrow()
    }

    /// Subscribe to posture changes.
    pub fn subscribe(&self) -> watch::Receiver<Posture> {
        self.state.subscribe()
    }

    /// Re-read the probe and publish the value if it changed.
    ///
    /// A failed read leaves the cached value untouched, keeping posture
    /// monotone against transient glitches.
    pub fn refresh(&self) {
        if let Ok(posture) = read_posture(self.probe.as_ref()) {
            self.state.send_if_modified(|current| {
                if *current != posture {
                    *current = posture;
                    true
                } else {
                    false
                }
            });
        }
    }

    /// Spawn the monitoring task: poll backstop plus the probe's push
    /// stream. All refreshes run on this task.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let detector = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(detector.config.poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut changes = detector.probe.changes();

            loop {
                tokio::select! {
                    _ = ticker.tick() => detector.refresh(),
                    event = recv_change(&mut changes) => match event {
                        Some(()) => detector.refresh(),
                        // Push stream closed; keep polling
                        None => changes = None,
                    },
                }
            }
        })
    }
}

/// Await the next push event, pending forever when there is no stream.
async fn recv_change(changes: &mut Option<broadcast::Receiver<()>>) -> Option<()> {
    match changes {
        Some(rx) => match rx.recv().await {
            Ok(()) => Some(()),
            // Missed notifications still mean "something changed"
            Err(broadcast::error::RecvError::Lagged(_)) => Some(()),
            Err(broadcast::error::RecvError::Closed) => None,
        },
        None => std::future::pending().await,
    }
}

fn read_posture<P: PlatformProbe + ?Sized>(probe: &P) -> Result<Posture, ProbeError> {
    let lid_closed = probe.lid_closed()?;
    let display_active = probe.builtin_display_active()?;
    Ok(Posture::from_signals(lid_closed, display_active))
}
