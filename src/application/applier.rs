//! Default-device applier

use std::sync::Arc;

use super::ports::{ApplyError, DefaultDeviceWriter, DeviceInventory};
use crate::domain::Selection;

/// What one apply pass actually did.
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// The default input was rewritten this pass
    pub input_switched: bool,
    /// The default output was rewritten this pass
    pub output_switched: bool,
    /// Non-fatal write failures, retried implicitly on the next evaluation
    pub errors: Vec<ApplyError>,
}

impl ApplyOutcome {
    pub fn switched_anything(&self) -> bool {
        self.input_switched || self.output_switched
    }
}

/// Writes selected devices to the OS default slots, skipping the write
/// when the slot already holds the chosen device. Redundant writes can
/// audibly click or glitch hardware, so the comparison is what makes the
/// operation idempotent.
///
/// Camera selection is informational only; no OS write occurs for it.
pub struct Applier<I, W>
where
    I: DeviceInventory,
    W: DefaultDeviceWriter,
{
    inventory: Arc<I>,
    writer: Arc<W>,
}

impl<I, W> Applier<I, W>
where
    I: DeviceInventory,
    W: DefaultDeviceWriter,
{
    pub fn new(inventory: Arc<I>, writer: Arc<W>) -> Self {
        Self { inventory, writer }
    }

    /// Push the selection into the OS default slots.
    ///
    /// Write failures are collected, never propagated: the selection
    /// itself is still correct and the mismatch persists, so the next
    /// evaluation retries opportunistically.
    pub async fn apply(&self, selection: &Selection) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        if let Some(mic) = &selection.mic {
            if self.inventory.default_input().await != Some(mic.id) {
                match self.writer.set_default_input(mic).await {
                    Ok(()) => outcome.input_switched = true,
                    Err(e) => outcome.errors.push(e),
                }
            }
        }

        if let Some(output) = &selection.output {
            if self.inventory.default_output().await != Some(output.id) {
                match self.writer.set_default_output(output).await {
                    Ok(()) => outcome.output_switched = true,
                    Err(e) => outcome.errors.push(e),
                }
            }
        }

        outcome
    }
}
