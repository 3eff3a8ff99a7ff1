//! Presentation sink port interface

use crate::application::applier::ApplyOutcome;
use crate::domain::{Posture, Selection};

/// Port for the presentation layer to observe completed evaluations.
///
/// Purely informational: implementations must not block the evaluation
/// path and have no way to push back on it.
pub trait PresentationSink: Send + Sync {
    /// Called after every completed re-evaluation.
    fn selection_applied(&self, selection: &Selection, posture: Posture, outcome: &ApplyOutcome);
}
