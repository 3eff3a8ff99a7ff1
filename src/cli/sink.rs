//! Presentation sink for the CLI daemon

use std::sync::{Arc, Mutex};

use crate::application::applier::ApplyOutcome;
use crate::application::ports::{NotificationIcon, Notifier, PresentationSink};
use crate::domain::{Posture, Selection};
use crate::infrastructure::NotifySendNotifier;

use super::presenter::Presenter;

/// Prints every interesting evaluation and optionally mirrors switches to
/// desktop notifications.
///
/// Quiet evaluations (same posture, nothing rewritten, no errors) produce
/// no output; the daemon would otherwise narrate every debounce tick.
pub struct CliSink {
    presenter: Presenter,
    notifier: Option<Arc<NotifySendNotifier>>,
    last_posture: Mutex<Option<Posture>>,
}

impl CliSink {
    pub fn new(notify: bool) -> Self {
        Self {
            presenter: Presenter::new(),
            notifier: notify.then(|| Arc::new(NotifySendNotifier::new())),
            last_posture: Mutex::new(None),
        }
    }
}

impl PresentationSink for CliSink {
    fn selection_applied(&self, selection: &Selection, posture: Posture, outcome: &ApplyOutcome) {
        let posture_changed = {
            let mut last = self.last_posture.lock().unwrap_or_else(|e| e.into_inner());
            let changed = *last != Some(posture);
            *last = Some(posture);
            changed
        };
        let interesting = posture_changed || outcome.switched_anything();

        if interesting {
            self.presenter.selection(posture, selection);
        }
        if outcome.input_switched {
            if let Some(mic) = &selection.mic {
                self.presenter.switched("mic", &mic.name);
            }
        }
        if outcome.output_switched {
            if let Some(output) = &selection.output {
                self.presenter.switched("output", &output.name);
            }
        }
        for error in &outcome.errors {
            self.presenter.warn(&error.to_string());
        }

        if interesting {
            if let Some(notifier) = &self.notifier {
                let notifier = Arc::clone(notifier);
                let title = selection.reason.clone();
                let body = selection.summary();
                tokio::spawn(async move {
                    let _ = notifier.notify(&title, &body, NotificationIcon::Info).await;
                });
            }
        }
    }
}
