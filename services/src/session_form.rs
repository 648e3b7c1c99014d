//! Live feedback for the session editor.
//!
//! [`ConflictWatcher`] re-checks the draft's windows shortly after the user
//! stops editing and publishes the result on a watch channel.
//! [`SubmitTracker`] drives the submit button through
//! `Idle -> Submitting -> {Success | Error | Conflict} -> Idle`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use db::models::session;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use util::debounce::Debouncer;

use crate::session::SessionError;
use crate::session_conflict::{check_conflicts, ConflictOutcome, SessionSource};
use crate::session_window::SessionWindows;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConflictFeedback {
    /// Nothing checked yet, or the last check could not complete.
    #[default]
    Unknown,
    Clear,
    Conflict(Vec<String>),
    /// The windows are invalid; no conflict check was run.
    Invalid(Vec<String>),
}

pub struct ConflictWatcher {
    source: Arc<dyn SessionSource>,
    event_id: i64,
    exclude_id: Option<i64>,
    debouncer: Debouncer,
    feedback: Arc<watch::Sender<ConflictFeedback>>,
}

impl ConflictWatcher {
    pub fn new(
        source: Arc<dyn SessionSource>,
        event_id: i64,
        exclude_id: Option<i64>,
        delay: Duration,
    ) -> Self {
        let (tx, _) = watch::channel(ConflictFeedback::Unknown);
        Self {
            source,
            event_id,
            exclude_id,
            debouncer: Debouncer::new(delay),
            feedback: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConflictFeedback> {
        self.feedback.subscribe()
    }

    pub fn current(&self) -> ConflictFeedback {
        self.feedback.borrow().clone()
    }

    /// Called on every edit of the draft's windows.
    pub fn windows_changed(&self, windows: SessionWindows) {
        let issues = windows.issues();
        if !issues.is_empty() {
            self.debouncer.cancel();
            self.feedback
                .send_replace(ConflictFeedback::Invalid(issues.iter().map(ToString::to_string).collect()));
            return;
        }

        let source = Arc::clone(&self.source);
        let feedback = Arc::clone(&self.feedback);
        let event_id = self.event_id;
        let exclude_id = self.exclude_id;

        self.debouncer.schedule(async move {
            let next = match check_conflicts(source.as_ref(), event_id, &windows, exclude_id).await {
                Ok(ConflictOutcome::Clear) => ConflictFeedback::Clear,
                Ok(ConflictOutcome::Conflict(names)) => ConflictFeedback::Conflict(names),
                Err(err) => {
                    tracing::debug!(%err, "conflict check rejected draft windows");
                    ConflictFeedback::Unknown
                }
            };
            feedback.send_replace(next);
        });
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
    Conflict(Vec<String>),
}

impl SubmitState {
    fn label(&self) -> &'static str {
        match self {
            SubmitState::Idle => "idle",
            SubmitState::Submitting => "submitting",
            SubmitState::Success => "success",
            SubmitState::Error(_) => "error",
            SubmitState::Conflict(_) => "conflict",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move submit state from {from} to {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}

/// How long each outcome stays visible before returning to idle.
#[derive(Debug, Clone, Copy)]
pub struct ResetDelays {
    pub success: Duration,
    pub error: Duration,
    pub conflict: Duration,
}

impl Default for ResetDelays {
    fn default() -> Self {
        Self {
            success: Duration::from_millis(1500),
            error: Duration::from_secs(3),
            conflict: Duration::from_secs(3),
        }
    }
}

pub struct SubmitTracker {
    state: Arc<watch::Sender<SubmitState>>,
    delays: ResetDelays,
    reset: Mutex<Option<JoinHandle<()>>>,
}

impl Default for SubmitTracker {
    fn default() -> Self {
        Self::new(ResetDelays::default())
    }
}

impl SubmitTracker {
    pub fn new(delays: ResetDelays) -> Self {
        let (tx, _) = watch::channel(SubmitState::Idle);
        Self {
            state: Arc::new(tx),
            delays,
            reset: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    /// Starts a submission. Allowed from idle or from a displayed outcome.
    pub fn begin(&self) -> Result<(), InvalidTransition> {
        let current = self.state();
        if current == SubmitState::Submitting {
            return Err(InvalidTransition {
                from: current.label(),
                to: "submitting",
            });
        }
        self.abort_reset();
        self.state.send_replace(SubmitState::Submitting);
        Ok(())
    }

    /// Records the outcome of the in-progress submission and arms the reset timer.
    pub fn finish(&self, outcome: SubmitState) -> Result<(), InvalidTransition> {
        let current = self.state();
        let delay = match &outcome {
            SubmitState::Success => self.delays.success,
            SubmitState::Error(_) => self.delays.error,
            SubmitState::Conflict(_) => self.delays.conflict,
            SubmitState::Idle | SubmitState::Submitting => {
                return Err(InvalidTransition {
                    from: current.label(),
                    to: outcome.label(),
                });
            }
        };
        if current != SubmitState::Submitting {
            return Err(InvalidTransition {
                from: current.label(),
                to: outcome.label(),
            });
        }

        self.state.send_replace(outcome.clone());

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_if_modified(|s| {
                if *s == outcome {
                    *s = SubmitState::Idle;
                    true
                } else {
                    false
                }
            });
        });
        *self.lock_reset() = Some(handle);
        Ok(())
    }

    /// Maps a create/update result onto the matching outcome.
    pub fn finish_with(&self, result: &Result<session::Model, SessionError>) -> Result<(), InvalidTransition> {
        let outcome = match result {
            Ok(_) => SubmitState::Success,
            Err(SessionError::Conflict(names)) => SubmitState::Conflict(names.clone()),
            Err(err) => SubmitState::Error(err.to_string()),
        };
        self.finish(outcome)
    }

    fn abort_reset(&self) {
        if let Some(handle) = self.lock_reset().take() {
            handle.abort();
        }
    }

    fn lock_reset(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.reset
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for SubmitTracker {
    fn drop(&mut self) {
        self.abort_reset();
    }
}
