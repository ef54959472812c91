//! Terminal submission: a single-flight call into an injected
//! [`SubmitOperation`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::record::ApplicationRecord;
use crate::wizard::events::Notifier;

pub(crate) const ABANDONED_REASON: &str = "submission abandoned before completion";

/// Lifecycle of the terminal submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed(_))
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => f.write_str("idle"),
            SubmissionState::InFlight => f.write_str("in flight"),
            SubmissionState::Succeeded => f.write_str("succeeded"),
            SubmissionState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Receipt returned by a successful [`SubmitOperation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

impl Confirmation {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            received_at: Utc::now(),
        }
    }

    /// Confirmation with a random reference, for backends that return none.
    pub fn generated() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

/// Rejection reported by a [`SubmitOperation`]. Its message becomes the
/// reason in [`SubmissionState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitError {
    message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Persists a finished record. Treated as atomic: it either succeeded or it
/// did not. Timeouts are the implementation's concern.
#[async_trait]
pub trait SubmitOperation: Send + Sync {
    async fn submit(&self, record: ApplicationRecord) -> Result<Confirmation, SubmitError>;
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded(Confirmation),
    Failed(String),
    /// Another submission is outstanding; nothing was sent.
    AlreadyInProgress,
    /// The record was already accepted; nothing was sent.
    AlreadySubmitted,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

/// Clonable handle guarding the submission state of one wizard session.
///
/// Outside the crate it is read-only apart from [`SubmissionCoordinator::reset`];
/// submissions start from [`crate::WizardEngine::go_next`] on the last step.
/// At most one call into the [`SubmitOperation`] is outstanding at any time;
/// a `submit` while one is in flight returns [`SubmitOutcome::AlreadyInProgress`].
#[derive(Clone)]
pub struct SubmissionCoordinator {
    operation: Arc<dyn SubmitOperation>,
    state: Arc<Mutex<SubmissionState>>,
    notifier: Notifier,
}

impl SubmissionCoordinator {
    pub(crate) fn with_notifier(operation: Arc<dyn SubmitOperation>, notifier: Notifier) -> Self {
        Self {
            operation,
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
            notifier,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    /// Sends `record` unless a submission is in flight or already succeeded.
    /// The record is captured by value, so later edits never reach this call.
    pub(crate) async fn submit(&self, record: ApplicationRecord) -> SubmitOutcome {
        {
            let mut state = self.lock();
            match &*state {
                SubmissionState::InFlight => {
                    tracing::warn!("submission already in progress; ignoring duplicate submit");
                    return SubmitOutcome::AlreadyInProgress;
                }
                SubmissionState::Succeeded => {
                    tracing::warn!("record already submitted; ignoring submit");
                    return SubmitOutcome::AlreadySubmitted;
                }
                SubmissionState::Idle | SubmissionState::Failed(_) => {
                    *state = SubmissionState::InFlight;
                }
            }
        }
        self.notifier
            .submission_state_changed(&SubmissionState::InFlight);
        tracing::info!("submitting application record");

        let guard = InFlightGuard { coordinator: self };
        let result = self.operation.submit(record).await;
        guard.defuse();

        let (next, outcome) = match result {
            Ok(confirmation) => {
                tracing::info!(reference = %confirmation.reference, "submission succeeded");
                (
                    SubmissionState::Succeeded,
                    SubmitOutcome::Succeeded(confirmation),
                )
            }
            Err(err) => {
                tracing::warn!(reason = %err, "submission failed");
                (
                    SubmissionState::Failed(err.to_string()),
                    SubmitOutcome::Failed(err.to_string()),
                )
            }
        };
        self.transition(next);
        outcome
    }

    /// Acknowledges a failure: `Failed -> Idle`. Returns whether the state changed.
    pub fn reset(&self) -> bool {
        let changed = {
            let mut state = self.lock();
            if matches!(*state, SubmissionState::Failed(_)) {
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        };
        if changed {
            self.notifier
                .submission_state_changed(&SubmissionState::Idle);
        }
        changed
    }

    fn transition(&self, next: SubmissionState) {
        *self.lock() = next.clone();
        self.notifier.submission_state_changed(&next);
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks the submission failed if the `submit` future is dropped mid-flight.
struct InFlightGuard<'a> {
    coordinator: &'a SubmissionCoordinator,
}

impl InFlightGuard<'_> {
    fn defuse(self) {
        std::mem::forget(self);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        tracing::warn!("{ABANDONED_REASON}");
        self.coordinator
            .transition(SubmissionState::Failed(ABANDONED_REASON.to_string()));
    }
}
