//! Outbound notifications for the presentation layer.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::validation::ErrorSet;
use crate::wizard::submission::SubmissionState;

/// Receives engine notifications. Every method defaults to a no-op so
/// observers only implement what they render.
pub trait WizardObserver: Send + Sync {
    /// The current step changed; scroll/focus resets belong here.
    fn on_step_changed(&self, _new_index: usize) {}

    fn on_validation_failed(&self, _errors: &ErrorSet) {}

    fn on_submission_state_changed(&self, _state: &SubmissionState) {}
}

/// Owned copy of a notification, as recorded by [`EventLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    StepChanged(usize),
    ValidationFailed(ErrorSet),
    SubmissionStateChanged(SubmissionState),
}

/// Observer that buffers notifications for callers that poll instead of
/// reacting to callbacks.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<WizardEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WizardEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns and clears the buffered notifications.
    pub fn drain(&self) -> Vec<WizardEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push(&self, event: WizardEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl WizardObserver for EventLog {
    fn on_step_changed(&self, new_index: usize) {
        self.push(WizardEvent::StepChanged(new_index));
    }

    fn on_validation_failed(&self, errors: &ErrorSet) {
        self.push(WizardEvent::ValidationFailed(errors.clone()));
    }

    fn on_submission_state_changed(&self, state: &SubmissionState) {
        self.push(WizardEvent::SubmissionStateChanged(state.clone()));
    }
}

/// Logs every notification through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl WizardObserver for TracingObserver {
    fn on_step_changed(&self, new_index: usize) {
        tracing::info!(step = new_index, "wizard step changed");
    }

    fn on_validation_failed(&self, errors: &ErrorSet) {
        tracing::info!(errors = %errors, "wizard step blocked by validation");
    }

    fn on_submission_state_changed(&self, state: &SubmissionState) {
        tracing::info!(state = %state, "submission state changed");
    }
}

/// Fan-out shared between the engine and its submission coordinator.
#[derive(Clone, Default)]
pub(crate) struct Notifier {
    observers: Arc<RwLock<Vec<Arc<dyn WizardObserver>>>>,
}

impl Notifier {
    pub(crate) fn subscribe(&self, observer: Arc<dyn WizardObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    fn each(&self, mut notify: impl FnMut(&dyn WizardObserver)) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            notify(observer.as_ref());
        }
    }

    pub(crate) fn step_changed(&self, new_index: usize) {
        self.each(|observer| observer.on_step_changed(new_index));
    }

    pub(crate) fn validation_failed(&self, errors: &ErrorSet) {
        self.each(|observer| observer.on_validation_failed(errors));
    }

    pub(crate) fn submission_state_changed(&self, state: &SubmissionState) {
        self.each(|observer| observer.on_submission_state_changed(state));
    }
}
