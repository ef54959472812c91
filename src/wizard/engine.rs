//! Step sequencer: owns the state of one form-filling session.

use std::sync::Arc;

use serde::Serialize;

use crate::errors::{WizardError, WizardResult};
use crate::record::{ApplicationRecord, FieldValue, Section};
use crate::schema::{Schema, StepDefinition};
use crate::validation::{validate_all, validate_step, ErrorSet};
use crate::wizard::events::{Notifier, WizardObserver};
use crate::wizard::progress::{percent_complete, Progress};
use crate::wizard::submission::{
    SubmissionCoordinator, SubmissionState, SubmitOperation, SubmitOutcome,
};

/// Placeholder shown in review summaries for fields without a value.
pub const UNFILLED: &str = "[unfilled]";

/// Read-only snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardState {
    pub current_step: usize,
    pub record: ApplicationRecord,
    pub errors: ErrorSet,
    pub submission: SubmissionState,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Moved { from: usize, to: usize },
    /// Nothing to do (back on the first step).
    Stayed,
    /// The current step has missing required fields.
    Blocked(ErrorSet),
    /// The last step validated and the record was handed to the submitter.
    Submitted(SubmitOutcome),
}

impl StepOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, StepOutcome::Blocked(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub field: String,
    pub label: String,
    pub value: String,
    pub missing_required: bool,
}

/// Review data for one step, with the index to pass to
/// [`WizardEngine::jump_to`] for its "edit" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    pub step: usize,
    pub label: String,
    pub entries: Vec<SummaryEntry>,
}

/// Drives one user through the steps of a [`Schema`].
///
/// Field edits, validation and navigation are synchronous. Only the final
/// [`WizardEngine::go_next`] suspends, while the injected
/// [`SubmitOperation`] runs.
pub struct WizardEngine {
    schema: Arc<Schema>,
    current_step: usize,
    record: ApplicationRecord,
    errors: ErrorSet,
    submission: SubmissionCoordinator,
    notifier: Notifier,
}

impl WizardEngine {
    pub fn new(schema: Arc<Schema>, operation: Arc<dyn SubmitOperation>) -> Self {
        let notifier = Notifier::default();
        let record = ApplicationRecord::blank(&schema);
        Self {
            schema,
            current_step: 0,
            record,
            errors: ErrorSet::new(),
            submission: SubmissionCoordinator::with_notifier(operation, notifier.clone()),
            notifier,
        }
    }

    /// Starts from a previously saved draft instead of a blank record.
    pub fn with_record(mut self, record: ApplicationRecord) -> WizardResult<Self> {
        record.check_against(&self.schema)?;
        self.record = record;
        Ok(self)
    }

    pub fn subscribe(&self, observer: Arc<dyn WizardObserver>) {
        self.notifier.subscribe(observer);
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_definition(&self) -> &StepDefinition {
        &self.schema.steps()[self.current_step]
    }

    pub fn step_count(&self) -> usize {
        self.schema.step_count()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.schema.step_count()
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn section(&self, key: &str) -> WizardResult<&Section> {
        self.record.section(key)
    }

    /// Replaces one field value and drops any error shown for exactly that
    /// field. The rest of the section is not re-validated.
    pub fn set_field(
        &mut self,
        section: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> WizardResult<()> {
        self.record
            .set(&self.schema, section, field, value.into())?;
        self.errors.clear_field(section, field);
        Ok(())
    }

    /// Validates the current step; advances on success, submits on the last
    /// step, stays put and reports the [`ErrorSet`] otherwise.
    pub async fn go_next(&mut self) -> WizardResult<StepOutcome> {
        let errors = validate_step(&self.schema, self.current_step, &self.record)?;
        if !errors.is_empty() {
            tracing::debug!(
                step = self.current_step,
                missing = errors.len(),
                "step blocked by validation"
            );
            self.errors = errors.clone();
            self.notifier.validation_failed(&errors);
            return Ok(StepOutcome::Blocked(errors));
        }
        self.errors.clear();

        if self.is_last_step() {
            let outcome = self.submission.submit(self.record.clone()).await;
            return Ok(StepOutcome::Submitted(outcome));
        }
        Ok(self.move_to(self.current_step + 1))
    }

    /// Steps back without validating the step being left.
    pub fn go_prev(&mut self) -> StepOutcome {
        if self.current_step == 0 {
            return StepOutcome::Stayed;
        }
        self.move_to(self.current_step - 1)
    }

    /// Moves to any step without validating the step being left; used by
    /// review "edit" links.
    pub fn jump_to(&mut self, index: usize) -> WizardResult<StepOutcome> {
        let total = self.schema.step_count();
        if index >= total {
            return Err(WizardError::StepOutOfRange { index, total });
        }
        Ok(self.move_to(index))
    }

    pub fn percent_complete(&self) -> u8 {
        percent_complete(self.current_step, self.schema.step_count())
    }

    pub fn progress(&self) -> Progress {
        Progress::compute(&self.schema, self.current_step)
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    /// Handle to the submission state shared with this engine. It can observe
    /// and [`SubmissionCoordinator::reset`] but never start a submission.
    pub fn submission(&self) -> SubmissionCoordinator {
        self.submission.clone()
    }

    /// Every missing required field across all steps.
    pub fn outstanding_errors(&self) -> WizardResult<ErrorSet> {
        validate_all(&self.schema, &self.record)
    }

    pub fn summary(&self) -> Vec<SummarySection> {
        self.schema
            .steps()
            .iter()
            .filter_map(|step| {
                let key = step.section.as_deref()?;
                let section = self.schema.section(key).ok()?;
                let entries = section
                    .fields
                    .iter()
                    .map(|field| {
                        let value = self
                            .record
                            .get(key, &field.name)
                            .ok()
                            .filter(|value| value.is_present());
                        SummaryEntry {
                            field: field.name.clone(),
                            label: field.label.clone(),
                            value: value
                                .map(ToString::to_string)
                                .unwrap_or_else(|| UNFILLED.to_string()),
                            missing_required: field.required && value.is_none(),
                        }
                    })
                    .collect();
                Some(SummarySection {
                    step: step.index,
                    label: step.label.clone(),
                    entries,
                })
            })
            .collect()
    }

    /// Plain-text rendering of [`WizardEngine::summary`].
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["Review your entries:".to_string()];
        for section in self.summary() {
            lines.push(format!("{} (step {})", section.label, section.step + 1));
            for entry in section.entries {
                lines.push(format!("  {}: {}", entry.label, entry.value));
            }
        }
        lines
    }

    pub fn snapshot(&self) -> WizardState {
        WizardState {
            current_step: self.current_step,
            record: self.record.clone(),
            errors: self.errors.clone(),
            submission: self.submission.state(),
        }
    }

    fn move_to(&mut self, to: usize) -> StepOutcome {
        let from = self.current_step;
        self.current_step = to;
        self.errors.clear();
        tracing::debug!(from, to, "wizard step changed");
        self.notifier.step_changed(to);
        StepOutcome::Moved { from, to }
    }
}
