//! Wizard engine: step sequencing, submission coordination, progress and
//! notifications.

pub mod engine;
pub mod events;
pub mod progress;
pub mod submission;

pub use engine::{StepOutcome, SummaryEntry, SummarySection, WizardEngine, WizardState, UNFILLED};
pub use events::{EventLog, TracingObserver, WizardEvent, WizardObserver};
pub use progress::{percent_complete, Progress, StepStatus};
pub use submission::{
    Confirmation, SubmissionCoordinator, SubmissionState, SubmitError, SubmitOperation,
    SubmitOutcome,
};
