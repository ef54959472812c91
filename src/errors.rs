use thiserror::Error;

use crate::schema::FieldKind;

/// Failures caused by a caller or schema mismatch.
///
/// User-recoverable conditions (missing required fields, a rejected
/// submission) never surface through this type; they are returned as data
/// ([`crate::ErrorSet`], [`crate::SubmissionState::Failed`]).
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),
    #[error("Unknown field `{field}` in section `{section}`")]
    UnknownField { section: String, field: String },
    #[error("Field `{section}.{field}` expects a {expected} value")]
    FieldKindMismatch {
        section: String,
        field: String,
        expected: FieldKind,
    },
    #[error("Step {index} is out of range (wizard has {total} steps)")]
    StepOutOfRange { index: usize, total: usize },
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type WizardResult<T> = Result<T, WizardError>;
