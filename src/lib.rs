#![doc(test(attr(deny(warnings))))]

//! Wizard Core drives users through an ordered sequence of data-collection
//! steps: per-step presence validation, back/jump navigation, progress
//! reporting and a single-flight terminal submission handed to an injected
//! [`wizard::SubmitOperation`].

pub mod config;
pub mod errors;
pub mod record;
pub mod schema;
pub mod submitters;
pub mod utils;
pub mod validation;
pub mod wizard;

pub use errors::WizardError;
pub use record::{ApplicationRecord, FieldValue, Section};
pub use schema::{FieldDescriptor, FieldKind, Schema, SectionSchema, StepDefinition};
pub use validation::{validate_all, validate_step, ErrorSet};
pub use wizard::{
    Confirmation, StepOutcome, SubmissionCoordinator, SubmissionState, SubmitError,
    SubmitOperation, SubmitOutcome, WizardEngine, WizardObserver, WizardState,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(utils::DEFAULT_LOG_FILTER);
}

/// Same as [`init`], using the configured log filter.
pub fn init_with_config(config: &config::Config) {
    init_with_filter(&config.log_filter);
}

fn init_with_filter(filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("Wizard Core tracing initialized.");
    });
}
