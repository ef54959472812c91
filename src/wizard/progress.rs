//! Completion metric derived from the current step.

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// `round(100 * (current + 1) / total)`.
///
/// Equals 100 exactly on the last step: earlier steps are capped at 99 so
/// wizards with more than 200 steps never round up early. A zero-step wizard
/// reports 0.
pub fn percent_complete(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let step = current.min(total - 1) as u64 + 1;
    let total = total as u64;
    // Integer round-half-up of 100 * step / total.
    let rounded = (200 * step + total) / (2 * total);
    if step < total {
        rounded.min(99) as u8
    } else {
        100
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// Step indicator data: every step label with its status relative to the
/// current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current_step: usize,
    pub total_steps: usize,
    pub percent: u8,
    pub steps: Vec<(String, StepStatus)>,
}

impl Progress {
    pub fn compute(schema: &Schema, current: usize) -> Self {
        let steps = schema
            .steps()
            .iter()
            .map(|step| {
                let status = if step.index < current {
                    StepStatus::Completed
                } else if step.index == current {
                    StepStatus::Current
                } else {
                    StepStatus::Upcoming
                };
                (step.label.clone(), status)
            })
            .collect();
        Self {
            current_step: current,
            total_steps: schema.step_count(),
            percent: percent_complete(current, schema.step_count()),
            steps,
        }
    }

    /// "Step X of N" label for headers.
    pub fn headline(&self) -> String {
        format!("Step {} of {}", self.current_step + 1, self.total_steps)
    }
}
