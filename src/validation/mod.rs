//! Presence validation for wizard steps.
//!
//! Validation is a pure function of the schema and a record snapshot. Only
//! presence is checked: blank text, empty lists/objects and unset values fail
//! a required field. Formats (email shape, numeric ranges) are not checked.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::WizardResult;
use crate::record::ApplicationRecord;
use crate::schema::{Schema, REQUIRED_MESSAGE};

/// Field path (`"section.field"`) → message. Empty means valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet {
    entries: BTreeMap<String, String>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(section: &str, field: &str) -> String {
        format!("{section}.{field}")
    }

    pub fn insert(&mut self, section: &str, field: &str, message: impl Into<String>) {
        self.entries
            .insert(Self::path(section, field), message.into());
    }

    /// Removes the entry for exactly `section.field`, returning whether one existed.
    pub fn clear_field(&mut self, section: &str, field: &str) -> bool {
        self.entries.remove(&Self::path(section, field)).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, section: &str, field: &str) -> bool {
        self.entries.contains_key(&Self::path(section, field))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, message)| (path.as_str(), message.as_str()))
    }

    pub fn extend(&mut self, other: ErrorSet) {
        self.entries.extend(other.entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(path, message)| format!("{path}: {message}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(path, message)| (path.into(), message.into()))
                .collect(),
        }
    }
}

/// Validates the section bound to step `step_index`, reporting every missing
/// required field. Steps without a section always validate.
pub fn validate_step(
    schema: &Schema,
    step_index: usize,
    record: &ApplicationRecord,
) -> WizardResult<ErrorSet> {
    let mut errors = ErrorSet::new();
    let Some(section) = schema.step_section(step_index)? else {
        return Ok(errors);
    };

    for field in section.fields.iter().filter(|field| field.required) {
        let present = record
            .get(&section.key, &field.name)
            .map(|value| value.is_present())
            .unwrap_or(false);
        if !present {
            errors.insert(&section.key, &field.name, REQUIRED_MESSAGE);
        }
    }
    Ok(errors)
}

/// Union of every step's [`ErrorSet`], used by review pages.
pub fn validate_all(schema: &Schema, record: &ApplicationRecord) -> WizardResult<ErrorSet> {
    let mut errors = ErrorSet::new();
    for step in schema.steps() {
        errors.extend(validate_step(schema, step.index, record)?);
    }
    Ok(errors)
}
