//! Field store for the record under construction.
//!
//! The set of sections and fields is fixed by the [`Schema`] the record was
//! created from; only values change afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{WizardError, WizardResult};
use crate::schema::{FieldKind, Schema};

/// A single field value. Serialized untagged so a record reads as plain JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Initial value for a freshly created field of `kind`.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::List => FieldValue::List(Vec::new()),
            FieldKind::Object => FieldValue::Object(BTreeMap::new()),
            FieldKind::Number | FieldKind::Boolean => FieldValue::Null,
        }
    }

    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(_) => Some(FieldKind::Boolean),
            FieldValue::Number(_) => Some(FieldKind::Number),
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::List(_) => Some(FieldKind::List),
            FieldValue::Object(_) => Some(FieldKind::Object),
        }
    }

    /// `Null` clears a field of any kind.
    pub fn fits(&self, kind: FieldKind) -> bool {
        self.kind().map_or(true, |own| own == kind)
    }

    /// Presence rule used by required-field validation.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(_) | FieldValue::Number(_) => true,
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Object(map) => !map.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(true) => f.write_str("Yes"),
            FieldValue::Bool(false) => f.write_str("No"),
            FieldValue::Number(value) if value.fract().abs() < f64::EPSILON => {
                write!(f, "{:.0}", value)
            }
            FieldValue::Number(value) => write!(f, "{:.2}", value),
            FieldValue::Text(text) => f.write_str(text.trim()),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
            FieldValue::Object(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect();
                f.write_str(&parts.join("; "))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(value: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Object(value)
    }
}

/// Field name → value mapping for one section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section {
    fields: BTreeMap<String, FieldValue>,
}

impl Section {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The record being built: one [`Section`] per schema section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord {
    sections: BTreeMap<String, Section>,
}

impl ApplicationRecord {
    /// Record with every declared field set to its kind default.
    pub fn blank(schema: &Schema) -> Self {
        let sections = schema
            .sections()
            .iter()
            .map(|section| {
                let fields = section
                    .fields
                    .iter()
                    .map(|field| (field.name.clone(), FieldValue::default_for(field.kind)))
                    .collect();
                (section.key.clone(), Section { fields })
            })
            .collect();
        Self { sections }
    }

    /// Restores a saved draft. Missing fields keep their defaults; unknown
    /// sections or fields are rejected.
    pub fn from_json(schema: &Schema, data: &str) -> WizardResult<Self> {
        let raw: BTreeMap<String, BTreeMap<String, FieldValue>> = serde_json::from_str(data)?;
        let mut record = Self::blank(schema);
        for (section, fields) in raw {
            for (field, value) in fields {
                record.set(schema, &section, &field, value)?;
            }
        }
        Ok(record)
    }

    pub fn to_json_pretty(&self) -> WizardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn section(&self, key: &str) -> WizardResult<&Section> {
        self.sections
            .get(key)
            .ok_or_else(|| WizardError::UnknownSection(key.to_string()))
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Section)> {
        self.sections.iter()
    }

    pub fn get(&self, section: &str, field: &str) -> WizardResult<&FieldValue> {
        self.section(section)?
            .get(field)
            .ok_or_else(|| WizardError::UnknownField {
                section: section.to_string(),
                field: field.to_string(),
            })
    }

    /// Replaces a field value and returns the previous one.
    pub fn set(
        &mut self,
        schema: &Schema,
        section: &str,
        field: &str,
        value: FieldValue,
    ) -> WizardResult<FieldValue> {
        let descriptor = schema.field(section, field)?;
        if !value.fits(descriptor.kind) {
            return Err(WizardError::FieldKindMismatch {
                section: section.to_string(),
                field: field.to_string(),
                expected: descriptor.kind,
            });
        }
        let slot = self
            .sections
            .get_mut(section)
            .and_then(|fields| fields.fields.get_mut(field))
            .ok_or_else(|| WizardError::UnknownField {
                section: section.to_string(),
                field: field.to_string(),
            })?;
        Ok(std::mem::replace(slot, value))
    }

    /// Ensures the record has exactly the sections and fields `schema`
    /// declares, with values of the declared kinds.
    pub fn check_against(&self, schema: &Schema) -> WizardResult<()> {
        for key in self.sections.keys() {
            schema.section(key)?;
        }
        for section in schema.sections() {
            let stored = self.section(&section.key)?;
            for name in stored.fields.keys() {
                schema.field(&section.key, name)?;
            }
            for field in &section.fields {
                let value = self.get(&section.key, &field.name)?;
                if !value.fits(field.kind) {
                    return Err(WizardError::FieldKindMismatch {
                        section: section.key.clone(),
                        field: field.name.clone(),
                        expected: field.kind,
                    });
                }
            }
        }
        Ok(())
    }
}
