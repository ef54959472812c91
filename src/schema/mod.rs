//! Static description of a wizard: its sections, their fields and the ordered
//! steps that collect them.
//!
//! A [`Schema`] is immutable once built. Every constructor (builder, JSON,
//! [`Schema::new`]) runs the same structural checks, so an engine never has
//! to second-guess the shape it was given.

pub mod funding;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{WizardError, WizardResult};

/// Default message stored in an [`crate::ErrorSet`] for a missing field.
pub const REQUIRED_MESSAGE: &str = "required";

/// Supported value shapes for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    List,
    Object,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::List => "list",
            FieldKind::Object => "object",
        };
        f.write_str(label)
    }
}

/// Declarative description of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            help: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn list(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::List)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Named partition of the record, collected by one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSchema {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl SectionSchema {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_required_fields(&self) -> bool {
        self.fields.iter().any(|field| field.required)
    }
}

/// One stage of the wizard. A step without a section (e.g. a review page)
/// carries no validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub index: usize,
    pub label: String,
    #[serde(default)]
    pub section: Option<String>,
}

/// Serialized shape of a schema, validated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaDef {
    name: String,
    sections: Vec<SectionSchema>,
    steps: Vec<StepDefinition>,
}

/// Ordered, immutable wizard definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct Schema {
    name: String,
    sections: Vec<SectionSchema>,
    steps: Vec<StepDefinition>,
}

impl Schema {
    pub fn new(
        name: impl Into<String>,
        sections: Vec<SectionSchema>,
        steps: Vec<StepDefinition>,
    ) -> WizardResult<Self> {
        let schema = Self {
            name: name.into(),
            sections,
            steps,
        };
        schema.check()?;
        Ok(schema)
    }

    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            sections: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn from_json_str(data: &str) -> WizardResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: &Path) -> WizardResult<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_pretty(&self) -> WizardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sections(&self) -> &[SectionSchema] {
        &self.sections
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> WizardResult<&StepDefinition> {
        self.steps.get(index).ok_or(WizardError::StepOutOfRange {
            index,
            total: self.steps.len(),
        })
    }

    pub fn section(&self, key: &str) -> WizardResult<&SectionSchema> {
        self.sections
            .iter()
            .find(|section| section.key == key)
            .ok_or_else(|| WizardError::UnknownSection(key.to_string()))
    }

    pub fn field(&self, section: &str, name: &str) -> WizardResult<&FieldDescriptor> {
        self.section(section)?
            .find_field(name)
            .ok_or_else(|| WizardError::UnknownField {
                section: section.to_string(),
                field: name.to_string(),
            })
    }

    /// Section collected by the step at `index`, if the step has one.
    pub fn step_section(&self, index: usize) -> WizardResult<Option<&SectionSchema>> {
        match &self.step(index)?.section {
            Some(key) => self.section(key).map(Some),
            None => Ok(None),
        }
    }

    fn check(&self) -> WizardResult<()> {
        if self.steps.is_empty() {
            return Err(invalid("a wizard needs at least one step"));
        }

        let mut keys = HashSet::new();
        for section in &self.sections {
            if !keys.insert(section.key.as_str()) {
                return Err(invalid(format!("duplicate section `{}`", section.key)));
            }
            let mut names = HashSet::new();
            for field in &section.fields {
                if !names.insert(field.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate field `{}` in section `{}`",
                        field.name, section.key
                    )));
                }
            }
        }

        let mut bound = HashSet::new();
        for (position, step) in self.steps.iter().enumerate() {
            if step.index != position {
                return Err(invalid(format!(
                    "step `{}` has index {} but sits at position {}",
                    step.label, step.index, position
                )));
            }
            if let Some(key) = &step.section {
                if !keys.contains(key.as_str()) {
                    return Err(invalid(format!(
                        "step `{}` references unknown section `{}`",
                        step.label, key
                    )));
                }
                if !bound.insert(key.as_str()) {
                    return Err(invalid(format!(
                        "section `{}` is bound to more than one step",
                        key
                    )));
                }
            }
        }

        if let Some(orphan) = self
            .sections
            .iter()
            .find(|section| section.has_required_fields() && !bound.contains(section.key.as_str()))
        {
            return Err(invalid(format!(
                "section `{}` has required fields but no step collects it",
                orphan.key
            )));
        }

        Ok(())
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = WizardError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        Schema::new(def.name, def.sections, def.steps)
    }
}

impl From<Schema> for SchemaDef {
    fn from(schema: Schema) -> Self {
        SchemaDef {
            name: schema.name,
            sections: schema.sections,
            steps: schema.steps,
        }
    }
}

fn invalid(message: impl Into<String>) -> WizardError {
    WizardError::InvalidSchema(message.into())
}

/// Incremental schema construction; step indices are assigned in call order.
pub struct SchemaBuilder {
    name: String,
    sections: Vec<SectionSchema>,
    steps: Vec<StepDefinition>,
}

impl SchemaBuilder {
    /// Adds `section` together with the step that collects it.
    pub fn step(mut self, label: impl Into<String>, section: SectionSchema) -> Self {
        self.steps.push(StepDefinition {
            index: self.steps.len(),
            label: label.into(),
            section: Some(section.key.clone()),
        });
        self.sections.push(section);
        self
    }

    /// Adds a step with no section and therefore no validation.
    pub fn info_step(mut self, label: impl Into<String>) -> Self {
        self.steps.push(StepDefinition {
            index: self.steps.len(),
            label: label.into(),
            section: None,
        });
        self
    }

    pub fn build(self) -> WizardResult<Schema> {
        Schema::new(self.name, self.sections, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step_schema() -> Schema {
        Schema::builder("test")
            .step(
                "About you",
                SectionSchema::new("about", "About you")
                    .field(FieldDescriptor::text("name", "Name").required())
                    .field(FieldDescriptor::text("nickname", "Nickname")),
            )
            .info_step("Review")
            .build()
            .unwrap()
    }

    #[test]
    fn builder_assigns_contiguous_indices() {
        let schema = two_step_schema();
        let indices: Vec<usize> = schema.steps().iter().map(|step| step.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(schema.step_count(), 2);
        assert!(schema.step_section(1).unwrap().is_none());
    }

    #[test]
    fn lookup_reports_unknown_names() {
        let schema = two_step_schema();
        assert!(schema.field("about", "name").is_ok());
        assert!(matches!(
            schema.field("about", "age"),
            Err(WizardError::UnknownField { .. })
        ));
        assert!(matches!(
            schema.section("missing"),
            Err(WizardError::UnknownSection(_))
        ));
        assert!(matches!(
            schema.step(2),
            Err(WizardError::StepOutOfRange { index: 2, total: 2 })
        ));
    }

    #[test]
    fn empty_schema_is_rejected() {
        let err = Schema::builder("empty").build().unwrap_err();
        assert!(matches!(err, WizardError::InvalidSchema(_)));
    }

    #[test]
    fn gaps_in_step_indices_are_rejected() {
        let steps = vec![
            StepDefinition {
                index: 0,
                label: "First".into(),
                section: None,
            },
            StepDefinition {
                index: 2,
                label: "Third".into(),
                section: None,
            },
        ];
        let err = Schema::new("gappy", Vec::new(), steps).unwrap_err();
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn section_bound_twice_is_rejected() {
        let section = SectionSchema::new("a", "A");
        let steps = vec![
            StepDefinition {
                index: 0,
                label: "One".into(),
                section: Some("a".into()),
            },
            StepDefinition {
                index: 1,
                label: "Two".into(),
                section: Some("a".into()),
            },
        ];
        let err = Schema::new("twice", vec![section], steps).unwrap_err();
        assert!(err.to_string().contains("more than one step"));
    }

    #[test]
    fn required_section_without_step_is_rejected() {
        let orphan =
            SectionSchema::new("orphan", "Orphan").field(FieldDescriptor::text("x", "X").required());
        let steps = vec![StepDefinition {
            index: 0,
            label: "Only".into(),
            section: None,
        }];
        let err = Schema::new("orphaned", vec![orphan], steps).unwrap_err();
        assert!(err.to_string().contains("no step collects it"));
    }

    #[test]
    fn duplicate_sections_are_rejected() {
        let err = Schema::builder("dupes")
            .step("One", SectionSchema::new("a", "A"))
            .step(
                "Two",
                SectionSchema::new("a", "A again").field(FieldDescriptor::text("y", "Y")),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidSchema(_)));
        assert!(err.to_string().contains("duplicate section `a`"));
    }

    #[test]
    fn optional_overrides_required() {
        let field = FieldDescriptor::text("nickname", "Nickname")
            .required()
            .optional();
        assert!(!field.required);

        let section = SectionSchema::new("a", "A").field(field);
        assert!(!section.has_required_fields());
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let err = Schema::builder("dupes")
            .step(
                "One",
                SectionSchema::new("one", "One")
                    .field(FieldDescriptor::text("x", "X"))
                    .field(FieldDescriptor::list("x", "X again")),
            )
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn json_goes_through_validation() {
        let json = r#"{
            "name": "broken",
            "sections": [],
            "steps": [{ "index": 0, "label": "Start", "section": "nowhere" }]
        }"#;
        let err = Schema::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("unknown section"));
    }

    #[test]
    fn json_roundtrip_preserves_schema() {
        let schema = two_step_schema();
        let json = schema.to_json_pretty().unwrap();
        let parsed = Schema::from_json_str(&json).unwrap();
        assert_eq!(parsed, schema);
    }
}
