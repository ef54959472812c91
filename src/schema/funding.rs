//! Built-in schema for the student funding application.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{FieldDescriptor, FieldKind, Schema, SectionSchema};

pub const PERSONAL_INFO: &str = "personalInfo";
pub const EDUCATION: &str = "education";
pub const FUNDING: &str = "funding";
pub const CAREER: &str = "career";
pub const DOCUMENTS: &str = "documents";

static FUNDING_APPLICATION: Lazy<Arc<Schema>> = Lazy::new(|| Arc::new(build()));

/// Six-step funding application: five data sections followed by a review step.
pub fn funding_application() -> Arc<Schema> {
    Arc::clone(&FUNDING_APPLICATION)
}

fn build() -> Schema {
    let personal = SectionSchema::new(PERSONAL_INFO, "Personal information")
        .field(FieldDescriptor::text("fullName", "Full name").required())
        .field(FieldDescriptor::text("email", "Email address").required())
        .field(FieldDescriptor::text("phone", "Phone number").required())
        .field(FieldDescriptor::text("dateOfBirth", "Date of birth").required())
        .field(FieldDescriptor::text("address", "Address"));

    let education = SectionSchema::new(EDUCATION, "Education")
        .field(FieldDescriptor::text("institution", "Institution").required())
        .field(FieldDescriptor::text("program", "Program of study").required())
        .field(FieldDescriptor::text("yearOfStudy", "Year of study").required())
        .field(FieldDescriptor::text("gpa", "GPA"));

    let funding = SectionSchema::new(FUNDING, "Funding request")
        .field(
            FieldDescriptor::text("amountRequested", "Amount requested")
                .required()
                .with_help("Total amount in your local currency."),
        )
        .field(FieldDescriptor::text("fundingPurpose", "Purpose of funding").required())
        .field(FieldDescriptor::list("otherFunding", "Other funding sources"))
        .field(FieldDescriptor::new(
            "expenseBreakdown",
            "Expense breakdown",
            FieldKind::Object,
        ));

    let career = SectionSchema::new(CAREER, "Career goals")
        .field(FieldDescriptor::text("careerGoals", "Career goals").required())
        .field(FieldDescriptor::list("skills", "Skills").required())
        .field(FieldDescriptor::list("interests", "Interests"));

    let documents = SectionSchema::new(DOCUMENTS, "Supporting documents")
        .field(
            FieldDescriptor::list("uploadedDocuments", "Uploaded documents")
                .required()
                .with_help("At least one transcript or proof of enrolment."),
        )
        .field(FieldDescriptor::new(
            "agreeToTerms",
            "Terms accepted",
            FieldKind::Boolean,
        ));

    let schema = Schema::builder("funding_application")
        .step("Personal Information", personal)
        .step("Education", education)
        .step("Funding Details", funding)
        .step("Career Goals", career)
        .step("Documents", documents)
        .info_step("Review & Submit")
        .build();

    match schema {
        Ok(schema) => schema,
        Err(err) => panic!("built-in funding schema is invalid: {err}"),
    }
}
