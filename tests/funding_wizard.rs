mod common;

use std::collections::BTreeMap;

use common::ScriptedSubmitter;
use insta::assert_snapshot;
use wizard_core::schema::funding::{
    funding_application, CAREER, DOCUMENTS, EDUCATION, FUNDING, PERSONAL_INFO,
};
use wizard_core::{ApplicationRecord, FieldValue, StepOutcome, SubmitOutcome, WizardEngine};

fn fill_personal(engine: &mut WizardEngine) {
    engine.set_field(PERSONAL_INFO, "fullName", "Ann Lee").unwrap();
    engine
        .set_field(PERSONAL_INFO, "email", "ann@example.com")
        .unwrap();
    engine.set_field(PERSONAL_INFO, "phone", "555-0100").unwrap();
    engine
        .set_field(PERSONAL_INFO, "dateOfBirth", "2004-05-17")
        .unwrap();
}

fn fill_remaining(engine: &mut WizardEngine) {
    engine
        .set_field(EDUCATION, "institution", "State University")
        .unwrap();
    engine
        .set_field(EDUCATION, "program", "Computer Science")
        .unwrap();
    engine.set_field(EDUCATION, "yearOfStudy", "2").unwrap();

    engine.set_field(FUNDING, "amountRequested", "5000").unwrap();
    engine.set_field(FUNDING, "fundingPurpose", "Tuition").unwrap();
    let mut breakdown = BTreeMap::new();
    breakdown.insert("tuition".to_string(), FieldValue::from(4000.0));
    breakdown.insert("books".to_string(), FieldValue::from(1000.0));
    engine
        .set_field(FUNDING, "expenseBreakdown", breakdown)
        .unwrap();

    engine
        .set_field(CAREER, "careerGoals", "Software engineer")
        .unwrap();
    engine
        .set_field(CAREER, "skills", vec!["Rust", "SQL"])
        .unwrap();

    engine
        .set_field(DOCUMENTS, "uploadedDocuments", vec!["transcript.pdf"])
        .unwrap();
    engine.set_field(DOCUMENTS, "agreeToTerms", true).unwrap();
}

#[tokio::test]
async fn funding_application_walks_every_step_and_submits() {
    let submitter = ScriptedSubmitter::accepting();
    let mut engine = WizardEngine::new(funding_application(), submitter.clone());

    let blocked = engine.go_next().await.unwrap();
    match blocked {
        StepOutcome::Blocked(errors) => assert_eq!(errors.len(), 4),
        other => panic!("Unexpected outcome: {:?}", other),
    }

    fill_personal(&mut engine);
    fill_remaining(&mut engine);

    for expected in 1..=5 {
        assert_eq!(
            engine.go_next().await.unwrap(),
            StepOutcome::Moved {
                from: expected - 1,
                to: expected
            }
        );
    }
    assert!(engine.is_last_step());
    assert_eq!(engine.percent_complete(), 100);
    assert!(engine.outstanding_errors().unwrap().is_empty());

    let outcome = engine.go_next().await.unwrap();
    assert!(matches!(
        outcome,
        StepOutcome::Submitted(SubmitOutcome::Succeeded(_))
    ));
    assert_eq!(submitter.calls(), 1);
}

#[test]
fn review_summary_lists_every_section() {
    let mut engine = WizardEngine::new(funding_application(), ScriptedSubmitter::accepting());
    fill_personal(&mut engine);
    fill_remaining(&mut engine);

    assert_snapshot!(engine.summary_lines().join("\n"), @r###"
    Review your entries:
    Personal Information (step 1)
      Full name: Ann Lee
      Email address: ann@example.com
      Phone number: 555-0100
      Date of birth: 2004-05-17
      Address: [unfilled]
    Education (step 2)
      Institution: State University
      Program of study: Computer Science
      Year of study: 2
      GPA: [unfilled]
    Funding Details (step 3)
      Amount requested: 5000
      Purpose of funding: Tuition
      Other funding sources: [unfilled]
      Expense breakdown: books: 1000; tuition: 4000
    Career Goals (step 4)
      Career goals: Software engineer
      Skills: Rust, SQL
      Interests: [unfilled]
    Documents (step 5)
      Uploaded documents: transcript.pdf
      Terms accepted: Yes
    "###);
}

#[tokio::test]
async fn review_edit_link_returns_to_section_without_validation() {
    let mut engine = WizardEngine::new(funding_application(), ScriptedSubmitter::accepting());
    fill_personal(&mut engine);
    fill_remaining(&mut engine);
    engine.jump_to(5).unwrap();

    let education = engine
        .summary()
        .into_iter()
        .find(|section| section.label == "Education")
        .expect("education section");
    engine.jump_to(education.step).unwrap();
    assert_eq!(engine.current_step(), 1);

    engine.set_field(EDUCATION, "program", "   ").unwrap();
    engine.jump_to(5).unwrap();
    let outstanding = engine.outstanding_errors().unwrap();
    assert_eq!(outstanding.get("education.program"), Some("required"));

    // The review step itself has no rules, so submission is not blocked by
    // earlier sections edited through jumps.
    let outcome = engine.go_next().await.unwrap();
    assert!(matches!(outcome, StepOutcome::Submitted(_)));
}

#[test]
fn saved_draft_resumes_with_values() {
    let schema = funding_application();
    let draft = r#"{
        "personalInfo": { "fullName": "Ann Lee", "email": "ann@example.com" },
        "career": { "skills": ["Rust"] }
    }"#;
    let record = ApplicationRecord::from_json(&schema, draft).unwrap();
    let engine = WizardEngine::new(schema, ScriptedSubmitter::accepting())
        .with_record(record)
        .unwrap();

    assert_eq!(
        engine
            .section(PERSONAL_INFO)
            .unwrap()
            .get("fullName")
            .and_then(FieldValue::as_text),
        Some("Ann Lee")
    );
    assert_eq!(
        engine.record().get(CAREER, "skills").unwrap().as_list(),
        Some(&["Rust".to_string()][..])
    );
    assert_eq!(engine.outstanding_errors().unwrap().len(), 9);
}
