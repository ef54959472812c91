use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use wizard_core::config::{Config, ConfigManager};
use wizard_core::schema::funding::funding_application;
use wizard_core::{Schema, WizardEngine, WizardError};

#[test]
fn configured_schema_path_is_loaded() {
    let temp = TempDir::new().expect("temp dir");
    let schema_path = temp.path().join("scholarship.json");
    fs::write(
        &schema_path,
        r#"{
            "name": "scholarship",
            "sections": [
                { "key": "applicant", "label": "Applicant", "fields": [
                    { "name": "name", "label": "Name", "kind": "text", "required": true },
                    { "name": "essay", "label": "Essay", "kind": "text" }
                ] }
            ],
            "steps": [
                { "index": 0, "label": "Applicant", "section": "applicant" },
                { "index": 1, "label": "Review" }
            ]
        }"#,
    )
    .expect("write schema");

    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
    let config = Config {
        schema_path: Some(schema_path),
        ..Config::default()
    };
    manager.save(&config).expect("save config");

    let schema = manager.load().expect("load").load_schema().expect("schema");
    assert_eq!(schema.name(), "scholarship");
    assert_eq!(schema.step_count(), 2);
    assert!(schema.field("applicant", "name").unwrap().required);
    assert!(!schema.field("applicant", "essay").unwrap().required);
}

#[test]
fn invalid_schema_file_is_reported() {
    let temp = TempDir::new().expect("temp dir");
    let schema_path = temp.path().join("broken.json");
    fs::write(
        &schema_path,
        r#"{ "name": "broken", "sections": [], "steps": [] }"#,
    )
    .expect("write schema");

    let err = Schema::load(&schema_path).unwrap_err();
    assert!(err.to_string().contains("at least one step"));

    let missing = Schema::load(&temp.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, WizardError::Io(_)));
}

#[test]
fn exported_funding_schema_loads_back_identically() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("funding.json");
    let schema = funding_application();
    fs::write(&path, schema.to_json_pretty().unwrap()).expect("write schema");

    let loaded = Schema::load(&path).expect("load schema");
    assert_eq!(&loaded, schema.as_ref());
}

#[test]
fn configured_submitter_drives_an_engine() {
    let config = Config {
        submit_endpoint: Some("http://127.0.0.1:8080/api/applications".into()),
        submit_timeout_secs: 2,
        ..Config::default()
    };
    let submitter = config.http_submitter().expect("submitter");
    assert_eq!(submitter.endpoint().path(), "/api/applications");

    let engine = WizardEngine::new(config.load_schema().unwrap(), Arc::new(submitter));
    assert_eq!(engine.step_count(), 6);
}
