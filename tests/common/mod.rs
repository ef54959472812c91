#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use wizard_core::{
    ApplicationRecord, Confirmation, FieldDescriptor, Schema, SectionSchema, SubmitError,
    SubmitOperation,
};

/// Submitter that replays scripted results and remembers every record it saw.
/// When gated, each call waits for [`ScriptedSubmitter::release`].
pub struct ScriptedSubmitter {
    results: Mutex<VecDeque<Result<Confirmation, SubmitError>>>,
    received: Mutex<Vec<ApplicationRecord>>,
    calls: AtomicUsize,
    gate: Option<Notify>,
}

impl ScriptedSubmitter {
    pub fn accepting() -> Arc<Self> {
        Self::scripted(Vec::new(), false)
    }

    pub fn scripted(results: Vec<Result<Confirmation, SubmitError>>, gated: bool) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            received: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: gated.then(Notify::new),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<ApplicationRecord> {
        self.received.lock().unwrap().clone()
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl SubmitOperation for ScriptedSubmitter {
    async fn submit(&self, record: ApplicationRecord) -> Result<Confirmation, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(record);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Confirmation::new("APP-0001")))
    }
}

/// Three steps: `step0` requires `name`, `step1` requires `amount`, the last
/// step requires nothing.
pub fn three_step_schema() -> Arc<Schema> {
    let schema = Schema::builder("three_steps")
        .step(
            "Name",
            SectionSchema::new("step0", "Name")
                .field(FieldDescriptor::text("name", "Name").required()),
        )
        .step(
            "Amount",
            SectionSchema::new("step1", "Amount")
                .field(FieldDescriptor::text("amount", "Amount").required()),
        )
        .info_step("Confirm")
        .build()
        .expect("valid schema");
    Arc::new(schema)
}
