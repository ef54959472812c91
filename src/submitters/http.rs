use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::errors::{WizardError, WizardResult};
use crate::record::ApplicationRecord;
use crate::wizard::submission::{Confirmation, SubmitError, SubmitOperation};

/// POSTs the finished record as JSON to a backend endpoint.
///
/// The request timeout is the only timeout applied to a submission.
#[derive(Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: Url,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    application: &'a ApplicationRecord,
}

#[derive(Deserialize, Default)]
struct SubmitResponse {
    #[serde(default)]
    reference: Option<String>,
}

impl HttpSubmitter {
    pub fn new(endpoint: &str, timeout: Duration) -> WizardResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| WizardError::Config(format!("invalid submit endpoint `{endpoint}`: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WizardError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SubmitOperation for HttpSubmitter {
    async fn submit(&self, record: ApplicationRecord) -> Result<Confirmation, SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SubmitRequest {
                application: &record,
            })
            .send()
            .await
            .map_err(|e| SubmitError::new(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::new(format!(
                "server responded with status {}",
                status.as_u16()
            )));
        }

        // An empty or non-JSON body still counts as accepted.
        let body = response.text().await.map_err(|e| SubmitError::new(describe(&e)))?;
        let parsed: SubmitResponse = serde_json::from_str(&body).unwrap_or_default();
        Ok(match parsed.reference {
            Some(reference) => Confirmation::new(reference),
            None => Confirmation::generated(),
        })
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "network error".to_string()
    } else {
        error.to_string()
    }
}
