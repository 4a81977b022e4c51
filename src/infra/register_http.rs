use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::app::ports::{RegisterSinkPort, SubmissionFailure};
use crate::domain::NormalizedRegistration;
use crate::error::{MigrationError, Result};

/// Register store's migrated-record endpoint
pub struct HttpRegisterSink {
    client: reqwest::Client,
    url: String,
}

impl HttpRegisterSink {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/migrated_record", base_url.trim_end_matches('/')),
        })
    }
}

/// An empty body means every chain was stored
fn parse_failures(body: &str) -> Result<Vec<SubmissionFailure>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl RegisterSinkPort for HttpRegisterSink {
    async fn submit_batch(&self, batch: &[Vec<NormalizedRegistration>]) -> Result<Vec<SubmissionFailure>> {
        info!("  POST {}", self.url);
        let response = self.client.post(&self.url).json(batch).send().await?;
        let status = response.status();
        info!("  Response: {}", status.as_u16());

        if !status.is_success() {
            return Err(MigrationError::Submission {
                message: format!("Unexpected {} return code for POST {}", status.as_u16(), self.url),
            });
        }
        let body = response.text().await?;
        parse_failures(&body)
    }
}
