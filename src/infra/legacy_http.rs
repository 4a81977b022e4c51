use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::ports::{ChainFetchFailure, FetchedChain, LegacySourcePort};
use crate::constants::{class_without_brackets, convert_class, NEW_REGISTRATION_TYPE};
use crate::domain::{ChainHead, HistoryEntry, LegacyChain, RawLegacyRow};
use crate::error::{MigrationError, Result};
use crate::transform::canonicalize_registration_number;

/// Legacy index service over HTTP
pub struct HttpLegacySource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLegacySource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// New registrations lodged on `date`
    async fn chain_heads(&self, date: NaiveDate) -> Result<Vec<ChainHead>> {
        let url = self.url(&format!("land_charges/{}/{}", date, date));
        info!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[("type", NEW_REGISTRATION_TYPE)])
            .send()
            .await?;
        let status = response.status();
        info!("Response: {}", status.as_u16());

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(MigrationError::Retrieval { url, status: status.as_u16(), body });
        }

        let value: serde_json::Value = response.json().await?;
        if !value.is_array() {
            return Err(MigrationError::Retrieval {
                url,
                status: status.as_u16(),
                body: format!("Registration data is not a list: {}", value),
            });
        }
        let heads: Vec<ChainHead> = serde_json::from_value(value)?;
        Ok(heads.into_iter().map(ChainHead::trimmed).collect())
    }

    async fn doc_history(&self, head: &ChainHead) -> Result<Vec<HistoryEntry>> {
        let url = self.url(&format!("doc_history/{}", head.reg_no));
        let class = class_without_brackets(&head.class_of_charge);
        info!("  GET {}?class={}&date={}", url, class, head.date);
        let response = self
            .client
            .get(&url)
            .query(&[("class", class.as_str()), ("date", head.date.as_str())])
            .send()
            .await?;
        let status = response.status();
        info!("  Response: {}", status.as_u16());

        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            warn!("Non-200 return code {} for {}", status.as_u16(), url);
            let body = response.text().await.unwrap_or_default();
            return Err(MigrationError::Retrieval { url, status: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }

    async fn land_charge(&self, reg_no: &str, class: &str, date: &str) -> Result<Option<Vec<RawLegacyRow>>> {
        let url = self.url(&format!("land_charges/{}", reg_no));
        info!("    GET {}?class={}&date={}", url, class, date);
        let response = self
            .client
            .get(&url)
            .query(&[("class", class), ("date", date)])
            .send()
            .await?;
        let status = response.status();
        info!("    Response: {}", status.as_u16());

        match status {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            other => {
                let body = response.text().await.unwrap_or_default();
                Err(MigrationError::Retrieval { url, status: other.as_u16(), body })
            }
        }
    }

    /// History of one chain with raw rows attached
    async fn chain(&self, head: &ChainHead) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.doc_history(head).await?;
        info!("  Chain of length {} found", entries.len());

        for entry in entries.iter_mut() {
            let numeric = canonicalize_registration_number(&entry.reg_no);
            if numeric.is_empty() {
                warn!("History entry '{}' has no numeric registration number", entry.reg_no);
                continue;
            }
            let class = convert_class(&entry.class_of_charge);
            entry.rows = self.land_charge(&numeric, &class, entry.date.trim()).await?;
        }
        Ok(entries)
    }
}

#[async_trait]
impl LegacySourcePort for HttpLegacySource {
    async fn fetch_day_index(&self, date: NaiveDate) -> Result<Vec<FetchedChain>> {
        let heads = self.chain_heads(date).await?;
        info!("Found {} items", heads.len());

        let mut chains = Vec::with_capacity(heads.len());
        for head in heads {
            match self.chain(&head).await {
                Ok(entries) => chains.push(Ok(LegacyChain { head, entries })),
                Err(error) => {
                    warn!(
                        "Fetching {} {}/{} failed: {}",
                        head.class_of_charge, head.date, head.reg_no, error
                    );
                    chains.push(Err(ChainFetchFailure { head, error }));
                }
            }
        }
        Ok(chains)
    }
}
