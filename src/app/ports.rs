use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ChainHead, LegacyChain, NormalizedRegistration};
use crate::error::{MigrationError, Result};

/// A chain whose history or rows could not be fetched
#[derive(Debug)]
pub struct ChainFetchFailure {
    pub head: ChainHead,
    pub error: MigrationError,
}

/// One chain from a day index: fetched, or failed on its own
pub type FetchedChain = std::result::Result<LegacyChain, ChainFetchFailure>;

/// Source of legacy history chains
#[async_trait]
pub trait LegacySourcePort: Send + Sync {
    /// Every chain touched on `date`, with raw rows attached where legacy imagery exists.
    ///
    /// The outer error means the day itself could not be listed. A chain that
    /// fails afterwards comes back as its own `Err` entry.
    async fn fetch_day_index(&self, date: NaiveDate) -> Result<Vec<FetchedChain>>;
}

/// A chain the register store refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    pub number: String,
    pub date: String,
    pub message: String,
}

/// Target register store
#[async_trait]
pub trait RegisterSinkPort: Send + Sync {
    /// Persist a batch of chains; returns the chains that failed
    async fn submit_batch(&self, batch: &[Vec<NormalizedRegistration>]) -> Result<Vec<SubmissionFailure>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub stack: String,
    pub subsystem: String,
}

impl ErrorReport {
    pub fn error(subsystem: &str, message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            error_type: "E".to_string(),
            message: message.into(),
            stack: stack.into(),
            subsystem: subsystem.to_string(),
        }
    }
}

/// Destination for errors raised during a run
#[async_trait]
pub trait ErrorReporterPort: Send + Sync {
    async fn report(&self, report: ErrorReport);
}
