use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::context::MigrationContext;
use super::ports::{RegisterSinkPort, SubmissionFailure};
use crate::domain::NormalizedRegistration;
use crate::transform::canonicalize_registration_number;
use crate::transform::registration::parse_legacy_date;

/// Collects assembled chains and hands them to the register store in batches
pub struct BatchSubmitter {
    sink: Arc<dyn RegisterSinkPort>,
    threshold: usize,
    pending: Vec<Vec<NormalizedRegistration>>,
}

impl BatchSubmitter {
    pub fn new(sink: Arc<dyn RegisterSinkPort>, threshold: usize) -> Self {
        Self {
            sink,
            threshold: threshold.max(1),
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue a chain, submitting the batch once the threshold is reached
    pub async fn push(
        &mut self,
        chain: Vec<NormalizedRegistration>,
        ctx: &mut MigrationContext,
    ) -> Vec<SubmissionFailure> {
        self.pending.push(chain);
        if self.pending.len() >= self.threshold {
            self.flush(ctx).await
        } else {
            Vec::new()
        }
    }

    /// Submit whatever is pending. Returns the failures, already counted in `ctx`.
    pub async fn flush(&mut self, ctx: &mut MigrationContext) -> Vec<SubmissionFailure> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let batch = std::mem::take(&mut self.pending);

        info!("Submitting batch of {} chains", batch.len());
        let started = Instant::now();
        let result = self.sink.submit_batch(&batch).await;
        ctx.submission_wait += started.elapsed();

        let failures = match result {
            Ok(failures) => failures,
            Err(e) => {
                error!("Batch submission failed: {}", e);
                batch
                    .iter()
                    .filter_map(|chain| chain.first())
                    .map(|item| SubmissionFailure {
                        number: item.registration.registration_no.clone(),
                        date: item.registration.date.to_string(),
                        message: e.to_string(),
                    })
                    .collect()
            }
        };

        for chain in &batch {
            if !failures.iter().any(|failure| failure_matches(failure, chain)) {
                ctx.log_success(chain);
            }
        }

        for failure in &failures {
            error!(
                number = %failure.number,
                date = %failure.date,
                "Failed to migrate: {}",
                failure.message
            );
            if let Some(chain) = batch.iter().find(|chain| failure_matches(failure, chain)) {
                error!("Registration: {}", serde_json::to_string(chain).unwrap_or_default());
            }
            ctx.log_failure(&format!("{}/{}", failure.date, failure.number), &failure.message);
        }

        metrics::counter!("lcm_submission_failures_total").increment(failures.len() as u64);
        metrics::histogram!("lcm_submission_duration_seconds").record(started.elapsed().as_secs_f64());
        failures
    }
}

/// Whether a reported failure refers to this chain's first registration.
///
/// The store may echo the date with a time part, so only its leading
/// `YYYY-MM-DD` is compared.
fn failure_matches(failure: &SubmissionFailure, chain: &[NormalizedRegistration]) -> bool {
    let Some(item) = chain.first() else {
        return false;
    };
    let date = failure.date.trim();
    let date = date.get(..10).unwrap_or(date);
    canonicalize_registration_number(&failure.number) == item.registration.registration_no
        && parse_legacy_date(date).map_or(false, |date| date == item.registration.date)
}
