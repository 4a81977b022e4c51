use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use super::batch::BatchSubmitter;
use super::context::{MigrationContext, RunReport};
use super::ports::{
    ChainFetchFailure, ErrorReport, ErrorReporterPort, LegacySourcePort, RegisterSinkPort, SubmissionFailure,
};
use crate::domain::LegacyChain;
use crate::error::{MigrationError, Result};
use crate::transform::TransformEngine;

/// Drives a migration over a date window, one calendar day at a time
pub struct MigrateUseCase {
    source: Arc<dyn LegacySourcePort>,
    sink: Arc<dyn RegisterSinkPort>,
    reporter: Arc<dyn ErrorReporterPort>,
    engine: TransformEngine,
    subsystem: String,
    batch_size: usize,
}

impl MigrateUseCase {
    pub fn new(
        source: Arc<dyn LegacySourcePort>,
        sink: Arc<dyn RegisterSinkPort>,
        reporter: Arc<dyn ErrorReporterPort>,
        engine: TransformEngine,
    ) -> Self {
        Self {
            source,
            sink,
            reporter,
            engine,
            subsystem: "lc-migrator".to_string(),
            batch_size: crate::constants::DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Migrate every day from `start` to `end` inclusive.
    ///
    /// Per-chain failures are counted and the run carries on. A retrieval failure
    /// ends the run after flushing the chains already assembled.
    #[instrument(skip(self))]
    pub async fn run(&self, start: NaiveDate, end: NaiveDate) -> Result<RunReport> {
        if end < start {
            return Err(MigrationError::InvalidDate(format!("end {} is before start {}", end, start)));
        }

        info!("Migration started");
        let mut ctx = MigrationContext::new(start, end);
        let mut submitter = BatchSubmitter::new(self.sink.clone(), self.batch_size);

        for date in start.iter_days().take_while(|day| *day <= end) {
            if let Err(e) = self.process_day(date, &mut ctx, &mut submitter).await {
                error!("Unhandled exception: {}", e);
                self.reporter
                    .report(ErrorReport::error(
                        &self.subsystem,
                        e.to_string(),
                        format!("retrieval for {}", date),
                    ))
                    .await;
                let failures = submitter.flush(&mut ctx).await;
                self.report_failures(&failures).await;
                return Err(e);
            }
        }

        let failures = submitter.flush(&mut ctx).await;
        self.report_failures(&failures).await;

        let report = ctx.finish();
        info!("Migration complete");
        for line in report.summary_lines() {
            info!("{}", line);
        }
        Ok(report)
    }

    #[instrument(skip(self, ctx, submitter))]
    async fn process_day(
        &self,
        date: NaiveDate,
        ctx: &mut MigrationContext,
        submitter: &mut BatchSubmitter,
    ) -> Result<()> {
        let started = Instant::now();
        let chains = self.source.fetch_day_index(date).await?;
        ctx.retrieval_wait += started.elapsed();
        metrics::histogram!("lcm_retrieval_duration_seconds").record(started.elapsed().as_secs_f64());

        ctx.days_processed += 1;
        ctx.chains_read += chains.len();
        metrics::counter!("lcm_days_processed_total").increment(1);
        metrics::counter!("lcm_chains_read_total").increment(chains.len() as u64);
        info!("Retrieved {} chains for {}", chains.len(), date);

        for fetched in chains {
            let chain = match fetched {
                Ok(chain) => chain,
                Err(failure) => {
                    self.fetch_failed(failure, ctx).await;
                    continue;
                }
            };
            info!(
                "Process {} {}/{}",
                chain.head.class_of_charge, chain.head.date, chain.head.reg_no
            );
            if chain.entries.is_empty() {
                warn!("No document history information found");
                ctx.chains_without_history += 1;
                continue;
            }
            ctx.records_processed += chain.entries.len();
            metrics::counter!("lcm_records_processed_total").increment(chain.entries.len() as u64);

            if let Some(items) = self.transform_chain(&chain, ctx).await {
                if items.iter().any(|item| !item.migration_data.flags.is_empty()) {
                    ctx.flagged_chains += 1;
                    metrics::counter!("lcm_flagged_chains_total").increment(1);
                }
                let failures = submitter.push(items, ctx).await;
                self.report_failures(&failures).await;
            }
        }
        Ok(())
    }

    async fn fetch_failed(&self, failure: ChainFetchFailure, ctx: &mut MigrationContext) {
        let head = &failure.head;
        error!(
            "Failed to fetch {} {} {}: {}",
            head.class_of_charge, head.reg_no, head.date, failure.error
        );
        ctx.log_failure(&format!("{}/{}", head.date, head.reg_no), &failure.error.to_string());
        metrics::counter!("lcm_chain_errors_total").increment(1);
        self.reporter
            .report(ErrorReport::error(
                &self.subsystem,
                failure.error.to_string(),
                format!("fetch {} {}/{}", head.class_of_charge, head.date, head.reg_no),
            ))
            .await;
    }

    async fn transform_chain(
        &self,
        chain: &LegacyChain,
        ctx: &mut MigrationContext,
    ) -> Option<Vec<crate::domain::NormalizedRegistration>> {
        match self.engine.assemble_chain(chain) {
            Ok(items) => Some(items),
            Err(e) => {
                let head = &chain.head;
                error!("Unhandled exception: {}", e);
                error!(
                    "Failed to migrate {} {} {}",
                    head.class_of_charge, head.reg_no, head.date
                );
                error!("Rows: {}", serde_json::to_string(&chain.entries).unwrap_or_default());
                ctx.log_failure(&format!("{}/{}", head.date, head.reg_no), &e.to_string());
                metrics::counter!("lcm_chain_errors_total").increment(1);
                self.reporter
                    .report(ErrorReport::error(
                        &self.subsystem,
                        e.to_string(),
                        format!("chain {} {}/{}", head.class_of_charge, head.date, head.reg_no),
                    ))
                    .await;
                None
            }
        }
    }

    async fn report_failures(&self, failures: &[SubmissionFailure]) {
        for failure in failures {
            self.reporter
                .report(ErrorReport::error(
                    &self.subsystem,
                    format!("Failed to migrate {}/{}: {}", failure.date, failure.number, failure.message),
                    String::new(),
                ))
                .await;
        }
    }
}
