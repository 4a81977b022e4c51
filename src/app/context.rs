use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::NormalizedRegistration;

/// Mutable state of one migration run, owned by the driving loop
#[derive(Debug)]
pub struct MigrationContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_processed: usize,
    pub chains_read: usize,
    pub chains_without_history: usize,
    pub records_processed: usize,
    pub errors: usize,
    pub flagged_chains: usize,
    pub retrieval_wait: Duration,
    pub submission_wait: Duration,
    log: Vec<String>,
}

impl MigrationContext {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            start,
            end,
            days_processed: 0,
            chains_read: 0,
            chains_without_history: 0,
            records_processed: 0,
            errors: 0,
            flagged_chains: 0,
            retrieval_wait: Duration::ZERO,
            submission_wait: Duration::ZERO,
            log: Vec::new(),
        }
    }

    /// One line per migrated registration, each followed by its flags
    pub fn log_success(&mut self, chain: &[NormalizedRegistration]) {
        for item in chain {
            self.log.push(format!("Processed {}", item.registration));
            for flag in &item.migration_data.flags {
                self.log.push(format!("  {}", flag));
            }
        }
    }

    pub fn log_failure(&mut self, identity: &str, message: &str) {
        self.errors += 1;
        self.log.push(format!("Failed to migrate {}: {}", identity, message));
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn finish(self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            start: self.start,
            end: self.end,
            days_processed: self.days_processed,
            chains_read: self.chains_read,
            chains_without_history: self.chains_without_history,
            records_processed: self.records_processed,
            errors: self.errors,
            flagged_chains: self.flagged_chains,
            retrieval_wait_secs: self.retrieval_wait.as_secs_f64(),
            submission_wait_secs: self.submission_wait.as_secs_f64(),
            log: self.log,
        }
    }
}

/// Outcome of a finished migration run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_processed: usize,
    pub chains_read: usize,
    pub chains_without_history: usize,
    pub records_processed: usize,
    pub errors: usize,
    pub flagged_chains: usize,
    pub retrieval_wait_secs: f64,
    pub submission_wait_secs: f64,
    pub log: Vec<String>,
}

impl RunReport {
    /// Human-readable end-of-run summary
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Migration {} complete ({} to {})", self.run_id, self.start, self.end),
            format!("Days processed: {}", self.days_processed),
            format!("Total registrations read: {}", self.chains_read),
            format!("Chains without history: {}", self.chains_without_history),
            format!("Total records processed: {}", self.records_processed),
            format!("Flagged chains: {}", self.flagged_chains),
            format!("Total errors: {}", self.errors),
            format!(
                "Time waiting on retrieval: {:.2}s, on submission: {:.2}s",
                self.retrieval_wait_secs, self.submission_wait_secs
            ),
        ];
        lines.extend(self.log.iter().cloned());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Applicant, MigrationData, RegistrationKey};

    fn registration(flags: &[&str]) -> NormalizedRegistration {
        NormalizedRegistration {
            class_of_charge: "C1".to_string(),
            registration: RegistrationKey {
                registration_no: "42".to_string(),
                date: NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            },
            entry_type: "NR".to_string(),
            parties: Vec::new(),
            applicant: Applicant::default(),
            particulars: None,
            additional_information: String::new(),
            migration_data: MigrationData {
                flags: flags.iter().map(|f| f.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_log_lines_and_report() {
        let day = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        let mut ctx = MigrationContext::new(day, day);
        ctx.log_success(&[registration(&["Does not start with NR"])]);
        ctx.log_failure("2001-02-03/43", "rejected");

        assert_eq!(
            ctx.log_lines(),
            &[
                "Processed 2001-02-03/42".to_string(),
                "  Does not start with NR".to_string(),
                "Failed to migrate 2001-02-03/43: rejected".to_string()
            ]
        );

        let report = ctx.finish();
        assert_eq!(report.errors, 1);
        let summary = report.summary_lines();
        assert!(summary.contains(&"Total errors: 1".to_string()));
        assert!(summary.contains(&"Processed 2001-02-03/42".to_string()));
    }
}
