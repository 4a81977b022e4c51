use async_trait::async_trait;
use tracing::error;

use crate::app::ports::{ErrorReport, ErrorReporterPort};

/// Emits error reports as structured log events
pub struct TracingErrorReporter;

#[async_trait]
impl ErrorReporterPort for TracingErrorReporter {
    async fn report(&self, report: ErrorReport) {
        error!(
            error_type = %report.error_type,
            subsystem = %report.subsystem,
            stack = %report.stack,
            "{}",
            report.message
        );
    }
}
