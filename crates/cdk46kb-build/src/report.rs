//! Per-item build outcomes and their human-readable summary lines.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Done(String),
    Skipped(String),
}

/// Outcome of one item of one stage (a copied file, a converted table, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub stage: &'static str,
    pub item: String,
    pub status: Status,
}

impl StepReport {
    pub fn done(stage: &'static str, item: impl Into<String>, detail: impl Into<String>) -> Self {
        let report = Self { stage, item: item.into(), status: Status::Done(detail.into()) };
        tracing::info!(stage, item = %report.item, "{}", report.detail());
        report
    }

    pub fn skipped(stage: &'static str, item: impl Into<String>, reason: impl Into<String>) -> Self {
        let report = Self { stage, item: item.into(), status: Status::Skipped(reason.into()) };
        tracing::warn!(stage, item = %report.item, "skipped: {}", report.detail());
        report
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, Status::Done(_))
    }

    fn detail(&self) -> &str {
        match &self.status {
            Status::Done(d) | Status::Skipped(d) => d,
        }
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Status::Done(d) => write!(f, "[{}] {}: {}", self.stage, self.item, d),
            Status::Skipped(r) => write!(f, "[{}] {}: skipped: {}", self.stage, self.item, r),
        }
    }
}
