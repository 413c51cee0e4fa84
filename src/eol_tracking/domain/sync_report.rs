use super::SyncTarget;
use crate::shared::error::ErrorKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Result of processing one service entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServiceResult {
    /// The count was written
    Updated { count: usize },
    /// The stored value already matched; no request was sent
    Unchanged { count: usize },
    /// Dry run: the count that would have been written
    Planned { count: usize },
    Skipped { reason: String },
    Failed { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOutcome {
    pub service_id: String,
    #[serde(flatten)]
    pub result: ServiceResult,
}

impl ServiceOutcome {
    pub fn new(service_id: impl Into<String>, result: ServiceResult) -> Self {
        Self {
            service_id: service_id.into(),
            result,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.result, ServiceResult::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    Completed,
    Failed { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameworkTally {
    pub eol: usize,
    pub active: usize,
    pub unrecognized: usize,
}

/// Outcome of one sync target within a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetReport {
    pub name: String,
    pub framework_blueprint: String,
    pub service_blueprint: String,
    pub relation: String,
    pub property: String,
    #[serde(flatten)]
    pub status: TargetStatus,
    pub frameworks: FrameworkTally,
    /// Identifiers classified as EOL, sorted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub eol_frameworks: Vec<String>,
    pub services: Vec<ServiceOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TargetReport {
    pub fn new(target: &SyncTarget) -> Self {
        Self {
            name: target.name().to_string(),
            framework_blueprint: target.framework_blueprint().to_string(),
            service_blueprint: target.service_blueprint().to_string(),
            relation: target.relation().to_string(),
            property: target.property().to_string(),
            status: TargetStatus::Completed,
            frameworks: FrameworkTally::default(),
            eol_frameworks: Vec::new(),
            services: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn fail(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.status = TargetStatus::Failed {
            kind,
            message: message.into(),
        };
        self
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, TargetStatus::Failed { .. })
    }

    pub fn has_failed_services(&self) -> bool {
        self.services.iter().any(ServiceOutcome::is_failed)
    }
}

/// Aggregated counts across all targets of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub targets: usize,
    pub failed_targets: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// SyncReport is returned to the caller in place of console-only output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub targets: Vec<TargetReport>,
}

impl SyncReport {
    pub fn start(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            targets: Vec::new(),
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn summary(&self) -> SyncSummary {
        let mut summary = SyncSummary {
            targets: self.targets.len(),
            ..SyncSummary::default()
        };

        for target in &self.targets {
            if target.is_failed() {
                summary.failed_targets += 1;
            }
            for outcome in &target.services {
                match outcome.result {
                    ServiceResult::Updated { .. } => summary.updated += 1,
                    ServiceResult::Unchanged { .. } => summary.unchanged += 1,
                    ServiceResult::Planned { .. } => summary.planned += 1,
                    ServiceResult::Skipped { .. } => summary.skipped += 1,
                    ServiceResult::Failed { .. } => summary.failed += 1,
                }
            }
        }

        summary
    }

    pub fn has_failures(&self) -> bool {
        self.targets
            .iter()
            .any(|t| t.is_failed() || t.has_failed_services())
    }
}
