use crate::eol_tracking::domain::SyncTarget;
use crate::eol_tracking::policies::MissingRelationPolicy;

/// SyncRequest - Internal request DTO for the sync use case
///
/// Built once from CLI arguments, environment and config file,
/// then handed to the use case unchanged.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Framework/service pairings processed in order
    pub targets: Vec<SyncTarget>,
    /// Applied uniformly to every service lacking the relation
    pub missing_relation_policy: MissingRelationPolicy,
    /// Compute counts without sending updates
    pub dry_run: bool,
    /// Do not send an update when the stored count already matches
    pub skip_unchanged: bool,
    /// Maximum in-flight updates per target
    pub concurrency: usize,
}

impl SyncRequest {
    pub const DEFAULT_CONCURRENCY: usize = 4;
    pub const MAX_CONCURRENCY: usize = 16;

    pub fn new(targets: Vec<SyncTarget>) -> Self {
        Self {
            targets,
            missing_relation_policy: MissingRelationPolicy::default(),
            dry_run: false,
            skip_unchanged: false,
            concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }
}
