pub mod entity;
pub mod eol_classification;
pub mod framework_state;
pub mod sync_report;
pub mod sync_target;

pub use entity::{Entity, EntityPatch};
pub use eol_classification::EolClassification;
pub use framework_state::FrameworkState;
pub use sync_report::{
    FrameworkTally, ServiceOutcome, ServiceResult, SyncReport, SyncSummary, TargetReport,
    TargetStatus,
};
pub use sync_target::SyncTarget;
