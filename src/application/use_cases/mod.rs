/// Use cases module containing application business logic orchestration
mod sync_eol_counts;

pub use sync_eol_counts::SyncEolCountsUseCase;
