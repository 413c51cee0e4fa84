/// Mock implementations for testing
mod mock_catalog_repository;
mod mock_credential_provider;
mod mock_progress_reporter;

pub use mock_catalog_repository::{MockCatalogRepository, RecordedPatch};
pub use mock_credential_provider::MockCredentialProvider;
pub use mock_progress_reporter::MockProgressReporter;
