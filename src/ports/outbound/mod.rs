/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (catalog API, token endpoint, console, etc.).
pub mod catalog_repository;
pub mod credential_provider;
pub mod output_presenter;
pub mod progress_reporter;
pub mod report_formatter;

pub use catalog_repository::CatalogRepository;
pub use credential_provider::{Credential, CredentialProvider};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
