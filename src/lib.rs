//! eol-sync - end-of-life package counts for the Port catalog
//!
//! This library classifies "framework" entities as EOL or active, counts how
//! many EOL frameworks each "service" entity relates to, and writes that
//! count back onto the service, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`eol_tracking`): Pure classification and counting logic
//! - **Application Layer** (`application`): The sync use case and its DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use eol_sync::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let authenticator = PortAuthenticator::new(Credentials::StaticToken("token".to_string()))?;
//! let catalog = PortCatalogClient::new(CatalogClientConfig::default())?;
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = SyncEolCountsUseCase::new(authenticator, catalog, progress_reporter);
//!
//! // Execute
//! let request = SyncRequest::new(vec![SyncTarget::default()]);
//! let report = use_case.execute(request).await?;
//!
//! // Format output
//! let output = JsonReportFormatter::new().format(&report)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod eol_tracking;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{JsonReportFormatter, TextReportFormatter};
    pub use crate::adapters::outbound::network::{
        CatalogClientConfig, Credentials, PortAuthenticator, PortCatalogClient,
    };
    pub use crate::application::dto::{OutputFormat, SyncRequest};
    pub use crate::application::use_cases::SyncEolCountsUseCase;
    pub use crate::eol_tracking::domain::{
        Entity, EntityPatch, EolClassification, FrameworkState, ServiceOutcome, ServiceResult,
        SyncReport, SyncTarget, TargetReport, TargetStatus,
    };
    pub use crate::eol_tracking::policies::MissingRelationPolicy;
    pub use crate::eol_tracking::services::{EolClassifier, EolCounter};
    pub use crate::ports::outbound::{
        CatalogRepository, Credential, CredentialProvider, OutputPresenter, ProgressReporter,
        ReportFormatter,
    };
    pub use crate::shared::error::{ErrorKind, ExitCode, SyncError};
    pub use crate::shared::Result;
}
