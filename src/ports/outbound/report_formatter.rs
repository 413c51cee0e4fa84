use crate::eol_tracking::domain::SyncReport;
use crate::shared::Result;

/// ReportFormatter port for rendering a sync report
///
/// Implementations exist for human-readable text and machine-readable JSON.
pub trait ReportFormatter {
    /// Renders the report as a string
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, report: &SyncReport) -> Result<String>;
}
