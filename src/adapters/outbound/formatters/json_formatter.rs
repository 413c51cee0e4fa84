use crate::eol_tracking::domain::{SyncReport, SyncSummary};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a SyncReport,
    summary: SyncSummary,
}

/// JsonReportFormatter adapter rendering the report as pretty-printed JSON
///
/// The document is the serialized `SyncReport` plus a `summary` object.
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format(&self, report: &SyncReport) -> Result<String> {
        let document = JsonReport {
            report,
            summary: report.summary(),
        };
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        Ok(json)
    }
}
