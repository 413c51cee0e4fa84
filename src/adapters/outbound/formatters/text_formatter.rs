use crate::eol_tracking::domain::{
    ServiceOutcome, ServiceResult, SyncReport, TargetReport, TargetStatus,
};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use owo_colors::{OwoColorize, Style};
use std::fmt::Write;

/// TextReportFormatter adapter rendering a human-readable report
///
/// Colors are only emitted when `colored` is set (typically when stdout is a terminal).
pub struct TextReportFormatter {
    colored: bool,
}

impl TextReportFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_target(&self, out: &mut String, target: &TargetReport) -> std::fmt::Result {
        writeln!(
            out,
            "{} {} -> {} (relation '{}', property '{}')",
            self.paint(&format!("Target '{}':", target.name), Style::new().bold()),
            target.framework_blueprint,
            target.service_blueprint,
            target.relation,
            target.property
        )?;

        if let TargetStatus::Failed { kind, message } = &target.status {
            writeln!(
                out,
                "  {} {}: {}",
                self.paint("✘ target failed", Style::new().red().bold()),
                kind,
                first_line(message)
            )?;
        } else {
            writeln!(
                out,
                "  Frameworks: {} EOL, {} active, {} unrecognized",
                target.frameworks.eol, target.frameworks.active, target.frameworks.unrecognized
            )?;
            if !target.eol_frameworks.is_empty() {
                writeln!(out, "  EOL: {}", target.eol_frameworks.join(", "))?;
            }
        }

        for outcome in &target.services {
            self.write_service(out, outcome)?;
        }

        for warning in &target.warnings {
            writeln!(
                out,
                "  {} {}",
                self.paint("⚠", Style::new().yellow()),
                warning
            )?;
        }

        Ok(())
    }

    fn write_service(&self, out: &mut String, outcome: &ServiceOutcome) -> std::fmt::Result {
        let (marker, label, detail) = match &outcome.result {
            ServiceResult::Updated { count } => (
                self.paint("✔", Style::new().green()),
                "updated",
                count.to_string(),
            ),
            ServiceResult::Unchanged { count } => (
                self.paint("=", Style::new().dimmed()),
                "unchanged",
                count.to_string(),
            ),
            ServiceResult::Planned { count } => (
                self.paint("→", Style::new().cyan()),
                "planned",
                count.to_string(),
            ),
            ServiceResult::Skipped { reason } => (
                self.paint("↷", Style::new().yellow()),
                "skipped",
                reason.clone(),
            ),
            ServiceResult::Failed { kind, message } => (
                self.paint("✘", Style::new().red()),
                "failed",
                format!("{}: {}", kind, first_line(message)),
            ),
        };

        writeln!(
            out,
            "  {} {:<30} {:<9} {}",
            marker, outcome.service_id, label, detail
        )
    }
}

impl ReportFormatter for TextReportFormatter {
    fn format(&self, report: &SyncReport) -> Result<String> {
        let mut out = String::new();
        let mode = if report.dry_run { " [dry run]" } else { "" };

        writeln!(
            out,
            "{}{}",
            self.paint(
                &format!("EOL sync report (run {})", report.run_id),
                Style::new().bold()
            ),
            mode
        )?;

        for target in &report.targets {
            writeln!(out)?;
            self.write_target(&mut out, target)?;
        }

        let summary = report.summary();
        writeln!(out)?;
        writeln!(
            out,
            "Summary: {} target(s), {} failed | updated {}, unchanged {}, planned {}, skipped {}, failed {}",
            summary.targets,
            summary.failed_targets,
            summary.updated,
            summary.unchanged,
            summary.planned,
            summary.skipped,
            summary.failed
        )?;

        Ok(out)
    }
}

/// Error messages carry multi-line hints; the table shows only the headline.
fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
