use crate::adapters::outbound::formatters::{JsonReportFormatter, TextReportFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// Selects the formatter adapter for the requested output format.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Arguments
    /// * `format` - The output format to create a formatter for
    /// * `colored` - Whether the text formatter may emit ANSI colors
    ///
    /// # Examples
    /// ```
    /// use eol_sync::application::dto::OutputFormat;
    /// use eol_sync::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json, false);
    /// ```
    pub fn create(format: OutputFormat, colored: bool) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Text => Box::new(TextReportFormatter::new(colored)),
            OutputFormat::Json => Box::new(JsonReportFormatter::new()),
        }
    }

    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Text => "📝 Rendering text report...",
            OutputFormat::Json => "📝 Rendering JSON report...",
        }
    }
}
