/// Report formatters for the supported output formats
mod json_formatter;
mod text_formatter;

pub use json_formatter::JsonReportFormatter;
pub use text_formatter::TextReportFormatter;
