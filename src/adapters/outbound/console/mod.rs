/// Console adapters for progress output
mod progress_reporter;

pub use progress_reporter::StderrProgressReporter;
