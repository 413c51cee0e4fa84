/// ProgressReporter port for reporting progress during a sync run
///
/// Progress goes to stderr in the console adapter so that stdout only
/// carries the final report.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress through a batch of updates
    ///
    /// # Arguments
    /// * `current` - Number of items processed so far
    /// * `total` - Total number of items
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
