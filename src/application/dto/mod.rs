/// Data Transfer Objects for application layer
///
/// DTOs carry data between the inbound CLI and the use case,
/// keeping the domain layer isolated.
mod output_format;
mod sync_request;

pub use output_format::OutputFormat;
pub use sync_request::SyncRequest;
