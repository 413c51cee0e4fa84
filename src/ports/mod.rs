/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) describe the infrastructure the sync
/// use case depends on.
pub mod outbound;
