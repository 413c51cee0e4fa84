/// Application layer - Use cases and DTOs
///
/// This layer orchestrates the EOL tracking domain and coordinates
/// with the catalog, credentials and console through ports.
pub mod dto;
pub mod factories;
pub mod use_cases;
