/// Shared kernel - error types and result aliases used across all layers
pub mod error;
pub mod result;

pub use result::Result;
