use crate::shared::Result;
use async_trait::async_trait;
use std::fmt;

/// Credential is a ready-to-send `Authorization` header value
///
/// The value is never printed; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(header_value: impl Into<String>) -> Self {
        Self(header_value.into())
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// CredentialProvider port for obtaining a bearer credential
///
/// Called once at the start of a run. Any failure is fatal for the run.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Produces the credential for all subsequent catalog requests
    ///
    /// # Errors
    /// Returns `SyncError::Authentication` if the token is empty, the token
    /// endpoint is unreachable, or the endpoint rejects the client
    async fn credential(&self) -> Result<Credential>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("Bearer secret-token");
        let debug = format!("{:?}", credential);
        assert_eq!(debug, "Credential(***)");
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_header_value() {
        let credential = Credential::new("Bearer abc");
        assert_eq!(credential.header_value(), "Bearer abc");
    }
}
