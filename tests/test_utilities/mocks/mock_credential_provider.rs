use async_trait::async_trait;
use eol_sync::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock CredentialProvider that hands out a fixed token or fails
#[derive(Default, Clone)]
pub struct MockCredentialProvider {
    pub should_fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for MockCredentialProvider {
    async fn credential(&self) -> Result<Credential> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(SyncError::Authentication {
                details: "token endpoint returned 401 Unauthorized".to_string(),
            }
            .into());
        }
        Ok(Credential::new("Bearer mock-token"))
    }
}
