use crate::eol_tracking::domain::EntityPatch;
use crate::ports::outbound::Credential;
use crate::shared::Result;
use async_trait::async_trait;
use serde_json::Value;

/// CatalogRepository port for reading and patching catalog entities
///
/// Errors are `SyncError` values wrapped in `anyhow::Error`, so callers can
/// recover the failure kind with `SyncError::kind_of`.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Lists the identifiers of all blueprints visible to the credential
    async fn list_blueprints(&self, credential: &Credential) -> Result<Vec<String>>;

    /// Fetches every entity record of a blueprint, in the order the catalog returns them
    ///
    /// Records are returned raw so that one malformed entity can be rejected
    /// on its own (see `Entity::from_value`) without losing the rest.
    ///
    /// # Errors
    /// - `SyncError::NotFound` if the blueprint does not exist
    /// - `SyncError::Validation` if the catalog rejects the request
    /// - `SyncError::Authentication` if the credential is rejected
    /// - `SyncError::Transport` for network failures and other statuses
    async fn fetch_entities(&self, credential: &Credential, blueprint: &str)
        -> Result<Vec<Value>>;

    /// Returns the number of entities the catalog holds for a blueprint
    async fn count_entities(&self, credential: &Credential, blueprint: &str) -> Result<usize>;

    /// Applies a partial update to one entity
    async fn patch_entity(
        &self,
        credential: &Credential,
        blueprint: &str,
        entity_id: &str,
        patch: &EntityPatch,
    ) -> Result<()>;
}
