use async_trait::async_trait;
use eol_sync::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A PATCH the mock received: blueprint, entity id, and JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPatch {
    pub blueprint: String,
    pub entity_id: String,
    pub body: Value,
}

/// In-memory catalog for testing
///
/// Patches are applied to the stored entities, so a second run sees the
/// values written by the first.
#[derive(Default, Clone)]
pub struct MockCatalogRepository {
    blueprints: Vec<String>,
    listing_fails: bool,
    entities: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    reported_counts: HashMap<String, usize>,
    fetch_failures: HashMap<String, u16>,
    patch_failures: HashMap<String, u16>,
    patches: Arc<Mutex<Vec<RecordedPatch>>>,
}

impl MockCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(mut self, blueprint: &str, entities: Vec<Value>) -> Self {
        self.add_blueprint(blueprint);
        self.entities
            .lock()
            .unwrap()
            .insert(blueprint.to_string(), entities);
        self
    }

    /// Fetching the blueprint fails with the given HTTP status
    pub fn with_fetch_failure(mut self, blueprint: &str, status: u16) -> Self {
        self.add_blueprint(blueprint);
        self.fetch_failures.insert(blueprint.to_string(), status);
        self
    }

    /// Patching the entity fails with the given HTTP status
    pub fn with_patch_failure(mut self, entity_id: &str, status: u16) -> Self {
        self.patch_failures.insert(entity_id.to_string(), status);
        self
    }

    pub fn with_reported_count(mut self, blueprint: &str, count: usize) -> Self {
        self.reported_counts.insert(blueprint.to_string(), count);
        self
    }

    pub fn with_listing_failure(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn patches(&self) -> Vec<RecordedPatch> {
        self.patches.lock().unwrap().clone()
    }

    pub fn stored_property(&self, blueprint: &str, entity_id: &str, property: &str) -> Option<Value> {
        let entities = self.entities.lock().unwrap();
        entities
            .get(blueprint)?
            .iter()
            .find(|e| e["identifier"] == entity_id)?
            .get("properties")?
            .get(property)
            .cloned()
    }

    fn add_blueprint(&mut self, blueprint: &str) {
        if !self.blueprints.iter().any(|b| b == blueprint) {
            self.blueprints.push(blueprint.to_string());
        }
    }

    fn status_error(status: u16, resource: String) -> anyhow::Error {
        let body = format!(r#"{{"ok":false,"status":{}}}"#, status);
        let error = match status {
            401 | 403 => SyncError::Authentication {
                details: format!("{} returned HTTP {}", resource, status),
            },
            404 => SyncError::NotFound { resource, body },
            422 => SyncError::Validation { resource, body },
            _ => SyncError::Transport {
                resource,
                details: format!("HTTP {}", status),
            },
        };
        error.into()
    }
}

#[async_trait]
impl CatalogRepository for MockCatalogRepository {
    async fn list_blueprints(&self, _credential: &Credential) -> Result<Vec<String>> {
        if self.listing_fails {
            return Err(Self::status_error(503, "GET /v1/blueprints".to_string()));
        }
        Ok(self.blueprints.clone())
    }

    async fn fetch_entities(&self, _credential: &Credential, blueprint: &str) -> Result<Vec<Value>> {
        if let Some(status) = self.fetch_failures.get(blueprint) {
            return Err(Self::status_error(
                *status,
                format!("GET /v1/blueprints/{}/entities", blueprint),
            ));
        }

        let entities = self.entities.lock().unwrap();
        Ok(entities.get(blueprint).cloned().unwrap_or_default())
    }

    async fn count_entities(&self, _credential: &Credential, blueprint: &str) -> Result<usize> {
        if let Some(count) = self.reported_counts.get(blueprint) {
            return Ok(*count);
        }
        let entities = self.entities.lock().unwrap();
        Ok(entities.get(blueprint).map_or(0, Vec::len))
    }

    async fn patch_entity(
        &self,
        _credential: &Credential,
        blueprint: &str,
        entity_id: &str,
        patch: &EntityPatch,
    ) -> Result<()> {
        if let Some(status) = self.patch_failures.get(entity_id) {
            return Err(Self::status_error(
                *status,
                format!("PATCH /v1/blueprints/{}/entities/{}", blueprint, entity_id),
            ));
        }

        let body = serde_json::to_value(patch)?;
        let mut entities = self.entities.lock().unwrap();
        let entity = entities
            .get_mut(blueprint)
            .and_then(|list| list.iter_mut().find(|e| e["identifier"] == entity_id))
            .ok_or_else(|| {
                Self::status_error(404, format!("entity '{}' in '{}'", entity_id, blueprint))
            })?;

        let properties = entity
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("entity is not an object"))?
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let (Some(target), Some(changes)) = (properties.as_object_mut(), body["properties"].as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }

        self.patches.lock().unwrap().push(RecordedPatch {
            blueprint: blueprint.to_string(),
            entity_id: entity_id.to_string(),
            body,
        });
        Ok(())
    }
}
