use crate::shared::error::SyncError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Entity is one instance of a catalog blueprint
///
/// Only the fields the sync needs are modelled. Anything else the catalog
/// returns (title, blueprint, timestamps, team) is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    identifier: String,
    properties: Option<Map<String, Value>>,
    relations: Option<Map<String, Value>>,
}

impl Entity {
    pub fn new(
        identifier: impl Into<String>,
        properties: Map<String, Value>,
        relations: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            properties: Some(properties),
            relations,
        }
    }

    /// Builds an entity from one raw catalog record
    ///
    /// A `properties` or `relations` value that is not an object is treated as
    /// absent. Only a record without a usable identifier is rejected.
    ///
    /// # Errors
    /// `SyncError::DataShape` if the record is not an object or its
    /// `identifier` is missing, empty or not a string.
    pub fn from_value(value: &Value) -> Result<Self, SyncError> {
        let record = value.as_object().ok_or_else(|| SyncError::DataShape {
            entity: "entity record".to_string(),
            details: format!("expected an object, got {}", json_type(value)),
        })?;

        let identifier = match record.get("identifier") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            Some(other) => {
                return Err(SyncError::DataShape {
                    entity: "entity record".to_string(),
                    details: format!(
                        "identifier must be a non-empty string, got {}",
                        json_type(other)
                    ),
                })
            }
            None => {
                return Err(SyncError::DataShape {
                    entity: "entity record".to_string(),
                    details: "missing identifier".to_string(),
                })
            }
        };

        let object_field = |name: &str| record.get(name).and_then(Value::as_object).cloned();

        Ok(Self {
            identifier,
            properties: object_field("properties"),
            relations: object_field("relations"),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Reads a property as a non-negative integer count.
    ///
    /// Accepts integral floats (`2.0`) since the catalog stores numbers as JSON numbers.
    pub fn count_property(&self, name: &str) -> Option<u64> {
        let value = self.property(name)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
    }

    /// Normalizes a relation into a list of related identifiers
    ///
    /// # Returns
    /// - `None` when the relation key (or the whole relations map) is absent
    /// - `Some(vec![])` for an explicit `null`
    /// - `Some(vec![id])` for a single identifier
    /// - `Some(ids)` for a list; non-string elements are dropped
    pub fn related_identifiers(&self, relation: &str) -> Option<Vec<String>> {
        let value = self.relations.as_ref()?.get(relation)?;
        let ids = match value {
            Value::Null => Vec::new(),
            Value::String(id) => vec![id.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        Some(ids)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// EntityPatch is the partial-update body sent to the catalog
///
/// Patch semantics: only the listed properties change, and a property is
/// always set, never incremented, so resending the same patch is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityPatch {
    properties: Map<String, Value>,
}

impl EntityPatch {
    pub fn set_count(property: &str, count: usize) -> Self {
        let mut properties = Map::new();
        properties.insert(property.to_string(), Value::from(count));
        Self { properties }
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}
