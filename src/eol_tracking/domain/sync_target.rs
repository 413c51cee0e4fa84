use crate::shared::Result;

/// Maximum length for blueprint, relation, and property names (security limit)
const MAX_NAME_LENGTH: usize = 255;

/// SyncTarget is the contract for one framework/service pairing
///
/// It pins exactly one relation name and one property name. Historical
/// variants (`used_frameworks`, `Number of EOL packages`) are only honoured
/// when configured explicitly as their own target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    name: String,
    framework_blueprint: String,
    service_blueprint: String,
    relation: String,
    property: String,
}

impl SyncTarget {
    pub const DEFAULT_NAME: &'static str = "default";
    pub const DEFAULT_FRAMEWORK_BLUEPRINT: &'static str = "framework";
    pub const DEFAULT_SERVICE_BLUEPRINT: &'static str = "service";
    pub const DEFAULT_RELATION: &'static str = "framework";
    pub const DEFAULT_PROPERTY: &'static str = "number_of_eol_packages";

    pub fn new(
        name: String,
        framework_blueprint: String,
        service_blueprint: String,
        relation: String,
        property: String,
    ) -> Result<Self> {
        validate_name(&name, "Target name")?;
        validate_name(&framework_blueprint, "Framework blueprint")?;
        validate_name(&service_blueprint, "Service blueprint")?;
        validate_name(&relation, "Relation name")?;
        validate_name(&property, "Property name")?;

        Ok(Self {
            name,
            framework_blueprint,
            service_blueprint,
            relation,
            property,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn framework_blueprint(&self) -> &str {
        &self.framework_blueprint
    }

    pub fn service_blueprint(&self) -> &str {
        &self.service_blueprint
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

impl Default for SyncTarget {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            framework_blueprint: Self::DEFAULT_FRAMEWORK_BLUEPRINT.to_string(),
            service_blueprint: Self::DEFAULT_SERVICE_BLUEPRINT.to_string(),
            relation: Self::DEFAULT_RELATION.to_string(),
            property: Self::DEFAULT_PROPERTY.to_string(),
        }
    }
}

fn validate_name(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }

    if value.len() > MAX_NAME_LENGTH {
        anyhow::bail!(
            "{} is too long ({} bytes). Maximum allowed: {} bytes",
            label,
            value.len(),
            MAX_NAME_LENGTH
        );
    }

    if value.chars().any(char::is_control) {
        anyhow::bail!("{} contains control characters", label);
    }

    Ok(())
}
