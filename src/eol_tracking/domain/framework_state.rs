use serde_json::Value;

/// Lifecycle state of a framework entity, read from its `state` property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameworkState {
    Eol,
    Active,
    /// Missing, empty, or an unexpected value. Never counted as EOL.
    Unrecognized(Option<String>),
}

impl FrameworkState {
    pub const PROPERTY: &'static str = "state";
    const EOL_LABEL: &'static str = "EOL";
    const ACTIVE_LABEL: &'static str = "Active";

    /// Classifies a raw `state` property value
    ///
    /// A non-empty list is unwrapped to its first element (multi-select
    /// properties). Comparison is case-sensitive.
    pub fn from_property(value: Option<&Value>) -> Self {
        let value = match value {
            Some(Value::Array(items)) => items.first(),
            other => other,
        };

        match value {
            Some(Value::String(s)) if s == Self::EOL_LABEL => FrameworkState::Eol,
            Some(Value::String(s)) if s == Self::ACTIVE_LABEL => FrameworkState::Active,
            Some(Value::String(s)) => FrameworkState::Unrecognized(Some(s.clone())),
            None | Some(Value::Null) => FrameworkState::Unrecognized(None),
            Some(other) => FrameworkState::Unrecognized(Some(other.to_string())),
        }
    }

    pub fn is_eol(&self) -> bool {
        matches!(self, FrameworkState::Eol)
    }
}
