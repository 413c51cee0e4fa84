use crate::eol_tracking::domain::{Entity, EolClassification, FrameworkState};

/// EolClassifier partitions framework entities into EOL and not-EOL
///
/// Classification is a pure function of each entity's `state` property.
/// Unrecognized states are kept in the result so callers can warn about them,
/// but they never count as EOL.
pub struct EolClassifier;

impl EolClassifier {
    pub fn classify(frameworks: &[Entity]) -> EolClassification {
        let mut classification = EolClassification::new();
        for framework in frameworks {
            let state = FrameworkState::from_property(framework.property(FrameworkState::PROPERTY));
            classification.insert(framework.identifier(), state);
        }
        classification
    }
}
