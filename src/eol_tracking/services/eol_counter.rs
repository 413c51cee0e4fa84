use crate::eol_tracking::domain::{Entity, EolClassification};
use crate::eol_tracking::policies::MissingRelationPolicy;
use std::collections::BTreeSet;

/// What to do with one service after counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountDecision {
    Count(usize),
    Skip(String),
}

/// EolCounter computes the number of EOL frameworks a service relates to
pub struct EolCounter;

impl EolCounter {
    /// Counts distinct related identifiers that are classified EOL
    pub fn count_related(related: &[String], classification: &EolClassification) -> usize {
        related
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .filter(|id| classification.is_eol(id))
            .count()
    }

    /// Counts EOL frameworks for a service, applying the missing-relation policy
    ///
    /// # Arguments
    /// * `service` - The service entity
    /// * `relation` - Name of the service's framework relation
    /// * `classification` - EOL snapshot of the framework blueprint
    /// * `policy` - What to do when the relation is absent
    pub fn decide(
        service: &Entity,
        relation: &str,
        classification: &EolClassification,
        policy: MissingRelationPolicy,
    ) -> CountDecision {
        match service.related_identifiers(relation) {
            Some(related) => CountDecision::Count(Self::count_related(&related, classification)),
            None => match policy {
                MissingRelationPolicy::CountAsZero => CountDecision::Count(0),
                MissingRelationPolicy::Skip => {
                    CountDecision::Skip(format!("relation '{}' is not set", relation))
                }
            },
        }
    }
}
