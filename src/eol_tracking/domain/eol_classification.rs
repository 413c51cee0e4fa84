use super::{FrameworkState, FrameworkTally};
use std::collections::{BTreeMap, BTreeSet};

/// Snapshot of framework lifecycle states taken at fetch time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EolClassification {
    states: BTreeMap<String, FrameworkState>,
}

impl EolClassification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a framework's state. A later record for the same identifier wins.
    pub fn insert(&mut self, identifier: impl Into<String>, state: FrameworkState) {
        self.states.insert(identifier.into(), state);
    }

    /// Unknown identifiers are not EOL.
    pub fn is_eol(&self, identifier: &str) -> bool {
        self.states
            .get(identifier)
            .map(FrameworkState::is_eol)
            .unwrap_or(false)
    }

    pub fn eol_identifiers(&self) -> BTreeSet<&str> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_eol())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Frameworks whose state was missing or unexpected, with the raw value if any
    pub fn unrecognized(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.states.iter().filter_map(|(id, state)| match state {
            FrameworkState::Unrecognized(raw) => Some((id.as_str(), raw.as_deref())),
            _ => None,
        })
    }

    pub fn tally(&self) -> FrameworkTally {
        let mut tally = FrameworkTally::default();
        for state in self.states.values() {
            match state {
                FrameworkState::Eol => tally.eol += 1,
                FrameworkState::Active => tally.active += 1,
                FrameworkState::Unrecognized(_) => tally.unrecognized += 1,
            }
        }
        tally
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
