/// MissingRelationPolicy decides what happens to a service whose framework
/// relation is absent altogether
///
/// An explicit `null` or empty list is not "missing": those services always
/// get a count of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingRelationPolicy {
    /// Treat the related set as empty and write 0
    #[default]
    CountAsZero,
    /// Leave the service untouched and record it as skipped
    Skip,
}

impl std::str::FromStr for MissingRelationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count-as-zero" | "zero" => Ok(MissingRelationPolicy::CountAsZero),
            "skip" => Ok(MissingRelationPolicy::Skip),
            _ => Err(format!(
                "Invalid missing-relation policy: {}. Please specify 'count-as-zero' or 'skip'",
                s
            )),
        }
    }
}

impl std::fmt::Display for MissingRelationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingRelationPolicy::CountAsZero => write!(f, "count-as-zero"),
            MissingRelationPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_is_count_as_zero() {
        assert_eq!(
            MissingRelationPolicy::default(),
            MissingRelationPolicy::CountAsZero
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            MissingRelationPolicy::from_str("count-as-zero").unwrap(),
            MissingRelationPolicy::CountAsZero
        );
        assert_eq!(
            MissingRelationPolicy::from_str("ZERO").unwrap(),
            MissingRelationPolicy::CountAsZero
        );
        assert_eq!(
            MissingRelationPolicy::from_str("Skip").unwrap(),
            MissingRelationPolicy::Skip
        );
    }

    #[test]
    fn test_from_str_invalid() {
        let err = MissingRelationPolicy::from_str("ignore").unwrap_err();
        assert!(err.contains("Invalid missing-relation policy"));
        assert!(err.contains("ignore"));
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [MissingRelationPolicy::CountAsZero, MissingRelationPolicy::Skip] {
            assert_eq!(
                MissingRelationPolicy::from_str(&policy.to_string()).unwrap(),
                policy
            );
        }
    }
}
