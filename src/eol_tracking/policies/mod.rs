mod missing_relation;

pub use missing_relation::MissingRelationPolicy;
