mod eol_classifier;
mod eol_counter;

pub use eol_classifier::EolClassifier;
pub use eol_counter::{CountDecision, EolCounter};
