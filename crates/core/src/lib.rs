pub mod rule;
pub mod transaction;

pub use rule::{split_definition, Rule, RuleFormatError, RuleParts};
pub use transaction::{Transaction, DEFAULT_CATEGORY};
