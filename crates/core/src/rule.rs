use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A stored categorization rule. `rule_definition` holds the full source text
/// `<condition> -> <quoted-category>`; `new_category` is the target category
/// duplicated out of the definition at creation time, `None` when the
/// definition is structurally invalid. Rules are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub rule_definition: String,
    pub new_category: Option<String>,
}

impl Rule {
    pub fn new(definition: impl Into<String>) -> Self {
        let rule_definition = definition.into();
        let new_category = split_definition(&rule_definition)
            .ok()
            .map(|parts| parts.category.to_string());
        Rule {
            id: Uuid::new_v4().to_string(),
            rule_definition,
            new_category,
        }
    }

    /// Condition and target category of this rule, re-derived from the
    /// definition text.
    pub fn parts(&self) -> Result<RuleParts<'_>, RuleFormatError> {
        split_definition(&self.rule_definition)
    }
}

/// The two halves of a rule definition: the condition text before the arrow
/// and the target category after it, quotes stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleParts<'a> {
    pub condition: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleFormatError {
    #[error("rule definition is empty")]
    Empty,
    #[error("expected exactly one `->` separator, found {0}")]
    ArrowCount(usize),
    #[error("missing condition before `->`")]
    MissingCondition,
    #[error("missing category after `->`")]
    MissingCategory,
}

/// Split a rule definition on the arrow token. Exactly one `->` must be
/// present, with non-empty text on both sides. One layer of surrounding
/// double quotes is stripped from the category; their absence is tolerated.
pub fn split_definition(definition: &str) -> Result<RuleParts<'_>, RuleFormatError> {
    if definition.trim().is_empty() {
        return Err(RuleFormatError::Empty);
    }

    let parts: Vec<&str> = definition.split("->").collect();
    if parts.len() != 2 {
        return Err(RuleFormatError::ArrowCount(parts.len() - 1));
    }

    let condition = parts[0].trim();
    if condition.is_empty() {
        return Err(RuleFormatError::MissingCondition);
    }

    let category = strip_quotes(parts[1].trim());
    if category.is_empty() {
        return Err(RuleFormatError::MissingCategory);
    }

    Ok(RuleParts { condition, category })
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}
