use reclass_core::{Rule, Transaction};

use crate::cache::PredicateCache;

/// Public entry point for rule matching. Owns the predicate cache and
/// absorbs the whole failure taxonomy: a malformed rule, a condition that
/// does not compile, and a runtime evaluation fault all come back as
/// "no match". A broken rule never blocks the batch; it simply matches
/// nothing until its source text is corrected.
#[derive(Debug, Default)]
pub struct RuleEvaluator {
    cache: PredicateCache,
}

impl RuleEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Does `rule` match `transaction`? Never panics, never mutates the
    /// transaction; failures are logged as data-quality conditions.
    pub fn evaluate(&self, transaction: &Transaction, rule: &Rule) -> bool {
        let parts = match rule.parts() {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(rule = %rule.id, "skipping malformed rule: {e}");
                return false;
            }
        };

        let predicate = match self.cache.get_or_compile(parts.condition) {
            Ok(predicate) => predicate,
            Err(e) => {
                tracing::warn!(rule = %rule.id, "condition does not compile: {e}");
                return false;
            }
        };

        match predicate.matches(transaction) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::debug!(
                    rule = %rule.id,
                    transaction = %transaction.id,
                    "evaluation fault treated as no match: {e}"
                );
                false
            }
        }
    }

    /// Number of distinct conditions compiled so far.
    pub fn cached_conditions(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(merchant: &str, amount: &str) -> Transaction {
        Transaction::new(
            merchant,
            amount.parse().unwrap(),
            // Saturday
            Utc.with_ymd_and_hms(2025, 10, 4, 10, 0, 0).unwrap(),
            "Checking",
            Some("Groceries".to_string()),
        )
    }

    #[test]
    fn matching_rule_evaluates_true() {
        let evaluator = RuleEvaluator::new();
        let rule = Rule::new(
            r#"transaction.merchant === "Walmart" && transaction.amount < 80 -> "Hardware""#,
        );
        assert!(evaluator.evaluate(&tx("Walmart", "45.00"), &rule));
        assert!(!evaluator.evaluate(&tx("Walmart", "95.00"), &rule));
    }

    #[test]
    fn missing_arrow_never_matches() {
        let evaluator = RuleEvaluator::new();
        let rule = Rule::new(r#"transaction.merchant === "Walmart" "No Arrow""#);
        assert!(!evaluator.evaluate(&tx("Walmart", "45.00"), &rule));
    }

    #[test]
    fn double_arrow_never_matches() {
        let evaluator = RuleEvaluator::new();
        let rule = Rule::new(r#"transaction.amount < 5 -> "A" -> "B""#);
        assert!(!evaluator.evaluate(&tx("Walmart", "1.00"), &rule));
    }

    #[test]
    fn empty_definition_never_matches() {
        let evaluator = RuleEvaluator::new();
        assert!(!evaluator.evaluate(&tx("Walmart", "1.00"), &Rule::new("")));
    }

    #[test]
    fn non_compiling_condition_never_matches_and_is_not_cached() {
        let evaluator = RuleEvaluator::new();
        let rule = Rule::new(r#"transaction.merchant.nonExistentMethod() -> "X""#);
        assert!(!evaluator.evaluate(&tx("Walmart", "1.00"), &rule));
        assert_eq!(evaluator.cached_conditions(), 0);
    }

    #[test]
    fn evaluation_fault_is_a_non_match_not_a_panic() {
        let evaluator = RuleEvaluator::new();
        // Compiles fine, faults at runtime: ordering on a string field.
        let rule = Rule::new(r#"transaction.merchant > 5 -> "X""#);
        assert!(!evaluator.evaluate(&tx("Walmart", "1.00"), &rule));
        // The compiled predicate stays cached; the fault is per-transaction.
        assert_eq!(evaluator.cached_conditions(), 1);
    }

    #[test]
    fn repeated_evaluation_compiles_once() {
        let evaluator = RuleEvaluator::new();
        let rule = Rule::new(r#"isWeekend(transaction.date) -> "Weekend""#);
        for _ in 0..3 {
            assert!(evaluator.evaluate(&tx("Shell", "20.00"), &rule));
        }
        assert_eq!(evaluator.cached_conditions(), 1);
    }
}
