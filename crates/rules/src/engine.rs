use reclass_core::{Rule, Transaction};

use crate::evaluator::RuleEvaluator;

/// Outcome of a reapply pass: how many transactions actually changed
/// category, not how many matched a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapplySummary {
    pub updated: usize,
}

/// Re-categorize every transaction against the rule set.
///
/// Transactions are visited in their stored order, and for each one the
/// rules are scanned in their stored order; the first rule that matches
/// wins and the scan stops, even when its target equals the current
/// category. Rules that are malformed or fail to compile match nothing and
/// are skipped. Running the pass twice with no intervening changes updates
/// zero transactions.
pub fn reapply_all(
    evaluator: &RuleEvaluator,
    transactions: &mut [Transaction],
    rules: &[Rule],
) -> ReapplySummary {
    let mut updated = 0;

    for tx in transactions.iter_mut() {
        for rule in rules {
            if !evaluator.evaluate(tx, rule) {
                continue;
            }
            if let Ok(parts) = rule.parts() {
                if tx.category != parts.category {
                    tx.category = parts.category.to_string();
                    updated += 1;
                }
            }
            break;
        }
    }

    tracing::info!(updated, total = transactions.len(), "reapplied rules");
    ReapplySummary { updated }
}
