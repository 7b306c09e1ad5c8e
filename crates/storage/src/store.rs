use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use reclass_core::{Rule, Transaction};

/// In-memory store for transactions and rules. Both sequences keep their
/// insertion order; the rule engine relies on stored order for
/// first-match-wins semantics and never reorders anything here.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
    rules: RwLock<Vec<Rule>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.read_transactions().clone()
    }

    pub fn add_transaction(&self, transaction: Transaction) {
        self.write_transactions().push(transaction);
    }

    /// Write back a mutated transaction by id. Returns false when the id is
    /// unknown, which the caller treats as a data-quality condition.
    pub fn save_transaction(&self, transaction: &Transaction) -> bool {
        let mut transactions = self.write_transactions();
        match transactions.iter_mut().find(|t| t.id == transaction.id) {
            Some(stored) => {
                *stored = transaction.clone();
                true
            }
            None => false,
        }
    }

    pub fn list_rules(&self) -> Vec<Rule> {
        self.read_rules().clone()
    }

    /// Rules are append-only; there is no update or delete.
    pub fn append_rule(&self, rule: Rule) {
        self.rules
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(rule);
    }

    fn read_transactions(&self) -> RwLockReadGuard<'_, Vec<Transaction>> {
        self.transactions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_transactions(&self) -> RwLockWriteGuard<'_, Vec<Transaction>> {
        self.transactions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_rules(&self) -> RwLockReadGuard<'_, Vec<Rule>> {
        self.rules
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn tx(merchant: &str) -> Transaction {
        Transaction::new(
            merchant,
            Decimal::new(1000, 2),
            Utc.with_ymd_and_hms(2025, 10, 4, 10, 0, 0).unwrap(),
            "Checking",
            None,
        )
    }

    #[test]
    fn transactions_keep_insertion_order() {
        let store = MemoryStore::new();
        store.add_transaction(tx("First"));
        store.add_transaction(tx("Second"));
        store.add_transaction(tx("Third"));

        let merchants: Vec<String> = store
            .list_transactions()
            .into_iter()
            .map(|t| t.merchant)
            .collect();
        assert_eq!(merchants, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn save_replaces_by_id() {
        let store = MemoryStore::new();
        let mut t = tx("Walmart");
        store.add_transaction(t.clone());

        t.category = "Hardware".to_string();
        assert!(store.save_transaction(&t));
        assert_eq!(store.list_transactions()[0].category, "Hardware");
    }

    #[test]
    fn save_unknown_id_reports_false() {
        let store = MemoryStore::new();
        store.add_transaction(tx("Walmart"));
        assert!(!store.save_transaction(&tx("Stranger")));
    }

    #[test]
    fn rules_keep_append_order() {
        let store = MemoryStore::new();
        store.append_rule(Rule::new(r#"transaction.amount < 5 -> "A""#));
        store.append_rule(Rule::new(r#"transaction.amount < 50 -> "B""#));

        let categories: Vec<Option<String>> = store
            .list_rules()
            .into_iter()
            .map(|r| r.new_category)
            .collect();
        assert_eq!(
            categories,
            vec![Some("A".to_string()), Some("B".to_string())]
        );
    }
}
