use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use reclass_core::{Rule, Transaction};

use crate::store::MemoryStore;

/// Load the demo dataset: a handful of October 2025 transactions and two
/// rules exercising the weekend, amount, and account parts of the grammar.
pub fn seed_demo_data(store: &MemoryStore) {
    let transactions = [
        ("Walmart", 7550, "Checking", "Groceries"),
        // Saturday, under 80, Savings: the hardware rule should claim it.
        ("Walmart", 4500, "Savings", "Groceries"),
        ("Starbucks", 575, "Checking", "Food"),
        ("Home Depot", 12000, "Checking", "Home Improvement"),
        ("Shell", 5525, "Credit Card", "Gas"),
    ];
    let dates = [
        Utc.with_ymd_and_hms(2025, 10, 4, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 10, 4, 11, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 10, 3, 8, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 10, 2, 14, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 10, 5, 18, 0, 0).unwrap(),
    ];

    for ((merchant, cents, account, category), date) in transactions.into_iter().zip(dates) {
        store.add_transaction(Transaction::new(
            merchant,
            Decimal::new(cents, 2),
            date,
            account,
            Some(category.to_string()),
        ));
    }

    store.append_rule(Rule::new(
        r#"transaction.merchant === "Walmart" && isWeekend(transaction.date) && transaction.amount <= 80 && transaction.account === "Savings" -> "Hardware""#,
    ));
    store.append_rule(Rule::new(
        r#"transaction.merchant === "Starbucks" -> "Coffee""#,
    ));
}
