use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned to freshly ingested transactions until a rule claims them.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A bank transaction as the rule engine sees it. `category` is the only
/// field mutated after ingestion, and only by the categorization engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub merchant: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub account: String,
    pub category: String,
}

impl Transaction {
    pub fn new(
        merchant: impl Into<String>,
        amount: Decimal,
        date: DateTime<Utc>,
        account: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            merchant: merchant.into(),
            amount,
            date,
            account: account.into(),
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        }
    }
}
