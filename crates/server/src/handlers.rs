use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reclass_core::{split_definition, Rule, Transaction};
use reclass_rules::{compile, reapply_all};

use crate::rulegen::GeneratorError;
use crate::state::AppState;

/// Error body shape shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
}

type ErrorResponse = (StatusCode, Json<ApiError>);

fn error(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (
        status,
        Json(ApiError {
            message: message.into(),
        }),
    )
}

// ── Transactions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub merchant: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub account: String,
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.store.list_transactions())
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(input): Json<TransactionInput>,
) -> (StatusCode, Json<Transaction>) {
    let transaction = Transaction::new(
        input.merchant,
        input.amount,
        input.date,
        input.account,
        input.category,
    );
    state.store.add_transaction(transaction.clone());
    (StatusCode::CREATED, Json(transaction))
}

// ── Rules ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    pub rule_definition: String,
}

pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.store.list_rules())
}

/// Authoring is where rule mistakes surface: a definition that is
/// structurally invalid or whose condition does not compile is rejected
/// here with the diagnostic, instead of being stored as a rule that can
/// never match.
pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<RuleInput>,
) -> Result<(StatusCode, Json<Rule>), ErrorResponse> {
    let parts = split_definition(&input.rule_definition)
        .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    compile(parts.condition).map_err(|e| {
        error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("condition does not compile: {e}"),
        )
    })?;

    let rule = Rule::new(input.rule_definition);
    state.store.append_rule(rule.clone());
    Ok((StatusCode::CREATED, Json(rule)))
}

// ── Reapply ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReapplyResponse {
    pub updated_count: usize,
    pub message: String,
}

pub async fn reapply_rules(State(state): State<AppState>) -> Json<ReapplyResponse> {
    let rules = state.store.list_rules();
    let mut transactions = state.store.list_transactions();
    let summary = reapply_all(&state.evaluator, &mut transactions, &rules);

    for transaction in &transactions {
        state.store.save_transaction(transaction);
    }

    Json(ReapplyResponse {
        updated_count: summary.updated,
        message: format!("Re-categorized {} transactions.", summary.updated),
    })
}

// ── Rule generation ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDslInput {
    #[serde(default)]
    pub natural_language_text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateDslResponse {
    pub dsl: String,
}

/// Forward a natural-language description to the generation collaborator
/// and hand back the rule text. The only validation applied to the result
/// is whether it compiles; where the text came from is not the core's
/// concern.
pub async fn generate_dsl(
    State(state): State<AppState>,
    Json(input): Json<GenerateDslInput>,
) -> Result<Json<GenerateDslResponse>, ErrorResponse> {
    let text = input.natural_language_text.trim();
    if text.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Missing naturalLanguageText in request body.",
        ));
    }

    let dsl = state.generator.generate(text).await.map_err(|e| match e {
        GeneratorError::NotConfigured => error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        _ => error(StatusCode::BAD_GATEWAY, e.to_string()),
    })?;

    let parts = split_definition(&dsl).map_err(|e| {
        error(
            StatusCode::BAD_GATEWAY,
            format!("generator returned a malformed rule: {e}"),
        )
    })?;
    compile(parts.condition).map_err(|e| {
        error(
            StatusCode::BAD_GATEWAY,
            format!("generator returned a rule that does not compile: {e}"),
        )
    })?;

    Ok(Json(GenerateDslResponse { dsl }))
}
