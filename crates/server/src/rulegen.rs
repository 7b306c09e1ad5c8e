use serde::Deserialize;
use thiserror::Error;

/// Instructions pinning the text-generation service to the rule grammar.
/// The service must return a single `<condition> -> "Category"` line; the
/// handler still compile-checks whatever comes back.
const SYSTEM_PROMPT: &str = "\
You translate natural-language descriptions of transaction categorization \
rules into a single rule of the form: <condition> -> \"Category\". \
Conditions may use transaction.merchant, transaction.amount, \
transaction.date, transaction.account, transaction.category; the date \
helpers dayOfWeek(transaction.date), month(...), year(...), day(...), \
isWeekend(...), getWeekNumber(...); the comparison operators ===, !==, >, \
<, >=, <=; the logical operators && and || with parentheses; \
<string>.includes(\"substring\"); and /pattern/i.test(<string>). \
Respond with the rule only, no explanation and no code fences.";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("rule generator is not configured; set RECLASS_GENERATOR_URL and RECLASS_GENERATOR_KEY")]
    NotConfigured,
    #[error("generator request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generator returned an empty response")]
    EmptyResponse,
}

/// Natural-language-to-rule collaborator. The HTTP variant talks to an
/// OpenAI-compatible chat-completions endpoint; the canned variant exists
/// for tests and offline development.
pub enum RuleGenerator {
    Canned(String),
    Http(HttpRuleGenerator),
    Unconfigured,
}

impl RuleGenerator {
    /// Configure from `RECLASS_GENERATOR_URL` / `RECLASS_GENERATOR_KEY` /
    /// `RECLASS_GENERATOR_MODEL`. Missing configuration is not fatal at
    /// startup; the endpoint reports it per request.
    pub fn from_env() -> Self {
        match (
            std::env::var("RECLASS_GENERATOR_URL"),
            std::env::var("RECLASS_GENERATOR_KEY"),
        ) {
            (Ok(url), Ok(api_key)) => {
                let model = std::env::var("RECLASS_GENERATOR_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string());
                RuleGenerator::Http(HttpRuleGenerator::new(url, api_key, model))
            }
            _ => RuleGenerator::Unconfigured,
        }
    }

    pub async fn generate(&self, request: &str) -> Result<String, GeneratorError> {
        match self {
            RuleGenerator::Canned(rule) => Ok(rule.clone()),
            RuleGenerator::Http(http) => http.generate(request).await,
            RuleGenerator::Unconfigured => Err(GeneratorError::NotConfigured),
        }
    }
}

pub struct HttpRuleGenerator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl HttpRuleGenerator {
    pub fn new(url: String, api_key: String, model: String) -> Self {
        HttpRuleGenerator {
            client: reqwest::Client::new(),
            url,
            api_key,
            model,
        }
    }

    async fn generate(&self, request: &str) -> Result<String, GeneratorError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": request },
            ],
        });

        let response: ChatResponse = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GeneratorError::EmptyResponse)?;

        let rule = strip_code_fences(&content);
        if rule.is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }
        Ok(rule.to_string())
    }
}

/// Models wrap answers in markdown fences often enough that stripping one
/// layer here is cheaper than prompting harder.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop a language tag on the opening fence, if any.
    match inner.split_once('\n') {
        Some((first_line, rest)) if !first_line.contains("->") => rest.trim(),
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn canned_generator_returns_preset_rule() {
        let generator = RuleGenerator::Canned(r#"transaction.amount < 5 -> "Coffee""#.to_string());
        assert_eq!(
            generator.generate("cheap stuff is coffee").await.unwrap(),
            r#"transaction.amount < 5 -> "Coffee""#
        );
    }

    #[tokio::test]
    async fn unconfigured_generator_errors() {
        let generator = RuleGenerator::Unconfigured;
        assert!(matches!(
            generator.generate("anything").await,
            Err(GeneratorError::NotConfigured)
        ));
    }

    #[test]
    fn strips_plain_fences() {
        let fenced = "```\ntransaction.amount < 5 -> \"Coffee\"\n```";
        assert_eq!(strip_code_fences(fenced), r#"transaction.amount < 5 -> "Coffee""#);
    }

    #[test]
    fn strips_language_tagged_fences() {
        let fenced = "```text\ntransaction.amount < 5 -> \"Coffee\"\n```";
        assert_eq!(strip_code_fences(fenced), r#"transaction.amount < 5 -> "Coffee""#);
    }

    #[test]
    fn unfenced_content_passes_through() {
        assert_eq!(
            strip_code_fences("  transaction.amount < 5 -> \"Coffee\"  "),
            r#"transaction.amount < 5 -> "Coffee""#
        );
    }
}
