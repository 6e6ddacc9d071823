use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use super::{Classifier, ClassifyError};
use crate::consts::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::model::{Category, Classification};
use crate::prompts::build_classify_system_prompt;

const SCHEMA_NAME: &str = "Classification";

/// Connection settings for the OpenAI Chat Completions API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub system_prompt: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            system_prompt: build_classify_system_prompt(),
        }
    }
}

/// A classifier that asks an OpenAI chat model for a structured answer.
///
/// The request carries a strict JSON schema so the reply must contain
/// exactly `category` (one of the six labels) and `explanation`. The reply
/// is still deserialized into [`Classification`], so a label outside the
/// closed set is rejected rather than trusted.
pub struct OpenAiClassifier {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiClassifier {
    pub fn new(config: OpenAiConfig) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request<'a>(&'a self, text: &'a str) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            response_format: response_format(),
        }
    }

    fn parse_response(resp: ApiResponse) -> Result<Classification, ClassifyError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::Malformed("response has no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal
            && !refusal.is_empty()
        {
            return Err(ClassifyError::Refused(refusal));
        }

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ClassifyError::Malformed("response has no content".to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ClassifyError::Malformed(format!("{e}; raw: {content}")))
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyInput);
        }

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(text))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| ClassifyError::Malformed(e.to_string()))?;

        if let Some(usage) = &api_resp.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "classification usage"
            );
        }

        Self::parse_response(api_resp)
    }
}

/// Strict JSON schema constraining the reply to the two fields.
fn response_format() -> Value {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "category": { "type": "string", "enum": labels },
                    "explanation": { "type": "string" }
                },
                "required": ["category", "explanation"],
                "additionalProperties": false
            }
        }
    })
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    response_format: Value,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
