//! Groq chat-completions client with model fallback.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::prompt::{build_system_prompt, truncate_prompt};
use super::{AdviceError, AdviceProvider, AdviceRequest};

pub const DEFAULT_ADVICE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const USER_AGENT: &str = "StudyMate-Advisor/0.1";
const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 600;

/// Models tried in order until one answers.
pub const MODELS: &[&str] = &[
    "meta-llama/llama-4-scout-17b-16e-instruct",
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "gemma2-9b-it",
];

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Error bodies that mean "this model cannot serve us right now".
fn is_model_unavailable(body: &str) -> bool {
    body.contains("decommissioned")
        || (body.contains("model") && body.contains("not") && body.contains("found"))
        || body.contains("Request too large")
        || body.contains("rate_limit_exceeded")
}

pub struct GroqAdvisor {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    models: Vec<String>,
}

impl GroqAdvisor {
    pub fn new(api_key: Option<String>, endpoint: impl Into<String>) -> Result<Self, AdviceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AdviceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.into(),
            models: MODELS.iter().map(|m| m.to_string()).collect(),
        })
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_model(&self, api_key: &str, model: &str, system: &str, message: &str) -> Result<String, AdviceError> {
        let payload = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": message},
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "stream": false,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AdviceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_model_unavailable(&body) {
                return Err(AdviceError::ModelUnavailable { model: model.to_string(), reason: status.to_string() });
            }
            return Err(AdviceError::Network(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| AdviceError::Network(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AdviceError::EmptyResponse(model.to_string()))
    }

    /// Build the prompt and walk the model list.
    pub async fn generate(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        let api_key = self.api_key.as_deref().ok_or(AdviceError::MissingApiKey)?;

        let system = build_system_prompt(&request.study_data, request.is_first_interaction);
        let (system, message) = truncate_prompt(&system, &request.message);

        for model in &self.models {
            match self.try_model(api_key, model, &system, &message).await {
                Ok(reply) => {
                    debug!(%model, "advice generated");
                    return Ok(reply);
                }
                Err(e) => {
                    warn!(%model, error = %e, "advice model failed, trying next");
                }
            }
        }
        Err(AdviceError::AllModelsFailed)
    }
}

impl AdviceProvider for GroqAdvisor {
    fn advise<'a>(&'a self, request: &'a AdviceRequest) -> BoxFuture<'a, Result<String, AdviceError>> {
        Box::pin(self.generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisPayload, ReconciliationSummary};

    fn request() -> AdviceRequest {
        AdviceRequest {
            study_data: AnalysisPayload {
                student_id: "2180601234".into(),
                program_code: String::new(),
                department: "Công nghệ thông tin".into(),
                academic_year: "2021".into(),
                total_credits_required: None,
                non_accumulated_credits_required: None,
                curriculum_found: true,
                total_subjects: 0,
                grades: Vec::new(),
                summary: ReconciliationSummary::default(),
                elective_groups: Vec::new(),
                generated_at: chrono::Utc::now(),
            },
            message: "Em nên học gì tiếp?".into(),
            is_first_interaction: true,
        }
    }

    #[test]
    fn unavailable_bodies_are_recognised() {
        assert!(is_model_unavailable(r#"{"error":{"code":"model_decommissioned","message":"decommissioned"}}"#));
        assert!(is_model_unavailable("The model `x` does not exist or was not found"));
        assert!(is_model_unavailable("rate_limit_exceeded"));
        assert!(!is_model_unavailable("internal error"));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let advisor = GroqAdvisor::new(Some("   ".into()), "http://127.0.0.1:9/unused").unwrap();
        assert!(!advisor.has_api_key());
        assert!(matches!(advisor.generate(&request()).await, Err(AdviceError::MissingApiKey)));
    }

    #[tokio::test]
    async fn no_models_means_all_failed() {
        let advisor = GroqAdvisor::new(Some("key".into()), "http://127.0.0.1:9/unused").unwrap().with_models(Vec::new());
        assert!(matches!(advisor.generate(&request()).await, Err(AdviceError::AllModelsFailed)));
    }
}
