//! Study-advice collaborator.
//!
//! The analysis is handed over as an opaque `AnalysisPayload`; the provider
//! returns free text. `GroqAdvisor` talks to an OpenAI-compatible chat
//! completions endpoint; tests plug in their own `AdviceProvider`.

pub mod groq;
pub mod prompt;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AnalysisPayload;

pub use groq::{GroqAdvisor, DEFAULT_ADVICE_URL, MODELS};
pub use prompt::{build_data_block, build_system_prompt, truncate_prompt};

/// Advice generation errors. None of these are fatal: handlers turn them into a reply text.
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice API key is not configured")]
    MissingApiKey,

    #[error("model {model} unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("model {0} returned no content")]
    EmptyResponse(String),

    #[error("all advice models failed")]
    AllModelsFailed,
}

impl AdviceError {
    /// Text shown to the student instead of advice.
    pub fn user_message(&self) -> &'static str {
        match self {
            AdviceError::MissingApiKey => "⚠️ Chưa cấu hình API key cho trợ lý AI.",
            AdviceError::AllModelsFailed => "❌ Xin lỗi, hiện tại tất cả models AI đều không khả dụng. Vui lòng thử lại sau.",
            _ => "❌ Đã xảy ra lỗi khi xử lý yêu cầu. Vui lòng thử lại.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    pub study_data: AnalysisPayload,
    #[serde(default)]
    pub message: String,
    #[serde(default = "first_by_default")]
    pub is_first_interaction: bool,
}

fn first_by_default() -> bool {
    true
}

pub trait AdviceProvider: Send + Sync {
    fn advise<'a>(&'a self, request: &'a AdviceRequest) -> BoxFuture<'a, Result<String, AdviceError>>;
}
