/// LLM Client — the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions go through `CompletionProvider`.
///
/// Endpoint and model come from `Config`; both are fixed for the life of the process.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::generation::prompts::{
    build_cover_letter_prompt, build_job_analysis_prompt, build_translation_prompt,
};
use crate::session::Language;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Rate limits, server errors and transport failures may succeed on a later attempt.
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::EmptyContent => false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A text-completion backend. One prompt in, one completion out.
///
/// Carried by the orchestrator as `Arc<dyn CompletionProvider>`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Structured breakdown of a job description.
    async fn analyze_job(&self, job_description: &str) -> Result<String, LlmError> {
        self.complete(&build_job_analysis_prompt(job_description))
            .await
    }

    /// Personalised cover letter in English.
    async fn generate_cover_letter(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<String, LlmError> {
        self.complete(&build_cover_letter_prompt(job_description, resume_text))
            .await
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String, LlmError> {
        self.complete(&build_translation_prompt(text, target)).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, trimmed. `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completion client for the hosted model.
/// Makes `max_attempts` tries at most; the default configuration is a single attempt.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_attempts: u32,
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.llm_api_url.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
            max_attempts: config.llm_max_attempts.max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call_once(&self, request_body: &ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ChatResponse>().await?)
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.call_once(&request_body).await {
                Ok(response) => {
                    if let Some(usage) = &response.usage {
                        debug!(
                            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                            usage.prompt_tokens, usage.completion_tokens
                        );
                    }
                    return response
                        .text()
                        .map(str::to_string)
                        .ok_or(LlmError::EmptyContent);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    // Exponential backoff: 1s, 2s, 4s
                    let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                    warn!(
                        "LLM call attempt {attempt} failed ({e}), retrying after {}ms...",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_response_text_takes_first_choice_trimmed() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  Dear Hiring Manager,\n\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Dear Hiring Manager,"));
        assert_eq!(response.usage.unwrap().completion_tokens, 5);
    }

    #[test]
    fn test_response_without_choices_has_no_text() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_response_with_null_or_blank_content_has_no_text() {
        let null: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(null.text().is_none());

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": " \n "}}]}"#).unwrap();
        assert!(blank.text().is_none());
    }

    #[test]
    fn test_request_serializes_single_user_message() {
        let request = ChatRequest {
            model: "meta-llama/llama-4-scout-17b-16e-instruct",
            messages: vec![ChatMessage {
                role: "user",
                content: "Hello",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "meta-llama/llama-4-scout-17b-16e-instruct");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hello");
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_retryable_classification() {
        let rate_limited = LlmError::Api {
            status: 429,
            message: String::new(),
        };
        let server = LlmError::Api {
            status: 503,
            message: String::new(),
        };
        let auth = LlmError::Api {
            status: 401,
            message: "Invalid API Key".into(),
        };
        assert!(rate_limited.is_retryable());
        assert!(server.is_retryable());
        assert!(!auth.is_retryable());
        assert!(!LlmError::EmptyContent.is_retryable());
    }

    /// Records every prompt it receives so the task helpers can be inspected.
    struct RecordingProvider {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("ok".to_string())
        }
    }

    #[tokio::test]
    async fn test_task_helpers_route_through_complete() {
        let provider = RecordingProvider {
            prompts: Mutex::new(Vec::new()),
        };

        provider.analyze_job("Senior Backend Engineer").await.unwrap();
        provider
            .generate_cover_letter("Senior Backend Engineer", "Jane Doe")
            .await
            .unwrap();
        provider
            .translate("Dear Hiring Manager", Language::French)
            .await
            .unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("Senior Backend Engineer"));
        assert!(prompts[1].contains("Jane Doe"));
        assert!(prompts[2].contains("French"));
        assert!(prompts[2].contains("Dear Hiring Manager"));
    }
}
