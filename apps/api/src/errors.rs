use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::ExtractionError;
use crate::llm_client::LlmError;
use crate::render::RenderError;

/// Action-boundary error type.
/// Every session action returns `Result<T, AppError>`; the message is what the user sees.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Error reading PDF: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("{context}: {source}")]
    Completion {
        context: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("Error creating PDF: {0}")]
    Render(#[from] RenderError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Another action is still running for this session")]
    SessionBusy,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn completion(context: &'static str) -> impl FnOnce(LlmError) -> AppError {
        move |source| AppError::Completion { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Extraction(e) => {
                tracing::warn!("Extraction error: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR")
            }
            AppError::Completion { context, source } => {
                tracing::error!("Completion error ({context}): {source}");
                (StatusCode::BAD_GATEWAY, "COMPLETION_ERROR")
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::SessionBusy => (StatusCode::CONFLICT, "SESSION_BUSY"),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("Please enter a job description first.".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_busy_maps_to_conflict() {
        assert_eq!(
            AppError::SessionBusy.into_response().status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_completion_message_names_the_action() {
        let err = AppError::completion("Translation error")(LlmError::EmptyContent);
        assert_eq!(
            err.to_string(),
            "Translation error: LLM returned empty content"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_extraction_maps_to_unprocessable() {
        let err = AppError::from(ExtractionError::UnsupportedFormat);
        assert!(err.to_string().starts_with("Error reading PDF"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
