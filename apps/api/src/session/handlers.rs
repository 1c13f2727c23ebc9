//! Axum route handlers for the Session API.
//!
//! One request per user action. Every action response carries the refreshed
//! `SessionView` so the client can re-render from scratch.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::orchestrator::Artifact;
use crate::session::{Language, Session, SessionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
    /// English text as currently shown, committed before translating.
    pub current_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LetterDownloadRequest {
    /// Text as currently shown; rendered instead of the stored letter when present.
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub message: String,
    pub session: SessionView,
}

impl ActionResponse {
    fn new(message: impl Into<String>, view: SessionView) -> Json<Self> {
        Json(Self {
            message: message.into(),
            session: view,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create();
    tracing::info!(%session_id, "Session created");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            session: Session::default().view(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.snapshot(id).await?;
    Ok(Json(session.view()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id) {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    tracing::info!(session_id = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Actions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload; the PDF is read from the `file` field.
#[instrument(skip_all, fields(session_id = %id))]
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ActionResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError::Validation("Upload your CV as a 'file' field.".to_string())
    })?;

    let mut session = state.sessions.acquire(id)?;
    state.orchestrator.upload_resume(&mut session, bytes).await?;

    Ok(ActionResponse::new(
        format!("CV uploaded: {file_name}"),
        session.view(),
    ))
}

/// POST /api/v1/sessions/:id/analyze
#[instrument(skip_all, fields(session_id = %id))]
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut session = state.sessions.acquire(id)?;
    state
        .orchestrator
        .analyze_job(&mut session, &request.job_description)
        .await?;

    Ok(ActionResponse::new(
        "Job analysis completed!",
        session.view(),
    ))
}

/// POST /api/v1/sessions/:id/cover-letter
#[instrument(skip_all, fields(session_id = %id))]
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut session = state.sessions.acquire(id)?;
    state
        .orchestrator
        .generate_cover_letter(&mut session, &request.job_description)
        .await?;

    Ok(ActionResponse::new(
        "Cover letter generated successfully!",
        session.view(),
    ))
}

/// POST /api/v1/sessions/:id/language
#[instrument(skip_all, fields(session_id = %id))]
pub async fn handle_switch_language(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut session = state.sessions.acquire(id)?;
    state
        .orchestrator
        .switch_language(
            &mut session,
            request.language,
            request.current_text.as_deref(),
        )
        .await?;

    let message = match request.language {
        Language::English => "Showing the English version",
        Language::French => "Translated to French",
    };
    Ok(ActionResponse::new(message, session.view()))
}

/// PUT /api/v1/sessions/:id/cover-letter
#[instrument(skip_all, fields(session_id = %id))]
pub async fn handle_edit_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut session = state.sessions.acquire(id)?;
    let language = state
        .orchestrator
        .edit_displayed(&mut session, &request.text)?;

    Ok(ActionResponse::new(
        format!("{} version updated", language.display_name()),
        session.view(),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Downloads
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/downloads/analysis
pub async fn handle_download_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state.sessions.acquire(id)?;
    let artifact = state.orchestrator.analysis_download(&session)?;
    Ok(attachment(artifact))
}

/// POST /api/v1/sessions/:id/downloads/cover-letter/:lang
///
/// Body is optional; `{"text": "..."}` renders the on-screen text.
/// A body that is present but not valid JSON is rejected.
pub async fn handle_download_cover_letter(
    State(state): State<AppState>,
    Path((id, language)): Path<(Uuid, Language)>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_optional_body::<LetterDownloadRequest>(&body)?;
    let session = state.sessions.acquire(id)?;
    let artifact = state
        .orchestrator
        .letter_download(&session, language, request.text.as_deref())
        .await?;
    Ok(attachment(artifact))
}

/// An empty (or whitespace-only) body means "use the defaults".
fn parse_optional_body<T>(body: &[u8]) -> Result<T, AppError>
where
    T: Default + serde::de::DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

fn attachment(artifact: Artifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
