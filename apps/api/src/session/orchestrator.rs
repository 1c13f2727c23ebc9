//! Session Orchestrator — the action layer between the client and the collaborators.
//!
//! Every user action is one method taking `&mut Session`. Each action validates
//! first, computes all new values, and only then writes them, so a failed action
//! leaves the session exactly as it was.
//!
//! Flow: upload → extract → resume_text
//!       job description (+ resume) → prompt → completion → session
//!       session → render / artifact

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use chrono::NaiveDate;
use tracing::info;

use crate::documents::{extract_text, ExtractionError};
use crate::errors::AppError;
use crate::layout::PageLayout;
use crate::llm_client::CompletionProvider;
use crate::render::render_cover_letter;
use crate::session::{Language, Session};

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A downloadable file produced from session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `job_analysis_YYYYMMDD.txt`
pub fn analysis_file_name(date: NaiveDate) -> String {
    format!("job_analysis_{}.txt", date.format("%Y%m%d"))
}

/// `cover_letter_YYYYMMDD_<en|fr>.pdf`
pub fn letter_file_name(date: NaiveDate, language: Language) -> String {
    format!(
        "cover_letter_{}_{}.pdf",
        date.format("%Y%m%d"),
        language.code()
    )
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Wires session actions to extraction, completion and rendering.
#[derive(Clone)]
pub struct Orchestrator {
    llm: Arc<dyn CompletionProvider>,
    layout: PageLayout,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn CompletionProvider>, layout: PageLayout) -> Self {
        Self { llm, layout }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Inputs
    // ────────────────────────────────────────────────────────────────────────

    /// Replaces the resume text with the text of the uploaded PDF.
    /// An unreadable file, or one without extractable text, leaves the previous resume in place.
    pub async fn upload_resume(&self, session: &mut Session, bytes: Bytes) -> Result<(), AppError> {
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

        if text.is_empty() {
            return Err(ExtractionError::NoText.into());
        }

        info!("Resume extracted ({} chars)", text.chars().count());
        session.resume_text = text;
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Completions
    // ────────────────────────────────────────────────────────────────────────

    /// Runs a job analysis. Display language and letters are not touched.
    pub async fn analyze_job(
        &self,
        session: &mut Session,
        job_description: &str,
    ) -> Result<(), AppError> {
        require_job_description(job_description)?;

        let (analysis, elapsed) = timed(self.llm.analyze_job(job_description))
            .await
            .map_err(AppError::completion("Job analysis error"))?;

        info!("Job analysis completed in {elapsed:?}");
        session.job_analysis = analysis;
        session.last_execution = Some(elapsed);
        Ok(())
    }

    /// Generates a new English letter. Any French translation belonged to the
    /// previous draft, so it is dropped and the display switches back to English.
    pub async fn generate_cover_letter(
        &self,
        session: &mut Session,
        job_description: &str,
    ) -> Result<(), AppError> {
        require_job_description(job_description)?;
        if !session.has_resume() {
            return Err(AppError::Validation(
                "Please upload your CV first.".to_string(),
            ));
        }

        let (letter, elapsed) = timed(
            self.llm
                .generate_cover_letter(job_description, &session.resume_text),
        )
        .await
        .map_err(AppError::completion("Cover letter generation error"))?;

        info!(
            "Cover letter generated in {elapsed:?} ({} chars)",
            letter.chars().count()
        );
        session.cover_letter_en = letter;
        session.cover_letter_fr.clear();
        session.display_language = Language::English;
        session.last_execution = Some(elapsed);
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Display language
    // ────────────────────────────────────────────────────────────────────────

    /// Shows the English letter. No network call.
    pub fn show_english(&self, session: &mut Session) -> Result<(), AppError> {
        require_cover_letter(session)?;
        session.display_language = Language::English;
        Ok(())
    }

    /// Translates the current English letter and shows the result.
    ///
    /// `current_english` is the English text as the client currently shows it;
    /// when given it is committed to the English slot together with the
    /// translation. Always re-translates so the French follows the latest edits.
    pub async fn show_french(
        &self,
        session: &mut Session,
        current_english: Option<&str>,
    ) -> Result<(), AppError> {
        require_cover_letter(session)?;

        let english = match current_english {
            Some(text) if text.trim().is_empty() => {
                return Err(AppError::Validation(
                    "The cover letter text cannot be empty.".to_string(),
                ))
            }
            Some(text) => text,
            None => session.cover_letter_en.as_str(),
        };

        let (french, elapsed) = timed(self.llm.translate(english, Language::French))
            .await
            .map_err(AppError::completion("Translation error"))?;

        info!("Cover letter translated to French in {elapsed:?}");
        if let Some(text) = current_english {
            session.cover_letter_en = text.to_string();
        }
        session.cover_letter_fr = french;
        session.display_language = Language::French;
        session.last_execution = Some(elapsed);
        Ok(())
    }

    /// Selects the display language requested by the client.
    pub async fn switch_language(
        &self,
        session: &mut Session,
        language: Language,
        current_english: Option<&str>,
    ) -> Result<(), AppError> {
        match language {
            Language::English => self.show_english(session),
            Language::French => self.show_french(session, current_english).await,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Edits
    // ────────────────────────────────────────────────────────────────────────

    /// Writes the user's edit into the slot of the language being displayed.
    pub fn edit_displayed(&self, session: &mut Session, text: &str) -> Result<Language, AppError> {
        require_cover_letter(session)?;
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "The cover letter text cannot be empty.".to_string(),
            ));
        }

        // Shown language is French only once a translation exists
        let language = match session.display_language {
            Language::French if !session.cover_letter_fr.is_empty() => Language::French,
            _ => Language::English,
        };
        *session.letter_mut(language) = text.to_string();
        Ok(language)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Downloads (read-only)
    // ────────────────────────────────────────────────────────────────────────

    pub fn analysis_download(&self, session: &Session) -> Result<Artifact, AppError> {
        if session.job_analysis.is_empty() {
            return Err(AppError::Validation(
                "There is no job analysis to download yet.".to_string(),
            ));
        }

        Ok(Artifact {
            file_name: analysis_file_name(today()),
            content_type: TEXT_CONTENT_TYPE,
            bytes: session.job_analysis.as_bytes().to_vec(),
        })
    }

    /// Renders the letter for `language` as a PDF.
    ///
    /// `current_text` is the text as the client shows it, rendered instead of the
    /// stored slot when present. The session is not modified.
    pub async fn letter_download(
        &self,
        session: &Session,
        language: Language,
        current_text: Option<&str>,
    ) -> Result<Artifact, AppError> {
        // The stored slot gates the download even when the client sends its own text
        if session.letter(language).trim().is_empty() {
            return Err(AppError::Validation(match language {
                Language::English => "There is no cover letter to download yet.".to_string(),
                Language::French => {
                    "Switch to French first to generate the French version.".to_string()
                }
            }));
        }
        let text = match current_text {
            Some(text) if text.trim().is_empty() => {
                return Err(AppError::Validation(
                    "The cover letter text cannot be empty.".to_string(),
                ))
            }
            Some(text) => text.to_string(),
            None => session.letter(language).to_string(),
        };

        let layout = self.layout.clone();
        let bytes =
            tokio::task::spawn_blocking(move || render_cover_letter(&text, language, &layout))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("render task failed: {e}")))??;

        Ok(Artifact {
            file_name: letter_file_name(today(), language),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        })
    }
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description first.".to_string(),
        ));
    }
    Ok(())
}

fn require_cover_letter(session: &Session) -> Result<(), AppError> {
    if !session.has_cover_letter() {
        return Err(AppError::Validation(
            "Generate a cover letter first.".to_string(),
        ));
    }
    Ok(())
}

async fn timed<T, E>(
    fut: impl std::future::Future<Output = Result<T, E>>,
) -> Result<(T, Duration), E> {
    let start = Instant::now();
    let value = fut.await?;
    Ok((value, start.elapsed()))
}
