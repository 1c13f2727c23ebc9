//! Session state for one interactive user: resume, analysis, letters, display language.
//!
//! A `Session` is created empty, mutated only by `Orchestrator` actions, and
//! dropped when the client ends it. Nothing here is persisted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod handlers;
pub mod orchestrator;
pub mod store;

pub use orchestrator::Orchestrator;
pub use store::SessionStore;

/// Cover-letter language. English is the generated original; French is a translation of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
}

impl Language {
    /// ISO 639-1 code, used for file suffixes and the PDF `/Lang` entry.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    /// Name used inside prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
        }
    }

    pub fn letter_title(self) -> &'static str {
        match self {
            Language::English => "Cover Letter",
            Language::French => "Lettre de motivation",
        }
    }
}

/// In-memory state of one user's interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub resume_text: String,
    pub job_analysis: String,
    pub cover_letter_en: String,
    /// Cleared whenever a new English letter is generated.
    pub cover_letter_fr: String,
    pub display_language: Language,
    /// Wall-clock time of the most recent completion call. Display only.
    pub last_execution: Option<Duration>,
}

impl Session {
    pub fn has_resume(&self) -> bool {
        !self.resume_text.is_empty()
    }

    pub fn has_cover_letter(&self) -> bool {
        !self.cover_letter_en.is_empty()
    }

    /// The letter slot for `language`.
    pub fn letter(&self, language: Language) -> &str {
        match language {
            Language::English => &self.cover_letter_en,
            Language::French => &self.cover_letter_fr,
        }
    }

    fn letter_mut(&mut self, language: Language) -> &mut String {
        match language {
            Language::English => &mut self.cover_letter_en,
            Language::French => &mut self.cover_letter_fr,
        }
    }

    /// The text currently shown to the user. Falls back to English when the
    /// French slot is empty.
    pub fn displayed_letter(&self) -> &str {
        match self.display_language {
            Language::French if !self.cover_letter_fr.is_empty() => &self.cover_letter_fr,
            _ => &self.cover_letter_en,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            has_resume: self.has_resume(),
            resume_chars: self.resume_text.chars().count(),
            job_analysis: self.job_analysis.clone(),
            cover_letter_en: self.cover_letter_en.clone(),
            cover_letter_fr: self.cover_letter_fr.clone(),
            display_language: self.display_language,
            displayed_letter: self.displayed_letter().to_string(),
            last_execution_ms: self.last_execution.map(|d| d.as_millis() as u64),
            last_execution: self.last_execution.map(format_duration),
            downloads: Downloads {
                analysis: !self.job_analysis.is_empty(),
                cover_letter_en: !self.cover_letter_en.is_empty(),
                cover_letter_fr: !self.cover_letter_fr.is_empty(),
            },
        }
    }
}

/// What the client renders after each action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub has_resume: bool,
    pub resume_chars: usize,
    pub job_analysis: String,
    pub cover_letter_en: String,
    pub cover_letter_fr: String,
    pub display_language: Language,
    pub displayed_letter: String,
    pub last_execution_ms: Option<u64>,
    /// Human form, e.g. "3.42s".
    pub last_execution: Option<String>,
    pub downloads: Downloads,
}

/// Artifacts currently offered for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downloads {
    pub analysis: bool,
    pub cover_letter_en: bool,
    pub cover_letter_fr: bool,
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty_and_english() {
        let session = Session::default();
        assert!(!session.has_resume());
        assert!(!session.has_cover_letter());
        assert_eq!(session.display_language, Language::English);
        assert!(session.last_execution.is_none());
        assert_eq!(session.displayed_letter(), "");
    }

    #[test]
    fn test_displayed_letter_follows_language() {
        let mut session = Session {
            cover_letter_en: "Dear Hiring Manager".into(),
            cover_letter_fr: "Madame, Monsieur".into(),
            ..Default::default()
        };
        assert_eq!(session.displayed_letter(), "Dear Hiring Manager");
        session.display_language = Language::French;
        assert_eq!(session.displayed_letter(), "Madame, Monsieur");
    }

    #[test]
    fn test_displayed_letter_falls_back_to_english() {
        let session = Session {
            cover_letter_en: "Dear Hiring Manager".into(),
            display_language: Language::French,
            ..Default::default()
        };
        assert_eq!(session.displayed_letter(), "Dear Hiring Manager");
    }

    #[test]
    fn test_view_offers_only_non_empty_downloads() {
        let session = Session {
            job_analysis: "ROLE SUMMARY".into(),
            cover_letter_en: "Dear Hiring Manager".into(),
            last_execution: Some(Duration::from_millis(3420)),
            ..Default::default()
        };
        let view = session.view();
        assert_eq!(
            view.downloads,
            Downloads {
                analysis: true,
                cover_letter_en: true,
                cover_letter_fr: false,
            }
        );
        assert_eq!(view.last_execution_ms, Some(3420));
        assert_eq!(view.last_execution.as_deref(), Some("3.42s"));
    }

    #[test]
    fn test_language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::French).unwrap(), r#""fr""#);
        let lang: Language = serde_json::from_str(r#""en""#).unwrap();
        assert_eq!(lang, Language::English);
        assert!(serde_json::from_str::<Language>(r#""de""#).is_err());
    }
}
