//! Prompt builders for job analysis, cover-letter generation and translation.
//!
//! Pure functions: same input, same prompt. Inputs are spliced in exactly once,
//! so braces or placeholder-looking text inside a job description or resume are
//! carried through untouched. Emptiness checks belong to the caller.

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::session::Language;

/// Instruction requesting a structured breakdown of a job description.
pub fn build_job_analysis_prompt(job_description: &str) -> String {
    format!(
        r#"You are an experienced recruiter and career coach. Analyze the job description below and produce a structured breakdown for a candidate preparing an application.

Use exactly these sections, each with a short heading:

1. ROLE SUMMARY: title, seniority, team or domain, in two or three sentences.
2. REQUIRED SKILLS: the explicit must-haves (languages, tools, years of experience, certifications).
3. NICE-TO-HAVE SKILLS: preferred or bonus qualifications.
4. KEY RESPONSIBILITIES: what the person will actually do day to day.
5. COMPANY AND CULTURE SIGNALS: values, pace, work model, anything that hints at how the team operates.
6. FIT SIGNALS: what a strong applicant should emphasize, and red flags or gaps to address in a cover letter.
7. KEYWORDS: the terms an applicant should mirror in their resume and cover letter.

Keep each section concise and use bullet points where there is more than one item.

{PLAIN_TEXT_INSTRUCTION}

JOB DESCRIPTION:
{job_description}"#
    )
}

/// Instruction requesting a personalised cover letter in the applicant's own voice.
pub fn build_cover_letter_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        r#"You are an expert career writer. Write a personalized cover letter for the job below, in the first person, in the applicant's own voice, based on their resume.

Guidelines:
- Open with the specific role and why the applicant is interested in this company.
- Connect two or three concrete experiences or achievements from the resume to the most important requirements of the job.
- Mirror the key terms of the job description naturally, never as a keyword list.
- Close with a confident, polite call to action.
- Professional but warm tone, between 250 and 400 words.
- Use the applicant's name and contact details from the resume where they appear. Do not invent any.
- Plain text with a greeting, body paragraphs separated by blank lines, and a sign-off.

{GROUNDING_INSTRUCTION}

{PLAIN_TEXT_INSTRUCTION}

JOB DESCRIPTION:
{job_description}

APPLICANT RESUME:
{resume_text}"#
    )
}

/// Wraps `text` in an instruction to translate it while keeping tone and layout.
pub fn build_translation_prompt(text: &str, target: Language) -> String {
    format!(
        "Translate this professional text to {}. Maintain the professional tone and formatting:\n\n{text}",
        target.display_name()
    )
}
