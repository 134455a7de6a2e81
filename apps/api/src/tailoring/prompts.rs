// Prompt templates for tailoring and cover letters.
// Placeholders are filled in one pass by `fill`, so braces inside substituted text
// (a company name, the job description, the résumé) are never re-expanded.

use serde_json::json;

use crate::errors::AppError;
use crate::llm_client::prompts::{COMPANY_MENTION_RULE, IDENTITY_RULES, JSON_ONLY_RULE};
use crate::models::resume::Resume;

/// Summary-only rewrite. Replace: {target}, {identity_rules}, {company_rule},
/// {json_only_rule}, {resume_json}, {job_description}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer.

Task: rewrite ONLY the "summary" of the resume below so it targets {target}.

Rules:
{identity_rules}
- {company_rule}
- The summary must be 2 to 4 sentences of plain prose.

{json_only_rule}
Output format:
{"summary": "..."}

=== CURRENT RESUME ===
{resume_json}

=== JOB DESCRIPTION ===
{job_description}"#;

/// Bullet-only rewrite for experience and project entries.
/// Replace: {target}, {identity_rules}, {company_rule}, {json_only_rule},
///          {experience_count}, {project_count}, {entries_json}, {job_description}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer.

Task: rewrite ONLY the "bullets" of each experience and project entry below so they target {target}.

Rules:
{identity_rules}
- {company_rule}
- Return exactly {experience_count} experience objects and {project_count} project objects, in the same order as given.
- Each entry gets 2 to 5 bullets; every bullet is one non-empty sentence.
- Do NOT copy the company, title, location or dates into the output; return bullets only.

{json_only_rule}
Output format:
{"experience": [{"bullets": ["...", "..."]}], "projects": [{"bullets": ["..."]}]}

=== ENTRIES ===
{entries_json}

=== JOB DESCRIPTION ===
{job_description}"#;

/// Single-shot rewrite of the whole résumé.
/// Replace: {target}, {identity_rules}, {company_rule}, {json_only_rule},
///          {resume_json}, {job_description}
pub const WHOLE_DOCUMENT_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer.

Below is my current resume in JSON format. Tailor it for {target}.

You must:
{identity_rules}
- {company_rule}
- Only rewrite the "summary" and every "bullets" list.
- Preserve the structure and return valid JSON with the same keys.

{json_only_rule}
Output format: the full resume JSON with the same structure, replacing only "summary" and "bullets".

=== CURRENT RESUME ===
{resume_json}

=== JOB DESCRIPTION ===
{job_description}"#;

/// Cover letter. Replace: {company}, {json_only_rule}, {closing}, {resume_json},
///                        {job_description}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are a professional resume and cover letter writer.

{json_only_rule}
Output format:
{"coverLetter": "..."}

Task:
Write a professional, tailored cover letter for "{company}" using the provided job description and resume.

Objectives:
- Connect the applicant's experience and skills to the company's goals and responsibilities.
- Highlight transferable strengths the resume actually demonstrates.
- DO NOT invent or imply any job titles not present in the resume.
- If the job description contains a section title (e.g. "Project Management"), discuss it as a functional area the applicant contributes to, not a formal title.
- DO NOT mention specific platforms or tools unless they are listed in the resume.
- Tone: confident, factual and conversational.
- Mention "{company}" exactly once.
- Length: 150 to 200 words.
- End with this closing:
{closing}

=== USER RESUME ===
{resume_json}

=== JOB DESCRIPTION ===
{job_description}"#;

pub fn build_summary_prompt(
    resume: &Resume,
    job_description: &str,
    company: Option<&str>,
) -> Result<String, AppError> {
    let resume_json = to_pretty_json(resume, "resume")?;

    Ok(fill(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("target", target(company).as_str()),
            ("identity_rules", IDENTITY_RULES),
            ("company_rule", COMPANY_MENTION_RULE),
            ("json_only_rule", JSON_ONLY_RULE),
            ("resume_json", resume_json.as_str()),
            ("job_description", job_description.trim()),
        ],
    ))
}

pub fn build_experience_prompt(
    resume: &Resume,
    job_description: &str,
    company: Option<&str>,
) -> Result<String, AppError> {
    let entries = json!({
        "experience": resume.experience.iter().enumerate().map(|(index, entry)| json!({
            "index": index,
            "company": entry.company,
            "title": entry.title,
            "location": entry.location,
            "dates": entry.dates,
            "bullets": entry.bullets,
        })).collect::<Vec<_>>(),
        "projects": resume.projects.iter().enumerate().map(|(index, project)| json!({
            "index": index,
            "title": project.title,
            "dates": project.dates,
            "bullets": project.bullets,
        })).collect::<Vec<_>>(),
    });
    let entries_json = to_pretty_json(&entries, "entries")?;

    Ok(fill(
        EXPERIENCE_PROMPT_TEMPLATE,
        &[
            ("target", target(company).as_str()),
            ("identity_rules", IDENTITY_RULES),
            ("company_rule", COMPANY_MENTION_RULE),
            ("json_only_rule", JSON_ONLY_RULE),
            ("experience_count", resume.experience.len().to_string().as_str()),
            ("project_count", resume.projects.len().to_string().as_str()),
            ("entries_json", entries_json.as_str()),
            ("job_description", job_description.trim()),
        ],
    ))
}

pub fn build_whole_document_prompt(
    resume: &Resume,
    job_description: &str,
    company: Option<&str>,
) -> Result<String, AppError> {
    let resume_json = to_pretty_json(resume, "resume")?;

    Ok(fill(
        WHOLE_DOCUMENT_PROMPT_TEMPLATE,
        &[
            ("target", target(company).as_str()),
            ("identity_rules", IDENTITY_RULES),
            ("company_rule", COMPANY_MENTION_RULE),
            ("json_only_rule", JSON_ONLY_RULE),
            ("resume_json", resume_json.as_str()),
            ("job_description", job_description.trim()),
        ],
    ))
}

pub fn build_cover_letter_prompt(
    resume: &Resume,
    job_description: &str,
    company: &str,
) -> Result<String, AppError> {
    let resume_json = to_pretty_json(resume, "resume")?;

    Ok(fill(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("json_only_rule", JSON_ONLY_RULE),
            ("closing", closing(resume).as_str()),
            ("resume_json", resume_json.as_str()),
            ("company", company.trim()),
            ("job_description", job_description.trim()),
        ],
    ))
}

/// The fixed sign-off the cover letter must end with.
pub fn closing(resume: &Resume) -> String {
    let name = resume
        .header
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match name {
        Some(name) => format!(
            "  \"Thank you for your time and consideration.\n  Best regards,\n  {name}\""
        ),
        None => "  \"Thank you for your time and consideration.\n  Best regards,\"".to_string(),
    }
}

fn target(company: Option<&str>) -> String {
    match company.map(str::trim).filter(|c| !c.is_empty()) {
        Some(company) => format!("the role at \"{company}\" described in the job description"),
        None => "the role described in the job description".to_string(),
    }
}

/// Replaces each `{name}` listed in `vars` in a single left-to-right pass. Other braces
/// are copied as-is.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            vars.iter()
                .find(|(name, _)| *name == &after[..close])
                .map(|(_, value)| (close, *value))
        });

        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn to_pretty_json<T: serde::Serialize>(value: &T, what: &str) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
}
