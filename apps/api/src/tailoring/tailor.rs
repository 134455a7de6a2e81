//! Résumé tailoring: prompts, model calls, extraction, then one merge.
//!
//! Split mode (default): summary prompt ‖ experience prompt → two concurrent model
//! calls → extract each → merge once. Whole-document mode: one prompt, one call.
//!
//! A model call that fails aborts the request. A response that arrives but cannot be
//! parsed only degrades the result to original content.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::TailorMode;
use crate::errors::AppError;
use crate::extraction::extract;
use crate::llm_client::{GenerationOptions, TextGenerator};
use crate::models::resume::{Resume, TailoredResume};
use crate::tailoring::filler::FillerPolicy;
use crate::tailoring::merge::{merge, merge_payload, FieldSource, MergeReport, Proposal};
use crate::tailoring::prompts::{
    build_experience_prompt, build_summary_prompt, build_whole_document_prompt,
};

/// Request body shared by the tailoring and cover-letter endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl JobRequest {
    /// The trimmed job description, or a validation error if it is missing or blank.
    pub fn job_description(&self) -> Result<&str, AppError> {
        self.job_description
            .as_deref()
            .map(str::trim)
            .filter(|jd| !jd.is_empty())
            .ok_or_else(|| AppError::Validation("jobDescription is required".to_string()))
    }

    /// The trimmed company name, if one was given.
    pub fn company(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|company| !company.is_empty())
    }

    pub fn required_company(&self) -> Result<&str, AppError> {
        self.company()
            .ok_or_else(|| AppError::Validation("companyName is required".to_string()))
    }
}

/// Runs one tailoring pass against `base`. Never mutates `base`.
pub async fn tailor_resume(
    llm: &dyn TextGenerator,
    filler: &dyn FillerPolicy,
    base: &Resume,
    job_description: &str,
    company: Option<&str>,
    mode: TailorMode,
    options: GenerationOptions,
) -> Result<(TailoredResume, MergeReport), AppError> {
    let (tailored, report) = match mode {
        TailorMode::Split => {
            let proposal = propose_split(llm, base, job_description, company, options).await?;
            merge(base, &proposal, filler)
        }
        TailorMode::WholeDocument => {
            let prompt = build_whole_document_prompt(base, job_description, company)?;
            let raw = llm.generate(&prompt, options).await?;
            merge_payload(base, &extract(&raw), filler)
        }
    };

    info!(
        "Tailored resume ({:?} mode): {} fields from model, {} kept, {} filled",
        mode,
        report.adopted(),
        report.count(FieldSource::Original),
        report.count(FieldSource::Filler)
    );

    Ok((tailored, report))
}

/// Issues the summary and experience prompts concurrently. The two calls touch
/// disjoint fields, so each payload only contributes its own part.
async fn propose_split(
    llm: &dyn TextGenerator,
    base: &Resume,
    job_description: &str,
    company: Option<&str>,
    options: GenerationOptions,
) -> Result<Proposal, AppError> {
    let summary_prompt = build_summary_prompt(base, job_description, company)?;
    let experience_prompt = build_experience_prompt(base, job_description, company)?;

    let (summary_raw, experience_raw) = tokio::try_join!(
        llm.generate(&summary_prompt, options),
        llm.generate(&experience_prompt, options),
    )?;

    let (summary_payload, experience_payload) = (extract(&summary_raw), extract(&experience_raw));
    debug!(
        "Split payloads parsed: summary={}, experience={}",
        summary_payload.is_parsed(),
        experience_payload.is_parsed()
    );

    let summary = Proposal::from_payload(&summary_payload);
    let experience = Proposal::from_payload(&experience_payload);

    Ok(Proposal {
        summary: summary.summary,
        experience: experience.experience,
        projects: experience.projects,
    })
}
