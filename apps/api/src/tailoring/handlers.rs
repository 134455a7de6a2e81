//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::TextSource;
use crate::llm_client::GenerationOptions;
use crate::models::resume::TailoredResume;
use crate::state::AppState;
use crate::tailoring::cover_letter::generate_cover_letter;
use crate::tailoring::merge::MergeReport;
use crate::tailoring::tailor::{tailor_resume, JobRequest};

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub tailored_resume: TailoredResume,
    pub report: MergeReport,
    pub company: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    pub company: String,
    pub source: TextSource,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
///
/// Rewrites the base résumé's summary and bullets for one job description.
/// Identity fields always come from the base record.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<JobRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let job_description = request.job_description()?;
    let company = request.company();
    let request_id = Uuid::new_v4();

    info!(
        %request_id,
        company = company.unwrap_or("-"),
        "Tailoring request received ({} chars of job description)",
        job_description.len()
    );

    let base = state.store.load().await?;
    let (tailored_resume, report) = tailor_resume(
        state.llm.as_ref(),
        state.filler.as_ref(),
        &base,
        job_description,
        company,
        state.config.tailor_mode,
        options(&state),
    )
    .await?;

    info!(%request_id, ?report, "Tailoring request complete");

    Ok(Json(TailorResponse {
        tailored_resume,
        report,
        company: company.map(str::to_string),
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/coverletter
///
/// Writes a cover letter for the named company. Both fields are required.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<JobRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let job_description = request.job_description()?;
    let company = request.required_company()?;
    let request_id = Uuid::new_v4();

    info!(%request_id, company, "Cover letter request received");

    let base = state.store.load().await?;
    let letter =
        generate_cover_letter(state.llm.as_ref(), &base, job_description, company, options(&state))
            .await?;

    Ok(Json(CoverLetterResponse {
        cover_letter: letter.text,
        company: company.to_string(),
        source: letter.source,
        generated_at: Utc::now(),
    }))
}

fn options(state: &AppState) -> GenerationOptions {
    GenerationOptions {
        temperature: state.config.temperature,
    }
}
