//! Cover letter generation. One prompt and one call; falls back to the raw reply
//! when the model skips the JSON wrapper.

use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_text_field, TextSource};
use crate::llm_client::{GenerationOptions, TextGenerator};
use crate::models::resume::Resume;
use crate::tailoring::prompts::build_cover_letter_prompt;

/// Key the cover-letter prompt asks the model to return.
pub const COVER_LETTER_FIELD: &str = "coverLetter";

#[derive(Debug, Clone, PartialEq)]
pub struct CoverLetter {
    pub text: String,
    /// `Raw` when the model ignored the JSON format and the whole reply was used.
    pub source: TextSource,
}

pub async fn generate_cover_letter(
    llm: &dyn TextGenerator,
    base: &Resume,
    job_description: &str,
    company: &str,
    options: GenerationOptions,
) -> Result<CoverLetter, AppError> {
    let prompt = build_cover_letter_prompt(base, job_description, company)?;
    let raw = llm.generate(&prompt, options).await?;
    let extraction = extract_text_field(&raw, COVER_LETTER_FIELD);

    info!(
        "Cover letter for {company} generated ({} words, {:?} output)",
        extraction.text.split_whitespace().count(),
        extraction.source
    );

    Ok(CoverLetter {
        text: extraction.text,
        source: extraction.source,
    })
}
