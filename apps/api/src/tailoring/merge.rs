//! Field merge policy: decides per field whether the model's proposal is adopted.
//!
//! The model may only replace the summary and the bullets of experience/project entries.
//! Everything else, identity fields included, is copied from the base résumé no matter
//! what the payload contains. The merge is total: every entry leaves with at least one
//! non-empty bullet.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::extraction::ExtractedPayload;
use crate::models::resume::{ExperienceEntry, ProjectEntry, Resume, TailoredResume};
use crate::tailoring::filler::{EntryMeta, FillerPolicy, Section, LAST_RESORT_BULLET};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\[\]]*\]|\{\{[^{}]*\}\}").expect("placeholder pattern is valid")
});
static LEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[•*·]\s*|[-–]\s+)+").expect("bullet marker pattern is valid")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Proposed bullets per entry, by position. `None` means nothing valid was proposed.
pub type ProposedBullets = Vec<Option<Vec<String>>>;

/// Validated, typed view of what the model proposed. Only sanitized, non-empty text
/// survives into a proposal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Proposal {
    pub summary: Option<String>,
    pub experience: ProposedBullets,
    pub projects: ProposedBullets,
}

impl Proposal {
    pub fn from_payload(payload: &ExtractedPayload) -> Self {
        let Some(map) = payload.as_object() else {
            return Self::default();
        };

        Self {
            summary: map
                .get("summary")
                .and_then(Value::as_str)
                .map(sanitize_text)
                .filter(|summary| !summary.is_empty()),
            experience: section_bullets(map.get("experience")),
            projects: section_bullets(map.get("projects")),
        }
    }
}

/// Where a merged field came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    Model,
    #[default]
    Original,
    Filler,
}

/// Provenance of every tailorable field in a merged résumé.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub summary: FieldSource,
    pub experience: Vec<FieldSource>,
    pub projects: Vec<FieldSource>,
}

impl MergeReport {
    /// Number of fields taken from the model.
    pub fn adopted(&self) -> usize {
        self.count(FieldSource::Model)
    }

    pub fn count(&self, source: FieldSource) -> usize {
        std::iter::once(&self.summary)
            .chain(&self.experience)
            .chain(&self.projects)
            .filter(|s| **s == source)
            .count()
    }
}

/// Builds a tailored résumé from the base résumé and a proposal.
pub fn merge(
    original: &Resume,
    proposal: &Proposal,
    filler: &dyn FillerPolicy,
) -> (TailoredResume, MergeReport) {
    let mut report = MergeReport::default();

    let summary = match &proposal.summary {
        Some(summary) => {
            report.summary = FieldSource::Model;
            summary.clone()
        }
        None => original.summary.clone(),
    };

    let experience = original
        .experience
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let meta = EntryMeta {
                section: Section::Experience,
                title: &entry.title,
                company: Some(&entry.company),
            };
            let (bullets, source) =
                choose_bullets(proposal.experience.get(i), &entry.bullets, &meta, filler);
            report.experience.push(source);

            ExperienceEntry {
                bullets,
                ..entry.clone()
            }
        })
        .collect();

    let projects = original
        .projects
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let meta = EntryMeta {
                section: Section::Project,
                title: &entry.title,
                company: None,
            };
            let (bullets, source) =
                choose_bullets(proposal.projects.get(i), &entry.bullets, &meta, filler);
            report.projects.push(source);

            ProjectEntry {
                bullets,
                ..entry.clone()
            }
        })
        .collect();

    let tailored = TailoredResume(Resume {
        header: original.header.clone(),
        summary,
        technical_skills: original.technical_skills.clone(),
        experience,
        projects,
        education: original.education.clone(),
    });

    (tailored, report)
}

/// Merges a single extracted payload.
pub fn merge_payload(
    original: &Resume,
    payload: &ExtractedPayload,
    filler: &dyn FillerPolicy,
) -> (TailoredResume, MergeReport) {
    merge(original, &Proposal::from_payload(payload), filler)
}

/// Accepts a bullet list only if it is a non-empty array of strings that are all still
/// non-empty after sanitation.
pub fn valid_bullets(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    if items.is_empty() {
        return None;
    }

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(sanitize_text)
                .filter(|text| !text.is_empty())
        })
        .collect()
}

/// Strips bullet glyphs and leftover template tokens (`[Metric]`, `{{company}}`) and
/// collapses whitespace.
pub fn sanitize_text(text: &str) -> String {
    let text = PLACEHOLDER.replace_all(text, " ");
    let text = LEADING_MARKER.replace(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn choose_bullets(
    proposed: Option<&Option<Vec<String>>>,
    original: &[String],
    meta: &EntryMeta<'_>,
    filler: &dyn FillerPolicy,
) -> (Vec<String>, FieldSource) {
    if let Some(Some(bullets)) = proposed {
        return (bullets.clone(), FieldSource::Model);
    }

    if original.iter().any(|bullet| !bullet.trim().is_empty()) {
        return (original.to_vec(), FieldSource::Original);
    }

    let filler_bullets: Vec<String> = filler
        .filler_bullets(meta)
        .into_iter()
        .filter(|bullet| !bullet.trim().is_empty())
        .collect();

    if filler_bullets.is_empty() {
        (vec![LAST_RESORT_BULLET.to_string()], FieldSource::Filler)
    } else {
        (filler_bullets, FieldSource::Filler)
    }
}

fn section_bullets(section: Option<&Value>) -> ProposedBullets {
    section
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| valid_bullets(entry.get("bullets")))
                .collect()
        })
        .unwrap_or_default()
}
