use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The base résumé as stored on disk. Source of truth for every tailoring request.
///
/// Sections missing from the file deserialize to empty values so a tailored copy is
/// always structurally complete for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default)]
    pub header: ResumeHeader,
    #[serde(default)]
    pub summary: String,
    /// Category name → skills, kept in file order.
    #[serde(default, alias = "technicalSkills")]
    pub technical_skills: Map<String, Value>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Any other contact fields the author keeps in the file.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Per-entry keys such as `link` or `tech`, carried through tailoring untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A job-specific copy of the base résumé. Only the merge policy builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TailoredResume(pub Resume);

impl TailoredResume {
    #[cfg(test)]
    pub fn into_inner(self) -> Resume {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_RESUME_JSON: &str = r#"{
        "header": {
            "name": "Jake Loke",
            "location": "Singapore",
            "phone": "+65 0000 0000",
            "github": "github.com/jake",
            "portfolio": "jake.dev"
        },
        "summary": "Engineer focused on automation.",
        "technical_skills": {
            "Languages": ["Rust", "TypeScript"],
            "Cloud": ["AWS"]
        },
        "experience": [
            {
                "company": "Acme",
                "title": "Engineer",
                "location": "Remote",
                "dates": "2021 - 2024",
                "bullets": ["Did X"]
            }
        ],
        "projects": [
            {"title": "Tailor", "dates": "2024", "bullets": ["Built a CLI"]}
        ],
        "education": [
            {"school": "NUS", "degree": "BComp", "dates": "2017 - 2021", "honours": "Distinction"}
        ]
    }"#;

    #[test]
    fn test_resume_deserializes_on_disk_shape() {
        let resume: Resume = serde_json::from_str(BASE_RESUME_JSON).unwrap();
        assert_eq!(resume.header.name.as_deref(), Some("Jake Loke"));
        assert_eq!(resume.header.extra["portfolio"], "jake.dev");
        assert_eq!(resume.experience[0].company, "Acme");
        assert_eq!(resume.projects[0].location, None);
        assert_eq!(resume.education[0].extra["honours"], "Distinction");
    }

    #[test]
    fn test_technical_skills_keep_file_order() {
        let resume: Resume = serde_json::from_str(BASE_RESUME_JSON).unwrap();
        let categories: Vec<&str> = resume.technical_skills.keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["Languages", "Cloud"]);
    }

    #[test]
    fn test_camel_case_skills_alias_is_accepted() {
        let json = r#"{"technicalSkills": {"Tools": ["Git"]}}"#;
        let resume: Resume = serde_json::from_str(json).unwrap();
        assert!(resume.technical_skills.contains_key("Tools"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let resume: Resume = serde_json::from_str("{}").unwrap();
        assert!(resume.summary.is_empty());
        assert!(resume.experience.is_empty());

        let value = serde_json::to_value(&resume).unwrap();
        for key in ["header", "summary", "technical_skills", "experience", "projects", "education"] {
            assert!(value.get(key).is_some(), "serialized resume is missing {key}");
        }
    }

    #[test]
    fn test_tailored_resume_serializes_like_resume() {
        let resume: Resume = serde_json::from_str(BASE_RESUME_JSON).unwrap();
        let tailored = TailoredResume(resume.clone());
        assert_eq!(
            serde_json::to_value(&tailored).unwrap(),
            serde_json::to_value(&resume).unwrap()
        );
    }
}
