pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        .route("/api/v1/coverletter", post(handlers::handle_cover_letter))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    use crate::config::{Config, TailorMode};
    use crate::llm_client::fake::ScriptedGenerator;
    use crate::store::ResumeStore;
    use crate::tailoring::filler::GenericFiller;

    const BASE_RESUME: &str = r#"{
        "header": {"name": "Jake Loke", "email": "jake@example.com"},
        "summary": "Engineer focused on automation.",
        "technicalSkills": {"languages": ["Rust", "Python"]},
        "experience": [
            {"company": "Acme", "title": "Engineer", "location": "Remote", "dates": "2021 - 2024", "bullets": ["Did X"]}
        ],
        "projects": [],
        "education": [{"school": "State University", "degree": "BSc", "dates": "2017 - 2021"}]
    }"#;

    fn base_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BASE_RESUME.as_bytes()).unwrap();
        file
    }

    fn config(path: &std::path::Path) -> Config {
        let path = path.to_string_lossy().into_owned();
        Config::from_lookup(|key| match key {
            "BASE_RESUME_PATH" => Some(path.clone()),
            _ => None,
        })
        .unwrap()
    }

    fn app(llm: Arc<ScriptedGenerator>, file: &NamedTempFile) -> Router {
        let config = config(file.path());
        build_router(AppState {
            llm,
            store: ResumeStore::new(config.base_resume_path.clone()),
            filler: Arc::new(GenericFiller),
            config,
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let file = base_file();
        let response = app(Arc::new(ScriptedGenerator::new()), &file)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tailor-api");
    }

    #[tokio::test]
    async fn test_tailor_happy_path() {
        let file = base_file();
        let llm = Arc::new(
            ScriptedGenerator::new()
                .respond("ONLY the \"summary\"", r#"{"summary": "Rust engineer who automates."}"#)
                .respond(
                    "ONLY the \"bullets\"",
                    r#"```json
{"experience": [{"company": "Evil Corp", "title": "CEO", "bullets": ["Automated deploys", "Cut build times"]}]}
```"#,
                ),
        );

        let (status, body) = post_json(
            app(llm.clone(), &file),
            "/api/v1/tailor",
            json!({"jobDescription": "Rust engineer, automation", "companyName": "Initech"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(llm.calls(), 2);

        let resume = &body["tailoredResume"];
        assert_eq!(resume["header"]["name"], "Jake Loke");
        assert_eq!(resume["summary"], "Rust engineer who automates.");
        assert_eq!(resume["experience"][0]["company"], "Acme");
        assert_eq!(resume["experience"][0]["title"], "Engineer");
        assert_eq!(
            resume["experience"][0]["bullets"],
            json!(["Automated deploys", "Cut build times"])
        );
        assert_eq!(resume["education"][0]["school"], "State University");
        assert_eq!(resume["technical_skills"]["languages"], json!(["Rust", "Python"]));

        assert_eq!(body["report"]["summary"], "model");
        assert_eq!(body["company"], "Initech");
        assert!(body["generatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_tailor_without_company_is_allowed() {
        let file = base_file();
        let llm = Arc::new(
            ScriptedGenerator::new()
                .respond("ONLY the \"summary\"", "{}")
                .respond("ONLY the \"bullets\"", "{}"),
        );

        let (status, body) = post_json(
            app(llm, &file),
            "/api/v1/tailor",
            json!({"jobDescription": "Rust engineer"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["company"], Value::Null);
        assert_eq!(body["tailoredResume"]["summary"], "Engineer focused on automation.");
    }

    #[tokio::test]
    async fn test_tailor_missing_job_description_makes_no_model_calls() {
        let file = base_file();
        let llm = Arc::new(ScriptedGenerator::new());

        let (status, body) = post_json(
            app(llm.clone(), &file),
            "/api/v1/tailor",
            json!({"jobDescription": "   ", "companyName": "Initech"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_tailor_model_failure_is_bad_gateway() {
        let file = base_file();
        let llm = Arc::new(
            ScriptedGenerator::new()
                .fail("ONLY the \"summary\"", 500)
                .respond("ONLY the \"bullets\"", "{}"),
        );

        let (status, body) = post_json(
            app(llm, &file),
            "/api/v1/tailor",
            json!({"jobDescription": "Rust engineer"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body.get("tailoredResume").is_none());
    }

    #[tokio::test]
    async fn test_tailor_missing_base_resume_is_storage_error() {
        let file = base_file();
        let mut config = config(file.path());
        config.base_resume_path = file.path().with_extension("missing");
        let app = build_router(AppState {
            llm: Arc::new(ScriptedGenerator::new()),
            store: ResumeStore::new(config.base_resume_path.clone()),
            filler: Arc::new(GenericFiller),
            config,
        });

        let (status, body) =
            post_json(app, "/api/v1/tailor", json!({"jobDescription": "Rust engineer"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "STORAGE_ERROR");
    }

    #[tokio::test]
    async fn test_whole_document_mode_from_config() {
        let file = base_file();
        let llm = Arc::new(ScriptedGenerator::new().respond(
            "Below is my current resume",
            r#"{"summary": "Whole-document summary"}"#,
        ));
        let mut config = config(file.path());
        config.tailor_mode = TailorMode::WholeDocument;
        let app = build_router(AppState {
            llm: llm.clone(),
            store: ResumeStore::new(config.base_resume_path.clone()),
            filler: Arc::new(GenericFiller),
            config,
        });

        let (status, body) =
            post_json(app, "/api/v1/tailor", json!({"jobDescription": "Rust engineer"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(llm.calls(), 1);
        assert_eq!(body["tailoredResume"]["summary"], "Whole-document summary");
    }

    #[tokio::test]
    async fn test_cover_letter_happy_path() {
        let file = base_file();
        let llm = Arc::new(ScriptedGenerator::new().respond(
            "tailored cover letter for \"Initech\"",
            r#"{"coverLetter": "Dear Initech team, ..."}"#,
        ));

        let (status, body) = post_json(
            app(llm, &file),
            "/api/v1/coverletter",
            json!({"jobDescription": "Rust engineer", "companyName": "Initech"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coverLetter"], "Dear Initech team, ...");
        assert_eq!(body["company"], "Initech");
        assert_eq!(body["source"], "structured");
    }

    #[tokio::test]
    async fn test_cover_letter_requires_company() {
        let file = base_file();
        let llm = Arc::new(ScriptedGenerator::new());

        let (status, body) = post_json(
            app(llm.clone(), &file),
            "/api/v1/coverletter",
            json!({"jobDescription": "Rust engineer"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "companyName is required");
        assert_eq!(llm.calls(), 0);
    }
}
