//! Router behaviour, driven in-process through `tower::ServiceExt::oneshot`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use worksheet_bedrock::error::BedrockError;
use worksheet_bedrock::generator::{Generation, GenerationRequest, TextGenerator};
use worksheet_bedrock::pipeline::{ContentPipeline, PipelineOptions};
use worksheet_core::models::token_count::TokenCount;
use worksheet_export::pdf::{PdfRenderer, RenderOptions};
use worksheet_server::router;
use worksheet_server::state::AppState;

const LATEX: &str = "\\documentclass{article}\n\\begin{document}\nLeaves\n\\end{document}";

#[derive(Clone, Copy)]
enum Behaviour {
    Succeed,
    FailFirst,
    FailTranslation,
}

/// Answers the first call with a worksheet and the second with LaTeX,
/// unless told to fail one of them.
struct StubGenerator {
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
}

impl TextGenerator for StubGenerator {
    fn model_id(&self) -> &str {
        "us.anthropic.claude-sonnet-4-20250514-v1:0"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, BedrockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let translating = request.system.is_some();

        match (self.behaviour, translating) {
            (Behaviour::FailFirst, false) | (Behaviour::FailTranslation, true) => Err(
                BedrockError::Invocation("service unavailable".to_string()),
            ),
            (_, false) => Ok(Generation {
                text: "# Photosynthesis\n1. What do leaves need?".to_string(),
                usage: Some(TokenCount {
                    input: 100,
                    output: 200,
                }),
            }),
            (_, true) => Ok(Generation {
                text: format!("```latex\n{LATEX}\n```"),
                usage: Some(TokenCount {
                    input: 200,
                    output: 300,
                }),
            }),
        }
    }
}

struct Harness {
    app: Router,
    calls: Arc<AtomicUsize>,
    scratch: TempDir,
}

fn harness(behaviour: Behaviour, engine: &str) -> Harness {
    let calls = Arc::new(AtomicUsize::new(0));
    let scratch = TempDir::new().unwrap();
    let generator = StubGenerator {
        behaviour,
        calls: Arc::clone(&calls),
    };
    let state = AppState::new(
        ContentPipeline::new(generator, PipelineOptions::default()),
        PdfRenderer::new(RenderOptions {
            engine: engine.to_string(),
            compile_timeout: Duration::from_secs(10),
            scratch_root: Some(scratch.path().to_path_buf()),
            ..RenderOptions::default()
        }),
    );

    Harness {
        app: router(state),
        calls,
        scratch,
    }
}

const MISSING_ENGINE: &str = "/nonexistent/texlive/bin/pdflatex";

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn worksheet_form() -> Value {
    json!({
        "subject": "Photosynthesis",
        "audience": "5th Grade",
        "objectives": "Explain how plants make food",
        "details": ""
    })
}

fn assert_empty(dir: &Path) {
    assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let h = harness(Behaviour::Succeed, MISSING_ENGINE);

    let (status, body) = send_json(&h.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn index_serves_the_form() {
    let h = harness(Behaviour::Succeed, MISSING_ENGINE);

    let (status, body) = send(&h.app, get("/")).await;
    let page = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<form"));
    assert!(page.contains("/api/worksheets"));
}

#[tokio::test]
async fn blank_fields_are_rejected_without_calling_the_model() {
    let h = harness(Behaviour::Succeed, MISSING_ENGINE);

    let (status, body) = send_json(
        &h.app,
        post_json("/api/worksheets", json!({ "subject": "Fractions", "audience": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("please fill in all required fields"));
    assert!(message.contains("audience, objectives"));
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_failure_is_bad_gateway() {
    let h = harness(Behaviour::FailFirst, MISSING_ENGINE);

    let (status, body) = send_json(&h.app, post_json("/api/worksheets", worksheet_form())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("failed to generate worksheet"));
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_translation_still_returns_the_worksheet() {
    let h = harness(Behaviour::FailTranslation, MISSING_ENGINE);

    let (status, body) = send_json(&h.app, post_json("/api/worksheets", worksheet_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["worksheet"]["file_name"], "Photosynthesis_worksheet.md");
    assert_eq!(body["worksheet"]["mime_type"], "text/markdown");
    assert!(body["worksheet"]["content"]
        .as_str()
        .unwrap()
        .starts_with("# Photosynthesis"));
    assert!(body["latex"].is_null());
    assert!(body["pdf"].is_null());

    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["kind"], "translation");
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_engine_keeps_the_latex_and_warns() {
    let h = harness(Behaviour::Succeed, MISSING_ENGINE);

    let (status, body) = send_json(&h.app, post_json("/api/worksheets", worksheet_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latex"]["file_name"], "Photosynthesis_worksheet.tex");
    assert_eq!(body["latex"]["mime_type"], "application/x-tex");
    assert_eq!(body["latex"]["content"], LATEX);
    assert!(body["pdf"].is_null());

    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["kind"], "render");
    assert!(warnings[0]["message"]
        .as_str()
        .unwrap()
        .contains("requires a LaTeX installation"));

    assert_eq!(body["usage"]["tokens"]["input"], 300);
    assert_eq!(body["usage"]["tokens"]["output"], 500);
    assert_empty(h.scratch.path());
}

#[tokio::test]
async fn pdf_endpoint_rejects_blank_latex() {
    let h = harness(Behaviour::Succeed, MISSING_ENGINE);

    let (status, body) = send_json(
        &h.app,
        post_json("/api/worksheets/pdf", json!({ "subject": "Fractions", "latex": " \n" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "latex must not be empty");
}

#[tokio::test]
async fn pdf_endpoint_without_engine_is_unprocessable() {
    let h = harness(Behaviour::Succeed, MISSING_ENGINE);

    let (status, body) = send_json(
        &h.app,
        post_json("/api/worksheets/pdf", json!({ "subject": "Fractions", "latex": LATEX })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Could not generate PDF"));
    assert!(message.contains("compile it locally"));
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    assert_empty(h.scratch.path());
}

#[cfg(unix)]
#[tokio::test]
async fn pdf_endpoint_returns_an_attachment() {
    use std::os::unix::fs::PermissionsExt;

    let bin = TempDir::new().unwrap();
    let program = bin.path().join("fake-pdflatex");
    std::fs::write(
        &program,
        r#"#!/bin/sh
out=''
prev=''
for arg in "$@"; do
  if [ "$prev" = "-output-directory" ]; then out="$arg"; fi
  prev="$arg"
done
printf '%%PDF-1.4\n' > "$out/worksheet.pdf"
"#,
    )
    .unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

    let h = harness(Behaviour::Succeed, program.to_str().unwrap());
    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/worksheets/pdf",
            json!({ "subject": "World War II", "latex": LATEX }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"World_War_II_worksheet.pdf\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF-"));
    assert_empty(h.scratch.path());
}
