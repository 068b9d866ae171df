//! Router tests for the single-page web surface, driven with `oneshot`.

#![cfg(feature = "server")]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use codedoc::server::{router, AppState};
use codedoc::{CodeDocError, CompletionClient, GeneratorConfig};
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "----codedoc-test-boundary";

struct CannedClient {
    reply: Result<String, fn() -> CodeDocError>,
    calls: AtomicUsize,
}

impl CannedClient {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn err(make: fn() -> CodeDocError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(make),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionClient for CannedClient {
    fn describe(&self) -> String {
        "canned".into()
    }

    async fn complete(&self, _prompt: &str) -> Result<String, CodeDocError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make()),
        }
    }
}

fn app(client: Arc<CannedClient>) -> axum::Router {
    router(AppState::new(client, GeneratorConfig::default()))
}

/// Multipart body with an optional file part and a prompt part.
fn form(file: Option<(&str, &[u8])>, prompt: &str) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/x-python\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{prompt}\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    body
}

fn post_form(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_serves_the_form() {
    let response = app(CannedClient::ok("unused"))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"enctype="multipart/form-data""#));
    assert!(html.contains(r#"accept=".py""#));
    assert!(html.contains(codedoc::DEFAULT_INSTRUCTION));
}

#[tokio::test]
async fn generate_returns_document_and_download_link() {
    let client = CannedClient::ok("# Overview\nPrints <b>hi</b>.");
    let response = app(client.clone())
        .oneshot(post_form(form(
            Some(("hello.py", &br#"print("hi")"#[..])),
            "Describe the code",
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    let html = body_text(response).await;
    assert!(html.contains("print(&quot;hi&quot;)"));
    assert!(html.contains("<h1>Overview</h1>"));
    assert!(!html.contains("<b>hi</b>"), "raw model HTML must not be interpreted");
    assert!(html.contains(r#"download="code_document_"#));

    let start = html.find("data:application/pdf;base64,").unwrap() + "data:application/pdf;base64,".len();
    let end = start + html[start..].find('"').unwrap();
    let pdf = STANDARD.decode(&html[start..end]).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn missing_file_shows_info_without_calling_the_model() {
    let client = CannedClient::ok("unused");
    let response = app(client.clone())
        .oneshot(post_form(form(None, "Describe the code")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    let html = body_text(response).await;
    assert!(html.contains(r#"class="notice info""#));
    assert!(html.contains("Please upload a Python file"));
}

#[tokio::test]
async fn empty_prompt_shows_info_without_calling_the_model() {
    let client = CannedClient::ok("unused");
    let response = app(client.clone())
        .oneshot(post_form(form(Some(("a.py", &b"x = 1"[..])), "")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    assert!(body_text(response).await.contains("notice info"));
}

#[tokio::test]
async fn binary_upload_is_unprocessable() {
    let client = CannedClient::ok("unused");
    let response = app(client.clone())
        .oneshot(post_form(form(Some(("blob.py", &[0xffu8, 0xfe, 0x00, 0x81][..])), "Describe")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    let html = body_text(response).await;
    assert!(html.contains(r#"role="alert""#));
    assert!(html.contains("could not be read as text"));
}

#[tokio::test]
async fn service_failure_is_bad_gateway() {
    let client = CannedClient::err(|| CodeDocError::ServiceUnreachable {
        base_url: "http://localhost:11434".into(),
        detail: "connection refused".into(),
    });
    let response = app(client)
        .oneshot(post_form(form(Some(("a.py", &b"pass"[..])), "Describe")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(response).await;
    assert!(html.contains("could not produce a document"));
    assert!(!html.contains("Download as PDF"));
}

#[tokio::test]
async fn unencodable_response_is_a_server_error() {
    let response = app(CannedClient::ok("flow: a → b"))
        .oneshot(post_form(form(Some(("a.py", &b"pass"[..])), "Describe")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response)
        .await
        .contains("could not be converted to PDF"));
}
