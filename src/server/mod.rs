//! Single-page web surface for `codedoc serve`.
//!
//! ```text
//! GET  /          form: file picker (.py) + instruction box
//! POST /generate  multipart {file, prompt} → same page with result/notice
//! ```
//!
//! The client and config are built once and shared by every request through
//! [`AppState`]. Each request is independent; nothing is kept between them.
//! The PDF travels inside the response as a `data:` URI, so there is no
//! download endpoint and no server-side storage.

pub mod page;

use crate::config::GeneratorConfig;
use crate::error::{CodeDocError, ErrorKind};
use crate::generate::{handle_request, Outcome};
use crate::pipeline::llm::CompletionClient;
use crate::pipeline::render::{markdown_html, source_html, SOURCE_LANGUAGE};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use page::{Notice, PageView, ResultView};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared, read-only state of the web surface.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn CompletionClient>,
    pub config: Arc<GeneratorConfig>,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, config: GeneratorConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), CodeDocError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CodeDocError::Internal(format!("Failed to bind {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| CodeDocError::Internal(e.to_string()))?;
    info!("Serving on http://{local}");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| CodeDocError::Internal(format!("Server error: {e}")))
}

/// HTTP status for a failed generation.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Input => StatusCode::BAD_REQUEST,
        ErrorKind::Decode => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Service => StatusCode::BAD_GATEWAY,
        ErrorKind::Rendering | ErrorKind::Io | ErrorKind::Config | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn index() -> Html<String> {
    Html(page::render_page(&PageView::default()))
}

/// Fields of the submitted form.
#[derive(Debug, Default)]
struct FormInput {
    file: Option<Vec<u8>>,
    prompt: String,
}

async fn read_form(multipart: &mut Multipart) -> Result<FormInput, String> {
    let mut form = FormInput::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                // Browsers send an empty, unnamed part when no file is picked.
                let picked = field.file_name().is_some_and(|n| !n.is_empty());
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                if picked || !bytes.is_empty() {
                    form.file = Some(bytes.to_vec());
                }
            }
            Some("prompt") => {
                form.prompt = field.text().await.map_err(|e| e.to_string())?;
            }
            _ => {}
        }
    }
    Ok(form)
}

async fn generate(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!("Rejected malformed form: {e}");
            let view = PageView {
                notice: Some(Notice::Error(format!("The form could not be read: {e}"))),
                ..PageView::default()
            };
            return (StatusCode::BAD_REQUEST, Html(page::render_page(&view))).into_response();
        }
    };

    let outcome = handle_request(
        state.client.as_ref(),
        form.file.as_deref(),
        &form.prompt,
        &state.config,
    )
    .await;

    let mut view = PageView {
        instruction: form.prompt,
        ..PageView::default()
    };
    match outcome {
        Ok(Outcome::NeedsInput { message }) => {
            view.notice = Some(Notice::Info(message));
            Html(page::render_page(&view)).into_response()
        }
        Ok(Outcome::Generated(doc)) => {
            view.result = Some(ResultView {
                source_html: source_html(&doc.source, SOURCE_LANGUAGE),
                document_html: markdown_html(&doc.markdown),
                filename: doc.pdf.filename.clone(),
                pdf_base64: STANDARD.encode(&doc.pdf.bytes),
            });
            Html(page::render_page(&view)).into_response()
        }
        Err(e) => {
            warn!("Generation failed: {e}");
            let status = status_for(e.kind());
            view.notice = Some(Notice::Error(e.user_message()));
            (status, Html(page::render_page(&view))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_kind() {
        assert_eq!(status_for(ErrorKind::Decode), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::Service), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::Rendering), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::Input), StatusCode::BAD_REQUEST);
    }
}
