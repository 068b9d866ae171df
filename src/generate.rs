//! Request handling: one user action in, one document out.
//!
//! [`handle_request`] is the whole interaction as an explicit function. It
//! takes the two user inputs plus the long-lived client and config, and
//! returns either an informational outcome (inputs missing, nothing done)
//! or the generated document. The CLI and the web page are thin shims
//! over it.

use crate::config::GeneratorConfig;
use crate::error::CodeDocError;
use crate::pipeline::export::{self, ExportedPdf};
use crate::pipeline::llm::{client_from_config, CompletionClient};
use crate::pipeline::{input, postprocess};
use crate::prompts;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Everything produced by one successful interaction.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Decoded upload.
    pub source: String,
    /// Model response (after optional cleanup).
    pub markdown: String,
    /// PDF rendition of `markdown`.
    pub pdf: ExportedPdf,
    pub stats: GenerationStats,
}

/// Sizes and timings of one interaction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub source_bytes: usize,
    pub prompt_bytes: usize,
    pub markdown_bytes: usize,
    pub pdf_bytes: usize,
    pub llm_duration_ms: u64,
    pub export_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Result of handling one user action.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A required input was missing; the completion service was not called.
    NeedsInput { message: String },
    /// The pipeline ran to completion.
    Generated(Box<GeneratedDocument>),
}

/// Run the pipeline for one user action.
///
/// # Arguments
/// * `client`: completion backend, built once at start-up
/// * `upload`: uploaded file bytes, `None` when nothing was uploaded
/// * `instruction`: free-text instruction from the user
/// * `config`: shared generator configuration
///
/// # Errors
/// * decode failure before any network call
/// * service failure from `client`
/// * rendering failure while building the PDF
pub async fn handle_request(
    client: &dyn CompletionClient,
    upload: Option<&[u8]>,
    instruction: &str,
    config: &GeneratorConfig,
) -> Result<Outcome, CodeDocError> {
    if !input::has_required_inputs(upload, instruction) {
        debug!("Missing upload or instruction; skipping generation");
        return Ok(Outcome::NeedsInput {
            message: input::MISSING_INPUT_MESSAGE.to_string(),
        });
    }
    let total_start = Instant::now();

    // ── Step 1: Decode upload ────────────────────────────────────────────
    let source = input::decode_source(upload.unwrap_or_default())?;

    // ── Step 2: Fill prompt ──────────────────────────────────────────────
    let prompt = prompts::fill_prompt(instruction, &source);
    if let Some(ref cb) = config.progress_callback {
        cb.on_request_start(prompt.len());
    }

    // ── Step 3: Completion request ───────────────────────────────────────
    info!("Requesting completion from {}", client.describe());
    let llm_start = Instant::now();
    let response = client.complete(&prompt).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;
    info!(
        "Completion received: {} bytes in {}ms",
        response.len(),
        llm_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_completion_received(response.len(), llm_duration_ms);
    }

    let markdown = if config.clean_response {
        postprocess::clean_response(&response)
    } else {
        response
    };

    // ── Step 4: Export ───────────────────────────────────────────────────
    let export_start = Instant::now();
    let export_config = config.export.clone();
    let text = markdown.clone();
    let pdf = tokio::task::spawn_blocking(move || export::export_pdf(&text, &export_config))
        .await
        .map_err(|e| CodeDocError::Internal(format!("Export task panicked: {e}")))??;
    let export_duration_ms = export_start.elapsed().as_millis() as u64;
    info!("Exported {} ({} bytes)", pdf.filename, pdf.bytes.len());
    if let Some(ref cb) = config.progress_callback {
        cb.on_export_complete(&pdf.filename, pdf.bytes.len());
    }

    let stats = GenerationStats {
        source_bytes: source.len(),
        prompt_bytes: prompt.len(),
        markdown_bytes: markdown.len(),
        pdf_bytes: pdf.bytes.len(),
        llm_duration_ms,
        export_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(Outcome::Generated(Box::new(GeneratedDocument {
        source,
        markdown,
        pdf,
        stats,
    })))
}

/// Read a local `.py` file and run the pipeline on it.
pub async fn generate_from_path(
    client: &dyn CompletionClient,
    path: impl AsRef<Path>,
    instruction: &str,
    config: &GeneratorConfig,
) -> Result<Outcome, CodeDocError> {
    let path = path.as_ref();
    info!("Generating document for {}", path.display());
    let bytes = input::read_local(path).await?;
    handle_request(client, Some(&bytes), instruction, config).await
}

/// Write an exported PDF to `path`, creating parent directories.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_pdf_file(pdf: &ExportedPdf, path: impl AsRef<Path>) -> Result<(), CodeDocError> {
    let path = path.as_ref();
    let write_err = |source| CodeDocError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &pdf.bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

/// Synchronous wrapper: build the client from `config` and run
/// [`generate_from_path`] on a private tokio runtime.
pub fn generate_sync(
    path: impl AsRef<Path>,
    instruction: &str,
    config: &GeneratorConfig,
) -> Result<Outcome, CodeDocError> {
    let client = client_from_config(&config.service)?;
    tokio::runtime::Runtime::new()
        .map_err(|e| CodeDocError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate_from_path(client.as_ref(), path, instruction, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_pdf_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out/nested/doc.pdf");
        let pdf = ExportedPdf {
            filename: "doc.pdf".into(),
            bytes: b"%PDF-1.5 test".to_vec(),
        };
        write_pdf_file(&pdf, &target).await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), pdf.bytes);
        assert!(!target.with_extension("pdf.tmp").exists());
    }

    #[test]
    fn generate_sync_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_sync(
            dir.path().join("absent.py"),
            prompts::DEFAULT_INSTRUCTION,
            &GeneratorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CodeDocError::FileNotFound { .. }), "{err}");
    }
}
