//! Error types for the codedoc library.
//!
//! A single fatal error type, [`CodeDocError`], covers every way one
//! interaction can fail. The variants group into a small set of
//! [`ErrorKind`]s so presentation layers (CLI, web page) can choose a
//! message and status without matching on every variant:
//!
//! * **Decode**: the upload is not UTF-8 text. Raised before any network call.
//! * **Service**: the completion endpoint is unreachable, slow, or returned
//!   something unusable.
//! * **Rendering**: the completion contains a character the PDF font cannot
//!   encode, or the PDF writer failed.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the codedoc library.
#[derive(Debug, Error)]
pub enum CodeDocError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Source file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file does not pass the upload filter.
    #[error("Unsupported file type: '{path}' (expected a .{expected} file)")]
    UnsupportedFileType { path: PathBuf, expected: String },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The uploaded bytes are not valid UTF-8.
    #[error("Uploaded file is not valid UTF-8 text (invalid byte at offset {valid_up_to})")]
    Decode { valid_up_to: usize },

    // ── Service errors ────────────────────────────────────────────────────
    /// The completion endpoint could not be reached.
    #[error("Completion service at '{base_url}' is unreachable: {detail}\nIs Ollama running? Try: ollama serve")]
    ServiceUnreachable { base_url: String, detail: String },

    /// The completion call exceeded the configured timeout.
    #[error("Completion service did not answer within {secs}s")]
    ServiceTimeout { secs: u64 },

    /// The completion endpoint answered with an error.
    #[error("Completion service error (HTTP {status}): {message}")]
    ServiceError { status: u16, message: String },

    /// The endpoint answered 2xx but the body was not a completion.
    #[error("Completion service returned an unexpected response: {detail}")]
    MalformedResponse { detail: String },

    /// A hosted provider call failed.
    #[error("LLM API error from provider '{provider}': {message}")]
    LlmApiError { provider: String, message: String },

    /// A named provider could not be initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// A character in the completion cannot be encoded by the PDF font.
    #[error("Line {line}: character {ch:?} cannot be rendered with the document font")]
    UnsupportedGlyph { line: usize, ch: char },

    /// The PDF writer failed to serialise the document.
    #[error("Failed to write PDF: {0}")]
    PdfWriteFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The transient staging file could not be written or read back.
    #[error("Failed to stage exported PDF: {source}")]
    StagingFailed {
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`CodeDocError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Decode,
    Service,
    Rendering,
    Io,
    Config,
    Internal,
}

impl CodeDocError {
    /// Which failure class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodeDocError::FileNotFound { .. }
            | CodeDocError::PermissionDenied { .. }
            | CodeDocError::UnsupportedFileType { .. } => ErrorKind::Input,
            CodeDocError::Decode { .. } => ErrorKind::Decode,
            CodeDocError::ServiceUnreachable { .. }
            | CodeDocError::ServiceTimeout { .. }
            | CodeDocError::ServiceError { .. }
            | CodeDocError::MalformedResponse { .. }
            | CodeDocError::LlmApiError { .. }
            | CodeDocError::ProviderNotConfigured { .. } => ErrorKind::Service,
            CodeDocError::UnsupportedGlyph { .. } | CodeDocError::PdfWriteFailed(_) => {
                ErrorKind::Rendering
            }
            CodeDocError::StagingFailed { .. } | CodeDocError::OutputWriteFailed { .. } => {
                ErrorKind::Io
            }
            CodeDocError::InvalidConfig(_) => ErrorKind::Config,
            CodeDocError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// A short headline for the presentation layer, followed by the detail.
    pub fn user_message(&self) -> String {
        let headline = match self.kind() {
            ErrorKind::Input => "The selected file cannot be used.",
            ErrorKind::Decode => "The uploaded file could not be read as text.",
            ErrorKind::Service => "The language model could not produce a document.",
            ErrorKind::Rendering => "The generated document could not be converted to PDF.",
            ErrorKind::Io => "The PDF could not be saved.",
            ErrorKind::Config => "The tool is misconfigured.",
            ErrorKind::Internal => "Something went wrong.",
        };
        format!("{headline} {self}")
    }
}
