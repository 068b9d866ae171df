//! Document export: completion text → PDF bytes ready for download.
//!
//! The PDF is written to a transient staging file and read back into memory
//! before being handed out. The staging file is a
//! [`tempfile::NamedTempFile`], removed when it goes out of scope.

use crate::config::ExportConfig;
use crate::error::CodeDocError;
use crate::pdf;
use chrono::{DateTime, Local, TimeZone};
use std::io::Write;
use tracing::debug;

/// MIME type of the exported document.
pub const PDF_MIME: &str = "application/pdf";

/// Timestamp format embedded in export filenames.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// An exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPdf {
    /// Suggested download name, `code_document_<YYYYMMDD_HHMMSS>.pdf`.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Download filename for an export made at `at`.
pub fn export_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("code_document_{}.pdf", at.format(FILENAME_TIMESTAMP_FORMAT))
}

/// Write `bytes` to a transient file and read them back.
pub fn stage_and_read_back(bytes: &[u8]) -> Result<Vec<u8>, CodeDocError> {
    let staging_err = |source| CodeDocError::StagingFailed { source };

    let mut staged = tempfile::Builder::new()
        .prefix("code_document_")
        .suffix(".pdf")
        .tempfile()
        .map_err(staging_err)?;
    staged.write_all(bytes).map_err(staging_err)?;
    staged.flush().map_err(staging_err)?;

    let read_back = std::fs::read(staged.path()).map_err(staging_err)?;
    debug!(
        "Staged {} bytes at {}",
        read_back.len(),
        staged.path().display()
    );
    Ok(read_back)
}

/// Render `markdown` to a PDF, stage it, and name it for the current time.
///
/// Blocking: call from `spawn_blocking` inside async code.
pub fn export_pdf(markdown: &str, config: &ExportConfig) -> Result<ExportedPdf, CodeDocError> {
    let rendered = pdf::render_pdf(markdown, config)?;
    let bytes = stage_and_read_back(&rendered)?;
    Ok(ExportedPdf {
        filename: export_filename(&Local::now()),
        bytes,
    })
}
