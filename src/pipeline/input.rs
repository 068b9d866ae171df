//! Input collection: the upload filter, the presence check, and decoding.
//!
//! The pipeline only runs when a file is present *and* the instruction is
//! non-empty. Decoding happens before anything else touches the network so a
//! binary upload never costs a model call.

use crate::error::CodeDocError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension accepted by the upload filter.
pub const ACCEPTED_EXTENSION: &str = "py";

/// Message shown instead of running the pipeline.
pub const MISSING_INPUT_MESSAGE: &str =
    "Please upload a Python file and enter a prompt to generate the document.";

/// True when both required inputs are present.
pub fn has_required_inputs(upload: Option<&[u8]>, instruction: &str) -> bool {
    upload.is_some() && !instruction.is_empty()
}

/// Whether `path` passes the upload filter. The check is by name only.
pub fn accepts_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ACCEPTED_EXTENSION))
}

/// Decode uploaded bytes as strict UTF-8.
pub fn decode_source(bytes: &[u8]) -> Result<String, CodeDocError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => {
            debug!("Decoded {} bytes of source", bytes.len());
            Ok(s.to_owned())
        }
        Err(e) => {
            warn!("Upload rejected: invalid UTF-8 at byte {}", e.valid_up_to());
            Err(CodeDocError::Decode {
                valid_up_to: e.valid_up_to(),
            })
        }
    }
}

/// Read a local source file for the CLI, applying the upload filter.
pub async fn read_local(path: &Path) -> Result<Vec<u8>, CodeDocError> {
    let path_buf = PathBuf::from(path);
    if !accepts_extension(path) {
        return Err(CodeDocError::UnsupportedFileType {
            path: path_buf,
            expected: ACCEPTED_EXTENSION.to_string(),
        });
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!("Read {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(CodeDocError::PermissionDenied { path: path_buf })
        }
        Err(_) => Err(CodeDocError::FileNotFound { path: path_buf }),
    }
}
