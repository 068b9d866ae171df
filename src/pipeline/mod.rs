//! Pipeline stages for code-document generation.
//!
//! Each submodule implements one step; the request handler in
//! [`crate::generate`] strings them together.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ prompts ──▶ llm ──▶ postprocess ──▶ render / export
//! (bytes)   (template)  (model)  (optional)     (HTML, PDF)
//! ```
//!
//! 1. [`input`]: presence check, `.py` filter, strict UTF-8 decode
//! 2. [`llm`]: the only stage with network I/O; one request, no retry
//! 3. [`postprocess`]: optional fence/line-ending cleanup of the response
//! 4. [`render`]: HTML and terminal presentation
//! 5. [`export`]: PDF bytes through a staging file, timestamped filename

pub mod export;
pub mod input;
pub mod llm;
pub mod postprocess;
pub mod render;
