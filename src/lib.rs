//! # codedoc
//!
//! Generate a design document for a Python source file with a local LLM,
//! and export it as a PDF.
//!
//! ## What it does
//!
//! The user supplies two things: a `.py` file and a free-text instruction.
//! Both are substituted into a fixed prompt template, sent to a completion
//! service (Ollama's `llama3` at `http://localhost:11434` by default), and
//! the Markdown that comes back is shown next to the source and rendered
//! into a PDF with one text block per response line.
//!
//! ## Pipeline Overview
//!
//! ```text
//! .py upload + instruction
//!  │
//!  ├─ 1. Input    presence check, strict UTF-8 decode
//!  ├─ 2. Prompt   fill CODE_DOC_TEMPLATE
//!  ├─ 3. LLM      one non-streaming completion call (Ollama / edgequake-llm)
//!  ├─ 4. Polish   optional fence + line-ending cleanup
//!  └─ 5. Export   A4 PDF via staging file, code_document_YYYYMMDD_HHMMSS.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codedoc::{client_from_config, generate_from_path, GeneratorConfig, Outcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::default();
//!     let client = client_from_config(&config.service)?;
//!     let outcome = generate_from_path(
//!         client.as_ref(),
//!         "script.py",
//!         codedoc::DEFAULT_INSTRUCTION,
//!         &config,
//!     )
//!     .await?;
//!     if let Outcome::Generated(doc) = outcome {
//!         println!("{}", doc.markdown);
//!         std::fs::write(&doc.pdf.filename, &doc.pdf.bytes)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `codedoc` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | on      | Enables the single-page web surface (`codedoc serve`, axum) |
//!
//! Disable both when using only the library:
//! ```toml
//! codedoc = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExportConfig, GeneratorConfig, GeneratorConfigBuilder, ServiceConfig};
pub use error::{CodeDocError, ErrorKind};
pub use generate::{
    generate_from_path, generate_sync, handle_request, write_pdf_file, GeneratedDocument,
    GenerationStats, Outcome,
};
pub use pipeline::export::{export_filename, ExportedPdf};
pub use pipeline::llm::{client_from_config, CompletionClient, OllamaClient, ProviderClient};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use prompts::{fill_prompt, DEFAULT_INSTRUCTION};
