//! Progress-callback trait for generation stage events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GeneratorConfigBuilder::progress_callback`] to hear about
//! each stage of a request. The CLI uses it to drive a spinner while the
//! model is thinking; a web host could forward the events to a log.
//!
//! # Example
//!
//! ```rust
//! use codedoc::{GenerationProgressCallback, GeneratorConfig};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl GenerationProgressCallback for Printer {
//!     fn on_completion_received(&self, markdown_len: usize, elapsed_ms: u64) {
//!         eprintln!("{markdown_len} chars in {elapsed_ms}ms");
//!     }
//! }
//!
//! let config = GeneratorConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as a request moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// server shares one config across concurrent requests.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called just before the filled prompt is sent.
    ///
    /// # Arguments
    /// * `prompt_len`: byte length of the filled prompt
    fn on_request_start(&self, prompt_len: usize) {
        let _ = prompt_len;
    }

    /// Called when the completion service has answered.
    ///
    /// # Arguments
    /// * `markdown_len`: byte length of the response
    /// * `elapsed_ms`: wall-clock time spent waiting for the model
    fn on_completion_received(&self, markdown_len: usize, elapsed_ms: u64) {
        let _ = (markdown_len, elapsed_ms);
    }

    /// Called once the PDF has been produced and read back from staging.
    ///
    /// # Arguments
    /// * `filename`: suggested download name
    /// * `bytes`: size of the PDF
    fn on_export_complete(&self, filename: &str, bytes: usize) {
        let _ = (filename, bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GeneratorConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        prompt_len: AtomicUsize,
        markdown_len: AtomicUsize,
        exported: AtomicUsize,
    }

    impl GenerationProgressCallback for TrackingCallback {
        fn on_request_start(&self, prompt_len: usize) {
            self.prompt_len.store(prompt_len, Ordering::SeqCst);
        }

        fn on_completion_received(&self, markdown_len: usize, _elapsed_ms: u64) {
            self.markdown_len.store(markdown_len, Ordering::SeqCst);
        }

        fn on_export_complete(&self, _filename: &str, bytes: usize) {
            self.exported.store(bytes, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_request_start(120);
        cb.on_completion_received(42, 1500);
        cb.on_export_complete("code_document_20240101_000000.pdf", 1024);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_request_start(300);
        tracker.on_completion_received(80, 10);
        tracker.on_export_complete("x.pdf", 2048);

        assert_eq!(tracker.prompt_len.load(Ordering::SeqCst), 300);
        assert_eq!(tracker.markdown_len.load(Ordering::SeqCst), 80);
        assert_eq!(tracker.exported.load(Ordering::SeqCst), 2048);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_request_start(1);
    }
}
