//! Configuration types for code-document generation.
//!
//! All behaviour is controlled through [`GeneratorConfig`], built via its
//! [`GeneratorConfigBuilder`]. It groups the two things a run needs to know:
//! where the completion service lives ([`ServiceConfig`]) and how the PDF
//! page looks ([`ExportConfig`]).
//!
//! The config is constructed once at process start and shared read-only by
//! every request, together with the client built from
//! [`GeneratorConfig::service`].

use crate::error::CodeDocError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default model served by the local Ollama instance.
pub const DEFAULT_MODEL: &str = "llama3";

/// Default Ollama base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Where and how to reach the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Model identifier, e.g. "llama3", "codellama:13b". Default: "llama3".
    pub model: String,

    /// Base URL of the Ollama server. Default: "http://localhost:11434".
    ///
    /// Ignored when [`ServiceConfig::provider`] names a hosted provider.
    pub base_url: String,

    /// Hosted provider name ("openai", "anthropic", "gemini", …).
    ///
    /// `None` (default) talks to Ollama's native API at `base_url`.
    pub provider: Option<String>,

    /// Per-request timeout in seconds. Default: none, the call blocks until
    /// the model finishes.
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            provider: None,
            timeout_secs: None,
        }
    }
}

/// Page geometry and typography of the exported PDF.
///
/// Lengths are in millimetres, matching how the layout is usually described;
/// [`crate::pdf`] converts to points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Font size in points. Default: 12.
    pub font_size: f32,
    /// Height of one text row. Default: 10 mm.
    pub line_height_mm: f32,
    /// Left, right and top page margin. Default: 10 mm.
    pub margin_mm: f32,
    /// Distance from the bottom edge at which a new page starts. Default: 15 mm.
    pub page_break_margin_mm: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            line_height_mm: 10.0,
            margin_mm: 10.0,
            page_break_margin_mm: 15.0,
        }
    }
}

/// Configuration for one code-document generator.
///
/// Built via [`GeneratorConfig::builder()`] or using
/// [`GeneratorConfig::default()`].
///
/// # Example
/// ```rust
/// use codedoc::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .model("codellama")
///     .base_url("http://gpu-box:11434")
///     .build()
///     .unwrap();
/// assert_eq!(config.service.model, "codellama");
/// ```
#[derive(Clone, Default)]
pub struct GeneratorConfig {
    /// Completion service location.
    pub service: ServiceConfig,

    /// PDF layout.
    pub export: ExportConfig,

    /// Strip an outer ```` ```markdown ```` fence and normalise line endings
    /// in the model response. Default: false (response used verbatim).
    pub clean_response: bool,

    /// Optional progress callback for stage events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("service", &self.service)
            .field("export", &self.export)
            .field("clean_response", &self.clean_response)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.service.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.service.base_url = url.into();
        self
    }

    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.config.service.provider = Some(name.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.service.timeout_secs = Some(secs);
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.export.font_size = pt;
        self
    }

    pub fn line_height_mm(mut self, mm: f32) -> Self {
        self.config.export.line_height_mm = mm;
        self
    }

    pub fn clean_response(mut self, v: bool) -> Self {
        self.config.clean_response = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, CodeDocError> {
        let c = &self.config;
        if c.service.model.trim().is_empty() {
            return Err(CodeDocError::InvalidConfig("model must not be empty".into()));
        }
        // Hosted providers use their own endpoints.
        if c.service.provider.is_none()
            && !(c.service.base_url.starts_with("http://")
                || c.service.base_url.starts_with("https://"))
        {
            return Err(CodeDocError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                c.service.base_url
            )));
        }
        if !(4.0..=72.0).contains(&c.export.font_size) {
            return Err(CodeDocError::InvalidConfig(format!(
                "font size must be 4–72 pt, got {}",
                c.export.font_size
            )));
        }
        if c.export.line_height_mm <= 0.0 {
            return Err(CodeDocError::InvalidConfig(
                "line height must be positive".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_ollama() {
        let config = GeneratorConfig::default();
        assert_eq!(config.service.model, "llama3");
        assert_eq!(config.service.base_url, "http://localhost:11434");
        assert_eq!(config.service.timeout_secs, None);
        assert!(config.service.provider.is_none());
        assert!(!config.clean_response);
        assert_eq!(config.export.font_size, 12.0);
    }

    #[test]
    fn builder_sets_service_fields() {
        let config = GeneratorConfig::builder()
            .model("codellama")
            .base_url("https://ollama.internal")
            .timeout_secs(90)
            .build()
            .expect("valid config");
        assert_eq!(config.service.model, "codellama");
        assert_eq!(config.service.base_url, "https://ollama.internal");
        assert_eq!(config.service.timeout_secs, Some(90));
    }

    #[test]
    fn rejects_empty_model() {
        let err = GeneratorConfig::builder().model("  ").build().unwrap_err();
        assert!(matches!(err, CodeDocError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = GeneratorConfig::builder()
            .base_url("localhost:11434")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http://"), "got: {err}");
    }

    #[test]
    fn provider_skips_base_url_check() {
        let config = GeneratorConfig::builder()
            .provider("openai")
            .model("gpt-4.1-mini")
            .base_url("")
            .build()
            .expect("hosted provider ignores base URL");
        assert_eq!(config.service.provider.as_deref(), Some("openai"));
    }

    #[test]
    fn rejects_font_size_out_of_range() {
        assert!(GeneratorConfig::builder().font_size(2.0).build().is_err());
        assert!(GeneratorConfig::builder().font_size(100.0).build().is_err());
        assert!(GeneratorConfig::builder().font_size(10.0).build().is_ok());
    }
}
