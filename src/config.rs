//! Configuration types for contract-document generation.
//!
//! All batch behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to log a run's parameters and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor breaks on every new field. The builder lets
//! callers set only what they care about and rely on documented defaults.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ContractGenError;

/// Which document assembler produces the final artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Draw the PDF directly: title page, table of contents, styled
    /// tables, running header/footer. One `.pdf` per record. (default)
    #[default]
    Pdf,
    /// Render an HTML document and convert it with an external
    /// `wkhtmltopdf`. One `.html` plus one `.pdf` per record.
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }
}

/// One way of invoking the external HTML-to-PDF renderer.
///
/// The original tooling nested three ad-hoc exception handlers around
/// `wkhtmltopdf`; here the degradation path is an explicit ordered list,
/// tried in sequence, stopping at the first success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderStrategy {
    /// Full option set: Letter page, 25 mm margins, UTF-8, local-file
    /// access, running header/footer text, quiet.
    FullOptions,
    /// Feed the HTML through stdin instead of a file path. Helps when the
    /// renderer refuses local file access.
    StdinInput,
    /// Minimal options: page size and encoding only. Last resort for old
    /// or patched `wkhtmltopdf` builds that reject header/footer flags.
    MinimalOptions,
}

impl RenderStrategy {
    /// The default fallback order.
    pub const DEFAULT_ORDER: [RenderStrategy; 3] = [
        RenderStrategy::FullOptions,
        RenderStrategy::StdinInput,
        RenderStrategy::MinimalOptions,
    ];
}

/// Configuration for one batch of contract documents.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use contractgen::{GenerationConfig, OutputFormat};
///
/// let config = GenerationConfig::builder()
///     .format(OutputFormat::Html)
///     .temperature(0.5)
///     .output_dir("contracts")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// Model identifier sent to the content service.
    /// Default: "claude-3-sonnet-20240229" (the model the original
    /// deployment pinned).
    pub model: String,

    /// Base URL of the content service. Default: "https://api.anthropic.com".
    ///
    /// Overridable so tests and self-hosted gateways can point the client
    /// at a local endpoint without touching the request-building code.
    pub base_url: String,

    /// Sampling temperature for content generation. Default: 0.7.
    ///
    /// Contract prose benefits from some variety; 0.7 matches the original
    /// deployment. Lower it if table replies drift from the requested
    /// pipe-delimited shape.
    pub temperature: f32,

    /// Maximum tokens per content reply. Default: 4096.
    ///
    /// A full contract body runs 2–3k tokens; the tables well under 1k.
    /// Setting this too low truncates the contract mid-section, which the
    /// parser cannot detect.
    pub max_tokens: usize,

    /// Per-request timeout in seconds. Default: 120.
    ///
    /// There is deliberately no retry: a timed-out call is a failed
    /// content kind and fails the whole record at the batch gate.
    pub api_timeout_secs: u64,

    /// Which assembler variant to run. Default: [`OutputFormat::Pdf`].
    pub format: OutputFormat,

    /// Output directory, created if absent. Default: "contracts".
    pub output_dir: PathBuf,

    /// Filename stem. Artifacts are named
    /// `{base_name}_{abbrev}_{YYYYMMDD}.{ext}`. Default:
    /// "Transportation_Contract".
    pub base_name: String,

    /// Path to the `wkhtmltopdf` executable. Default: "wkhtmltopdf"
    /// (resolved through `PATH`). Only used by the HTML variant.
    pub wkhtmltopdf: PathBuf,

    /// Ordered render strategies for the HTML variant. The first one that
    /// produces a PDF wins; when all fail the record fails (its `.html`
    /// artifact is kept). Default: [`RenderStrategy::DEFAULT_ORDER`].
    pub render_strategies: Vec<RenderStrategy>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-sonnet-20240229".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            api_timeout_secs: 120,
            format: OutputFormat::default(),
            output_dir: PathBuf::from("contracts"),
            base_name: "Transportation_Contract".to_string(),
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
            render_strategies: RenderStrategy::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("format", &self.format)
            .field("output_dir", &self.output_dir)
            .field("base_name", &self.base_name)
            .field("render_strategies", &self.render_strategies)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 1.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.config.base_name = name.into();
        self
    }

    pub fn wkhtmltopdf(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wkhtmltopdf = path.into();
        self
    }

    pub fn render_strategies(mut self, strategies: Vec<RenderStrategy>) -> Self {
        self.config.render_strategies = strategies;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, ContractGenError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ContractGenError::InvalidConfig(
                "model must not be empty".into(),
            ));
        }
        if c.base_name.trim().is_empty() {
            return Err(ContractGenError::InvalidConfig(
                "base_name must not be empty".into(),
            ));
        }
        if c.base_name.contains(['/', '\\']) {
            return Err(ContractGenError::InvalidConfig(format!(
                "base_name must not contain path separators, got '{}'",
                c.base_name
            )));
        }
        if c.render_strategies.is_empty() {
            return Err(ContractGenError::InvalidConfig(
                "at least one render strategy is required".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let config = GenerationConfig::builder().build().unwrap();
        assert_eq!(config.format, OutputFormat::Pdf);
        assert_eq!(config.base_name, "Transportation_Contract");
        assert_eq!(config.render_strategies.len(), 3);
    }

    #[test]
    fn temperature_is_clamped() {
        let config = GenerationConfig::builder().temperature(3.0).build().unwrap();
        assert_eq!(config.temperature, 1.0);
    }

    #[test]
    fn base_name_with_separator_rejected() {
        let err = GenerationConfig::builder()
            .base_name("out/prefix")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("path separators"));
    }

    #[test]
    fn empty_strategies_rejected() {
        let err = GenerationConfig::builder()
            .render_strategies(vec![])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("render strategy"));
    }
}
