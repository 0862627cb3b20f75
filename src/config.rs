//! Configuration for the extraction pipeline.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share the config across requests and to
//! construct fully-specified instances in tests (including pointing
//! `api_url` at a mock endpoint).

use crate::error::ExtractError;

/// Default Anthropic Messages API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Default vision model used for extraction.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for structured-data extraction.
///
/// # Example
/// ```rust
/// use formsight::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .api_key("sk-ant-...")
///     .model("claude-sonnet-4-20250514")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// API key for the model endpoint. Required.
    pub api_key: String,

    /// Messages API endpoint URL. Default: [`DEFAULT_API_URL`].
    ///
    /// Overridable so tests can target a local mock server.
    pub api_url: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum tokens the model may generate. Default: 1024.
    ///
    /// Form extraction produces one compact tool call, not prose; 1024
    /// covers even large schemas with headroom.
    pub max_tokens: u32,

    /// Maximum rendered image dimension (width or height) in pixels.
    /// Default: 2000.
    ///
    /// Caps memory regardless of physical page size. An A0 poster page
    /// would otherwise rasterise to a multi-hundred-megabyte bitmap.
    pub max_rendered_pixels: u32,
}

impl std::fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder::default()
    }

    /// Load the configuration from environment variables.
    ///
    /// `ANTHROPIC_API_KEY` is required; `FORMSIGHT_MODEL`,
    /// `FORMSIGHT_API_URL`, and `FORMSIGHT_MAX_TOKENS` override defaults.
    pub fn from_env() -> Result<Self, ExtractError> {
        let mut builder = Self::builder().api_key(
            std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| ExtractError::InvalidConfig("ANTHROPIC_API_KEY is not set".into()))?,
        );
        if let Ok(model) = std::env::var("FORMSIGHT_MODEL") {
            builder = builder.model(model);
        }
        if let Ok(url) = std::env::var("FORMSIGHT_API_URL") {
            builder = builder.api_url(url);
        }
        if let Ok(raw) = std::env::var("FORMSIGHT_MAX_TOKENS") {
            let n = raw.parse().map_err(|_| {
                ExtractError::InvalidConfig(format!("FORMSIGHT_MAX_TOKENS is not a number: {raw}"))
            })?;
            builder = builder.max_tokens(n);
        }
        builder.build()
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    api_key: Option<String>,
    api_url: String,
    model: String,
    max_tokens: u32,
    max_rendered_pixels: u32,
}

impl Default for ExtractionConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            max_rendered_pixels: 2000,
        }
    }
}

impl ExtractionConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = n;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.max_rendered_pixels = px.max(100);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ExtractError::InvalidConfig("API key must be set".into()))?;
        if self.max_tokens == 0 {
            return Err(ExtractError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(ExtractionConfig {
            api_key,
            api_url: self.api_url,
            model: self.model,
            max_tokens: self.max_tokens,
            max_rendered_pixels: self.max_rendered_pixels,
        })
    }
}
