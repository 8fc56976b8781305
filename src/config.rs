//! Configuration types for question answering and the API proxy.
//!
//! All answering behaviour is controlled through [`QaConfig`], built via its
//! [`QaConfigBuilder`]. The server half has its own small [`ServerConfig`].
//! The CLI maps flags (with environment fallbacks) onto both.

use crate::error::PdfQaError;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Context length (in characters) beyond which the document is truncated.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 300_000;

/// Configuration for the question-answering client.
///
/// # Example
/// ```rust
/// use edgequake_pdfqa::QaConfig;
///
/// let config = QaConfig::builder()
///     .model("gemini-2.5-flash")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_context_chars, 300_000);
/// ```
#[derive(Clone)]
pub struct QaConfig {
    /// Model identifier sent with every request. Default: `gemini-2.5-flash`.
    pub model: String,

    /// Provider name understood by `edgequake_llm::ProviderFactory`.
    /// Default: `gemini`.
    pub provider_name: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`
    /// and skips the credential check.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Environment variable holding the provider credential. If `None`, the
    /// variable is derived from `provider_name` (see [`credential_var_for`]).
    pub credential_var: Option<String>,

    /// Maximum document characters embedded in the prompt. Default: 300 000.
    ///
    /// Longer documents keep only their beginning; nothing marks the cut.
    pub max_context_chars: usize,

    /// Sampling temperature. `None` leaves the provider default in place.
    pub temperature: Option<f32>,

    /// Maximum tokens the model may generate. `None` leaves the provider default.
    pub max_tokens: Option<usize>,

    /// Per-question timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            provider: None,
            credential_var: None,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            temperature: None,
            max_tokens: None,
            api_timeout_secs: 60,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for QaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QaConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("credential_var", &self.credential_var)
            .field("max_context_chars", &self.max_context_chars)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl QaConfig {
    /// Create a new builder for `QaConfig`.
    pub fn builder() -> QaConfigBuilder {
        QaConfigBuilder {
            config: Self::default(),
        }
    }

    /// The environment variable that must hold the provider credential, if any.
    pub fn credential_var(&self) -> Option<String> {
        self.credential_var
            .clone()
            .or_else(|| credential_var_for(&self.provider_name).map(str::to_string))
    }
}

/// Map a provider name to the environment variable its factory reads.
///
/// Local providers (ollama, lmstudio) need no credential and return `None`.
pub fn credential_var_for(provider: &str) -> Option<&'static str> {
    match provider.to_ascii_lowercase().as_str() {
        "gemini" | "google" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "azure" => Some("AZURE_OPENAI_API_KEY"),
        _ => None,
    }
}

/// Builder for [`QaConfig`].
#[derive(Debug)]
pub struct QaConfigBuilder {
    config: QaConfig,
}

impl QaConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn credential_var(mut self, var: impl Into<String>) -> Self {
        self.config.credential_var = Some(var.into());
        self
    }

    pub fn max_context_chars(mut self, n: usize) -> Self {
        self.config.max_context_chars = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<QaConfig, PdfQaError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PdfQaError::InvalidConfig("model must not be empty".into()));
        }
        if c.provider.is_none() && c.provider_name.trim().is_empty() {
            return Err(PdfQaError::InvalidConfig(
                "provider name must not be empty".into(),
            ));
        }
        if c.max_context_chars == 0 {
            return Err(PdfQaError::InvalidConfig(
                "max_context_chars must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(PdfQaError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for `pdfqa serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on. Default: `127.0.0.1:3000`.
    pub bind: String,

    /// Largest accepted request body in bytes. Default: 8 MiB.
    ///
    /// `pdfqa ask --server` cuts the context to its character budget before
    /// posting; other clients may not, and the server cuts again. A larger
    /// body is refused with 413 and a JSON error.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}
