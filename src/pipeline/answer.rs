//! Question answering: bounded prompt → hosted model → raw answer.
//!
//! Two seams live here:
//!
//! * [`Answerer`]: what the application depends on: `(context, question) →
//!   answer`. [`QaClient`] answers directly; [`crate::remote::RemoteAnswerer`]
//!   goes through a `pdfqa serve` instance that holds the credential.
//! * [`TextGenerator`]: the external text-generation capability used by
//!   [`QaClient`]: `prompt → text`. [`LlmGenerator`] implements it on an
//!   `edgequake_llm` provider.
//!
//! One call per question: no retries, no streaming. A timeout bounds the
//! wait even though the provider itself may have none.

use crate::config::QaConfig;
use crate::error::{AskError, PdfQaError};
use crate::prompts::build_prompt;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Answers a question from a document's text.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, context: &str, question: &str) -> Result<String, AskError>;
}

/// Failure reported by a [`TextGenerator`], with its message if it had one.
#[derive(Debug, Clone, Default, Error)]
#[error("{}", .message.as_deref().unwrap_or("unknown error"))]
pub struct GenerateError {
    pub message: Option<String>,
}

impl GenerateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// An external text-generation capability: prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// [`TextGenerator`] on an `edgequake_llm` provider.
pub struct LlmGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &QaConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let messages = vec![ChatMessage::user(prompt)];
        match self.provider.chat(&messages, Some(&self.options)).await {
            Ok(response) => {
                debug!(
                    "{} input tokens, {} output tokens",
                    response.prompt_tokens, response.completion_tokens
                );
                Ok(response.content)
            }
            Err(e) => {
                let message = e.to_string();
                Err(GenerateError {
                    message: (!message.trim().is_empty()).then_some(message),
                })
            }
        }
    }
}

/// Build `CompletionOptions` from the config; unset knobs keep provider defaults.
fn build_options(config: &QaConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

/// Direct question-answering client.
#[derive(Clone)]
pub struct QaClient {
    generator: Arc<dyn TextGenerator>,
    max_context_chars: usize,
    timeout: Duration,
}

impl QaClient {
    /// Client over an explicit generator.
    pub fn new(generator: Arc<dyn TextGenerator>, config: &QaConfig) -> Self {
        Self {
            generator,
            max_context_chars: config.max_context_chars,
            timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }

    /// Client over the provider described by `config`.
    ///
    /// Fails with [`PdfQaError::MissingCredential`] when the provider's
    /// credential variable is unset.
    pub fn from_config(config: &QaConfig) -> Result<Self, PdfQaError> {
        let provider = resolve_provider(config)?;
        info!(
            "Answering with model '{}' via {}",
            config.model,
            if config.provider.is_some() {
                "<custom provider>"
            } else {
                config.provider_name.as_str()
            }
        );
        Ok(Self::new(
            Arc::new(LlmGenerator::new(provider, config)),
            config,
        ))
    }
}

#[async_trait]
impl Answerer for QaClient {
    async fn answer(&self, context: &str, question: &str) -> Result<String, AskError> {
        if context.is_empty() || question.is_empty() {
            return Err(AskError::MissingInput);
        }

        let truncated = truncate_context(context, self.max_context_chars);
        if truncated.len() < context.len() {
            debug!(
                "Context truncated from {} to {} bytes",
                context.len(),
                truncated.len()
            );
        }

        let prompt = build_prompt(truncated, question);
        let start = Instant::now();

        match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(answer)) => {
                debug!("Answer received in {:?} ({} chars)", start.elapsed(), answer.len());
                Ok(answer)
            }
            Ok(Err(e)) => {
                error!("Error calling the text-generation API: {}", e);
                Err(AskError::from_message(e.message))
            }
            Err(_) => {
                warn!("Text-generation call timed out after {:?}", self.timeout);
                Err(AskError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Keep at most `max_chars` characters from the start of `context`.
///
/// Counts Unicode scalar values, so the cut never splits a character.
pub fn truncate_context(context: &str, max_chars: usize) -> &str {
    match context.char_indices().nth(max_chars) {
        Some((idx, _)) => &context[..idx],
        None => context,
    }
}

/// Resolve the LLM provider, failing fast on a missing credential.
///
/// 1. **Pre-built provider** (`config.provider`): used as-is; the caller
///    owns its credential.
/// 2. **Named provider**: the credential variable must be set and non-empty,
///    then [`ProviderFactory::create_llm_provider`] builds the provider.
fn resolve_provider(config: &QaConfig) -> Result<Arc<dyn LLMProvider>, PdfQaError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(var) = config.credential_var() {
        let present = std::env::var(&var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        if !present {
            error!("{} environment variable not set.", var);
            return Err(PdfQaError::MissingCredential { var });
        }
    }

    ProviderFactory::create_llm_provider(&config.provider_name, &config.model).map_err(|e| {
        PdfQaError::ProviderNotConfigured {
            provider: config.provider_name.clone(),
            hint: format!("{e}"),
        }
    })
}
