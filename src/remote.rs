//! [`Answerer`] that goes through a `pdfqa serve` instance.
//!
//! Used when the credential lives on another machine: the client sends the
//! document text cut to the same character budget the server applies, and
//! the server prompts and calls the model.

use crate::config::DEFAULT_MAX_CONTEXT_CHARS;
use crate::error::{AskError, PdfQaError, FETCH_FAILED_MESSAGE};
use crate::pipeline::answer::{truncate_context, Answerer};
use crate::server::GENERATE_PATH;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct GenerateBody<'a> {
    context: &'a str,
    question: &'a str,
}

/// Either half of the server's reply.
#[derive(Deserialize, Default)]
struct GenerateReply {
    answer: Option<String>,
    error: Option<String>,
}

/// Client for the mediating endpoint.
#[derive(Debug, Clone)]
pub struct RemoteAnswerer {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
    max_context_chars: usize,
}

impl RemoteAnswerer {
    /// `server` is the base URL, e.g. `http://127.0.0.1:3000`.
    pub fn new(server: &str, timeout_secs: u64) -> Result<Self, PdfQaError> {
        let base = server.trim_end_matches('/');
        if reqwest::Url::parse(base).is_err() {
            return Err(PdfQaError::InvalidConfig(format!(
                "server URL '{server}' is not a valid URL"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PdfQaError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{base}{GENERATE_PATH}"),
            timeout_secs,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        })
    }

    /// Characters of context posted per question. Should match the server's
    /// own limit; anything past it would be cut there anyway.
    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Answerer for RemoteAnswerer {
    async fn answer(&self, context: &str, question: &str) -> Result<String, AskError> {
        if context.is_empty() || question.is_empty() {
            return Err(AskError::MissingInput);
        }

        let context = truncate_context(context, self.max_context_chars);
        debug!("POST {} ({} bytes of context)", self.endpoint, context.len());
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateBody { context, question })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AskError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    warn!("Request to {} failed: {}", self.endpoint, e);
                    AskError::Remote {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        // A proxy in between may answer with HTML; treat that as "no message".
        let reply: GenerateReply = response.json().await.unwrap_or_default();

        if !status.is_success() {
            warn!("Server answered HTTP {}", status);
            return Err(AskError::Server {
                message: reply
                    .error
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| FETCH_FAILED_MESSAGE.to_string()),
            });
        }

        reply.answer.ok_or_else(|| AskError::Server {
            message: FETCH_FAILED_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        let r = RemoteAnswerer::new("http://127.0.0.1:3000/", 5).unwrap();
        assert_eq!(r.endpoint(), "http://127.0.0.1:3000/api/generate");
    }

    #[test]
    fn rejects_invalid_server_url() {
        assert!(matches!(
            RemoteAnswerer::new("not a url", 5),
            Err(PdfQaError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn empty_input_fails_locally() {
        // Port 9 (discard) is never contacted: validation comes first.
        let r = RemoteAnswerer::new("http://127.0.0.1:9", 1).unwrap();
        assert_eq!(r.answer("", "q").await, Err(AskError::MissingInput));
        assert_eq!(r.answer("ctx", "").await, Err(AskError::MissingInput));
    }
}
