//! Error types for the edgequake-pdfqa library.
//!
//! Four error types map onto four failure modes:
//!
//! * [`SessionError`] — **Input validation**: wrong file type, empty
//!   question, asking before the document is parsed. Raised synchronously,
//!   before any suspend point, and never changes session state (except for
//!   [`SessionError::ContentNotReady`], which is also recorded inline).
//!
//! * [`ExtractError`] — **Extraction failure**: opaque on purpose. The
//!   underlying pdfium error is logged where it happens and the caller only
//!   ever sees one message.
//!
//! * [`AskError`] — **Transport/remote failure** of a single question. Always
//!   converted into session data; never retried, never fatal.
//!
//! * [`PdfQaError`] — **Fatal / configuration**: missing credential, bad
//!   config, unreadable input file, server bind failure. Meant for the
//!   operator, not the end user.

use crate::session::OperationKind;
use std::path::PathBuf;
use thiserror::Error;

/// Message shown for every extraction failure.
pub const PARSE_FAILED_MESSAGE: &str =
    "Failed to parse the PDF file. Please ensure it's a valid PDF.";

/// Message recorded when a question arrives before any text is available.
pub const CONTENT_NOT_READY_MESSAGE: &str =
    "The PDF content has not been processed yet. Please wait or try re-uploading the file.";

/// Shown when the mediating server fails without saying why.
pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching the answer.";

/// Message for a missing server-side credential, as reported to HTTP clients.
pub const CREDENTIAL_MISSING_MESSAGE: &str =
    "API key is not configured. Please contact the administrator.";

/// Fatal errors returned by configuration, input resolution and the server.
#[derive(Debug, Error)]
pub enum PdfQaError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Configuration errors ──────────────────────────────────────────────
    /// The provider credential is absent from the environment.
    #[error("API key is not configured: set {var} in the server environment.")]
    MissingCredential { var: String },

    /// The provider factory could not build the configured provider.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Server errors ─────────────────────────────────────────────────────
    /// The HTTP listener could not be bound.
    #[error("Failed to bind '{addr}': {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Extraction failed. The cause is logged, not carried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{}", PARSE_FAILED_MESSAGE)]
    InvalidPdf,
}

/// A single question could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum AskError {
    /// Context or question was empty; no request was made.
    #[error("PDF context and question must be provided.")]
    MissingInput,

    /// The capability (or the mediating server) reported a failure.
    #[error("An error occurred while communicating with the AI: {message}")]
    Remote { message: String },

    /// The capability failed without any message.
    #[error("An unknown error occurred while communicating with the AI.")]
    Unknown,

    /// The mediating server refused the question; its message is shown as-is.
    #[error("{message}")]
    Server { message: String },

    /// The call did not complete within the configured timeout.
    #[error("The AI did not respond within {secs}s. Please try again.")]
    Timeout { secs: u64 },
}

impl AskError {
    /// Wrap an optional upstream message, falling back to [`AskError::Unknown`].
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => AskError::Remote { message: m },
            _ => AskError::Unknown,
        }
    }
}

/// A user action was rejected before anything was started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Only PDF files are accepted (got '{media_type}').")]
    NotAPdf { media_type: String },

    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("No document is open.")]
    NoDocument,

    #[error("The document is still being parsed.")]
    StillParsing,

    #[error("A question is already being answered.")]
    AlreadyAsking,

    #[error("{}", CONTENT_NOT_READY_MESSAGE)]
    ContentNotReady,
}

/// An error held in session state, tagged with the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperationError {
    pub kind: OperationKind,
    pub message: String,
}

impl OperationError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Parse,
            message: message.into(),
        }
    }

    pub fn ask(message: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Ask,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_embeds_message() {
        let e = AskError::Remote {
            message: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("communicating with the AI"), "got: {msg}");
        assert!(msg.ends_with("quota exceeded"), "got: {msg}");
    }

    #[test]
    fn from_message_without_text_is_unknown() {
        assert_eq!(AskError::from_message(None), AskError::Unknown);
        assert_eq!(AskError::from_message(Some("  ".into())), AskError::Unknown);
        assert_eq!(
            AskError::Unknown.to_string(),
            "An unknown error occurred while communicating with the AI."
        );
    }

    #[test]
    fn extract_error_is_opaque() {
        assert_eq!(ExtractError::InvalidPdf.to_string(), PARSE_FAILED_MESSAGE);
    }

    #[test]
    fn missing_credential_names_variable() {
        let e = PdfQaError::MissingCredential {
            var: "GEMINI_API_KEY".into(),
        };
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn operation_error_displays_message_only() {
        let e = OperationError::ask("boom");
        assert_eq!(e.kind, OperationKind::Ask);
        assert_eq!(e.to_string(), "boom");
    }
}
