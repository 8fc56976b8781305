//! # edgequake-pdfqa
//!
//! Ask natural-language questions about a PDF and get answers grounded only
//! in that document.
//!
//! ## How it works
//!
//! The PDF is parsed locally with pdfium and its text, page by page, becomes
//! the context of a single prompt to a hosted model. The model is told to
//! answer solely from the document and to say so when the answer is not
//! there. No retrieval, no chunking: long documents are cut to their first
//! 300 000 characters.
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    local file or URL, held in memory
//!  ├─ 2. Extract  per-page text via pdfium (spawn_blocking)
//!  ├─ 3. Session  state machine with generation tokens
//!  ├─ 4. Answer   one LLM call (directly, or via `pdfqa serve`)
//!  └─ 5. Display  Markdown emphasis stripped
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfqa::{App, Document, PdfExtractor, QaClient, QaConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY for the default provider.
//!     let client = QaClient::from_config(&QaConfig::default())?;
//!     let app = App::new(PdfExtractor::pdfium(), Arc::new(client));
//!
//!     app.select_document(Document::from_path("report.pdf").await?)?.await;
//!     app.submit_question("What was the revenue growth?")?.await;
//!
//!     let view = app.snapshot();
//!     println!("{}", view.answer.or(view.ask_error).unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfqa` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdfqa = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod app;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod remote;
pub mod server;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use app::{App, SessionView};
pub use config::{QaConfig, QaConfigBuilder, ServerConfig};
pub use error::{AskError, ExtractError, OperationError, PdfQaError, SessionError};
pub use pipeline::answer::{Answerer, GenerateError, LlmGenerator, QaClient, TextGenerator};
pub use pipeline::extract::{ExtractedContent, PdfBackend, PdfExtractor, PdfiumBackend};
pub use pipeline::input::Document;
pub use pipeline::sanitize::sanitize;
pub use progress::{NoopObserver, SessionObserver};
pub use remote::RemoteAnswerer;
pub use session::{Completion, OperationKind, Session, SessionState};
