//! Application controller: wires a [`Session`] to its capabilities.
//!
//! [`App`] owns the session behind a mutex and hands out futures for the
//! slow work. Validation and the generation bump happen synchronously inside
//! `select_document` / `submit_question`, so by the time the caller sees
//! `Ok(future)` the session already shows `Parsing` or `Asking`. The future
//! itself only runs the capability and applies its result; the caller picks
//! how to drive it (await it, spawn it, or push it into a
//! `FuturesUnordered` next to user input).
//!
//! The lock is taken only for the synchronous transitions and is never held
//! across an await point.

use crate::error::SessionError;
use crate::pipeline::answer::Answerer;
use crate::pipeline::extract::PdfExtractor;
use crate::pipeline::input::Document;
use crate::progress::{NoopObserver, SharedObserver};
use crate::session::{Completion, OperationKind, Session, SessionState};
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    /// Name of the open document.
    pub document: Option<String>,
    /// "Parsing...", "N pages" or "Ready to ask questions".
    pub status: Option<String>,
    pub page_count: Option<usize>,
    pub question: String,
    /// Answer with Markdown emphasis stripped.
    pub answer: Option<String>,
    pub parse_error: Option<String>,
    pub ask_error: Option<String>,
    pub can_ask: bool,
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        Self {
            state: s.state(),
            document: s.document().map(|d| d.name().to_string()),
            status: s.status_line(),
            page_count: s.page_count(),
            question: s.question().to_string(),
            answer: s.answer_display(),
            parse_error: s.parse_error().map(|e| e.message.clone()),
            ask_error: s.ask_error().map(|e| e.message.clone()),
            can_ask: s.can_ask(),
        }
    }
}

/// The PDF Q&A application.
#[derive(Clone)]
pub struct App {
    session: Arc<Mutex<Session>>,
    extractor: PdfExtractor,
    answerer: Arc<dyn Answerer>,
    observer: SharedObserver,
}

impl App {
    pub fn new(extractor: PdfExtractor, answerer: Arc<dyn Answerer>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            extractor,
            answerer,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Select `doc` and return the future that parses it.
    ///
    /// A non-PDF is rejected here, before anything changes.
    pub fn select_document(
        &self,
        doc: Document,
    ) -> Result<impl Future<Output = Completion> + Send + 'static, SessionError> {
        let ticket = lock(&self.session).begin_parse(doc)?;
        info!("Parsing '{}'", ticket.document.name());
        self.observer.on_parse_start(ticket.document.name());

        let session = Arc::clone(&self.session);
        let extractor = self.extractor.clone();
        let observer = Arc::clone(&self.observer);

        Ok(async move {
            let result = extractor.extract(&ticket.document).await;
            let outcome = result
                .as_ref()
                .map(|c| c.page_count)
                .map_err(|e| e.to_string());

            let completion = lock(&session).finish_parse(ticket.generation, result);
            match (completion, outcome) {
                (Completion::Stale, _) => observer.on_stale(OperationKind::Parse),
                (Completion::Applied, Ok(pages)) => observer.on_parse_complete(pages),
                (Completion::Applied, Err(msg)) => observer.on_parse_error(&msg),
            }
            completion
        })
    }

    /// Submit `question` and return the future that answers it.
    pub fn submit_question(
        &self,
        question: &str,
    ) -> Result<impl Future<Output = Completion> + Send + 'static, SessionError> {
        let ticket = lock(&self.session).begin_ask(question);
        let ticket = match ticket {
            Ok(ticket) => ticket,
            Err(e) => {
                if e == SessionError::ContentNotReady {
                    self.observer.on_ask_error(&e.to_string());
                }
                return Err(e);
            }
        };
        self.observer.on_ask_start(&ticket.question);

        let session = Arc::clone(&self.session);
        let answerer = Arc::clone(&self.answerer);
        let observer = Arc::clone(&self.observer);

        Ok(async move {
            let result = answerer.answer(&ticket.context, &ticket.question).await;
            let outcome = result
                .as_ref()
                .map(|a| a.len())
                .map_err(|e| e.to_string());

            let completion = lock(&session).finish_ask(ticket.generation, result);
            match (completion, outcome) {
                (Completion::Stale, _) => observer.on_stale(OperationKind::Ask),
                (Completion::Applied, Ok(len)) => observer.on_answer(len),
                (Completion::Applied, Err(msg)) => observer.on_ask_error(&msg),
            }
            completion
        })
    }

    /// Close the document. In-flight work is left to finish and discarded.
    pub fn reset_document(&self) {
        lock(&self.session).reset();
    }

    pub fn snapshot(&self) -> SessionView {
        SessionView::from(&*lock(&self.session))
    }
}

// A panic while holding the lock cannot leave a transition half-applied
// (each one is a handful of assignments), so a poisoned lock is still usable.
fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
