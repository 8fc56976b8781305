//! Session state machine for one open document.
//!
//! [`Session`] is plain data plus synchronous transitions: nothing here
//! awaits. Long-running work (extraction, answering) is started by taking a
//! ticket from `begin_*`, run elsewhere, and reported back with `finish_*`.
//!
//! ## Generations
//!
//! Each operation kind has a counter. `begin_parse` and `reset` bump both;
//! `begin_ask` bumps the ask counter. A ticket remembers the counter value
//! it was issued under, and `finish_*` applies a result only when that value
//! is still current. Anything else is a [`Completion::Stale`] result and
//! leaves the session untouched, so a slow parse of an abandoned document
//! can never overwrite the content of the one that replaced it.

use crate::error::{
    AskError, ExtractError, OperationError, SessionError, CONTENT_NOT_READY_MESSAGE,
};
use crate::pipeline::extract::ExtractedContent;
use crate::pipeline::input::Document;
use crate::pipeline::sanitize::sanitize;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The two kinds of asynchronous operation a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Parse,
    Ask,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Parse => f.write_str("parse"),
            OperationKind::Ask => f.write_str("ask"),
        }
    }
}

/// Whether a finished operation was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Parse phase of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseState {
    Idle,
    Parsing,
    Parsed(ExtractedContent),
    Failed(OperationError),
}

/// Ask phase of the session. Only meaningful once a document is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskState {
    Idle,
    Asking,
    Answered(String),
    Failed(OperationError),
}

/// Where a parsed session stands on its current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AskPhase {
    Idle,
    Asking,
    Answered,
    Failed,
}

/// Conceptual state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "ask")]
pub enum SessionState {
    Idle,
    Parsing,
    ParseFailed,
    Parsed(AskPhase),
}

/// Issued by [`Session::begin_parse`]; hand the document to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTicket {
    pub generation: u64,
    pub document: Document,
}

/// Issued by [`Session::begin_ask`]; carries everything the answerer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskTicket {
    pub generation: u64,
    pub context: String,
    pub question: String,
}

/// State of one PDF Q&A session.
#[derive(Debug, Clone)]
pub struct Session {
    document: Option<Document>,
    parse: ParseState,
    question: String,
    ask: AskState,
    parse_generation: u64,
    ask_generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            document: None,
            parse: ParseState::Idle,
            question: String::new(),
            ask: AskState::Idle,
            parse_generation: 0,
            ask_generation: 0,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Select `doc` as the session's document and start parsing it.
    ///
    /// A non-PDF is rejected with no change at all: the previous document,
    /// its content and any answer stay as they were.
    pub fn begin_parse(&mut self, doc: Document) -> Result<ParseTicket, SessionError> {
        if !doc.is_pdf() {
            return Err(SessionError::NotAPdf {
                media_type: doc.media_type().to_string(),
            });
        }

        self.parse_generation += 1;
        self.ask_generation += 1;
        self.document = Some(doc.clone());
        self.parse = ParseState::Parsing;
        self.question.clear();
        self.ask = AskState::Idle;

        debug!(
            "Parse #{} started for '{}'",
            self.parse_generation,
            doc.name()
        );
        Ok(ParseTicket {
            generation: self.parse_generation,
            document: doc,
        })
    }

    /// Apply the result of the parse issued under `generation`.
    pub fn finish_parse(
        &mut self,
        generation: u64,
        result: Result<ExtractedContent, ExtractError>,
    ) -> Completion {
        if generation != self.parse_generation {
            debug!(
                "Discarding stale parse #{} (current #{})",
                generation, self.parse_generation
            );
            return Completion::Stale;
        }

        self.parse = match result {
            Ok(content) => ParseState::Parsed(content),
            Err(e) => ParseState::Failed(OperationError::parse(e.to_string())),
        };
        Completion::Applied
    }

    /// Drop the document and everything derived from it.
    ///
    /// Operations still in flight become stale.
    pub fn reset(&mut self) {
        self.parse_generation += 1;
        self.ask_generation += 1;
        self.document = None;
        self.parse = ParseState::Idle;
        self.question.clear();
        self.ask = AskState::Idle;
    }

    /// Submit `question` about the parsed document.
    ///
    /// Rejections leave the session unchanged, except when no text is
    /// available: that is recorded as the ask error so it is shown like any
    /// other failed question.
    pub fn begin_ask(&mut self, question: &str) -> Result<AskTicket, SessionError> {
        if question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        if self.document.is_none() {
            return Err(SessionError::NoDocument);
        }
        if self.is_parsing() {
            return Err(SessionError::StillParsing);
        }
        if self.is_asking() {
            return Err(SessionError::AlreadyAsking);
        }

        let context = match &self.parse {
            ParseState::Parsed(content) if !content.is_empty() => content.text.clone(),
            _ => {
                self.question = question.to_string();
                self.ask = AskState::Failed(OperationError::ask(CONTENT_NOT_READY_MESSAGE));
                return Err(SessionError::ContentNotReady);
            }
        };

        self.ask_generation += 1;
        self.question = question.to_string();
        self.ask = AskState::Asking;

        debug!("Ask #{} started", self.ask_generation);
        Ok(AskTicket {
            generation: self.ask_generation,
            context,
            question: self.question.clone(),
        })
    }

    /// Apply the result of the ask issued under `generation`.
    pub fn finish_ask(
        &mut self,
        generation: u64,
        result: Result<String, AskError>,
    ) -> Completion {
        if generation != self.ask_generation {
            debug!(
                "Discarding stale answer #{} (current #{})",
                generation, self.ask_generation
            );
            return Completion::Stale;
        }

        self.ask = match result {
            Ok(answer) => AskState::Answered(answer),
            Err(e) => AskState::Failed(OperationError::ask(e.to_string())),
        };
        Completion::Applied
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        match &self.parse {
            ParseState::Idle => SessionState::Idle,
            ParseState::Parsing => SessionState::Parsing,
            ParseState::Failed(_) => SessionState::ParseFailed,
            ParseState::Parsed(_) => SessionState::Parsed(match &self.ask {
                AskState::Idle => AskPhase::Idle,
                AskState::Asking => AskPhase::Asking,
                AskState::Answered(_) => AskPhase::Answered,
                AskState::Failed(_) => AskPhase::Failed,
            }),
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn content(&self) -> Option<&ExtractedContent> {
        match &self.parse {
            ParseState::Parsed(content) => Some(content),
            _ => None,
        }
    }

    pub fn page_count(&self) -> Option<usize> {
        self.content().map(|c| c.page_count)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// The answer exactly as the model returned it.
    pub fn answer(&self) -> Option<&str> {
        match &self.ask {
            AskState::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    /// The answer with Markdown emphasis stripped, for display.
    pub fn answer_display(&self) -> Option<String> {
        self.answer().map(sanitize)
    }

    pub fn parse_error(&self) -> Option<&OperationError> {
        match &self.parse {
            ParseState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn ask_error(&self) -> Option<&OperationError> {
        match &self.ask {
            AskState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_parsing(&self) -> bool {
        matches!(self.parse, ParseState::Parsing)
    }

    pub fn is_asking(&self) -> bool {
        matches!(self.ask, AskState::Asking)
    }

    /// True when there is text to ask about and nothing is in flight.
    pub fn can_ask(&self) -> bool {
        self.content().is_some_and(|c| !c.is_empty()) && !self.is_asking()
    }

    /// Short status for the open document, `None` when there is none.
    pub fn status_line(&self) -> Option<String> {
        self.document.as_ref()?;
        Some(if self.is_parsing() {
            "Parsing...".to_string()
        } else {
            match self.page_count() {
                Some(n) if n > 0 => format!("{n} pages"),
                _ => "Ready to ask questions".to_string(),
            }
        })
    }

    /// Current generation of `kind`.
    pub fn generation(&self, kind: OperationKind) -> u64 {
        match kind {
            OperationKind::Parse => self.parse_generation,
            OperationKind::Ask => self.ask_generation,
        }
    }
}
