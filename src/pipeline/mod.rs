//! Pipeline stages for answering questions about a PDF.
//!
//! Each submodule implements exactly one step, behind a seam that tests can
//! replace.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ answer ──▶ sanitize
//! (path/URL) (pdfium)   (LLM)      (display)
//! ```
//!
//! 1. [`input`]    — load the user-supplied path or URL into an in-memory
//!    [`input::Document`]
//! 2. [`extract`]  — pull the text out of every page; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`answer`]   — truncate the text, build the prompt and make the one
//!    model call; the only stage with network I/O
//! 4. [`sanitize`] — strip Markdown emphasis from the answer before it is
//!    shown

pub mod answer;
pub mod extract;
pub mod input;
pub mod sanitize;
