//! PDF text extraction: [`Document`] → [`ExtractedContent`].
//!
//! The PDF parser is an injected [`PdfBackend`], not a global. Production
//! code uses [`PdfiumBackend`]; tests supply a fake that returns canned
//! fragments.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a blocking C++ library with thread-local state. Running it on
//! the blocking pool keeps the async workers (and with them the ability to
//! reset or re-open a document) responsive while a large file is parsed.

use crate::error::ExtractError;
use crate::pipeline::input::Document;
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Text fragments of one page, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-indexed page number.
    pub number: usize,
    pub fragments: Vec<String>,
}

impl PageText {
    pub fn new(number: usize, fragments: Vec<String>) -> Self {
        Self { number, fragments }
    }
}

/// Failure inside a [`PdfBackend`]. Logged, never shown to the user.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// An external PDF-text capability.
///
/// Given raw bytes, returns every page in order, starting at page 1.
pub trait PdfBackend: Send + Sync {
    fn read_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, BackendError>;
}

/// Result of parsing a document: page count and the concatenated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub page_count: usize,
    /// Each page's fragments joined by a space, every page followed by a blank line.
    pub text: String,
}

impl ExtractedContent {
    /// Assemble the text of `pages` in order.
    pub fn from_pages(pages: &[PageText]) -> Self {
        let mut text = String::new();
        for page in pages {
            text.push_str(&page.fragments.join(" "));
            text.push_str("\n\n");
        }
        Self {
            page_count: pages.len(),
            text,
        }
    }

    /// Whether there is any text to ask about.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extraction adapter over an injected [`PdfBackend`].
#[derive(Clone)]
pub struct PdfExtractor {
    backend: Arc<dyn PdfBackend>,
}

impl PdfExtractor {
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        Self { backend }
    }

    /// Extractor backed by pdfium.
    pub fn pdfium() -> Self {
        Self::new(Arc::new(PdfiumBackend::default()))
    }

    /// Parse `doc` and return its page count and text.
    ///
    /// The media type is not checked here; the session does that when the
    /// document is selected. Every failure collapses into
    /// [`ExtractError::InvalidPdf`], with the cause logged.
    pub async fn extract(&self, doc: &Document) -> Result<ExtractedContent, ExtractError> {
        let backend = Arc::clone(&self.backend);
        let owned = doc.clone();
        let name = doc.name().to_string();

        let pages = tokio::task::spawn_blocking(move || backend.read_pages(owned.bytes()))
            .await
            .map_err(|e| {
                error!("Extraction task for '{}' panicked: {}", name, e);
                ExtractError::InvalidPdf
            })?
            .map_err(|e| {
                error!("Error parsing PDF '{}': {}", name, e);
                ExtractError::InvalidPdf
            })?;

        let content = ExtractedContent::from_pages(&pages);
        info!(
            "Extracted {} chars from {} pages of '{}'",
            content.text.len(),
            content.page_count,
            name
        );
        Ok(content)
    }
}

/// [`PdfBackend`] on the pdfium library.
///
/// The library is looked up in this order: `library_path` (or the
/// `PDFIUM_LIB_PATH` variable), the working directory, the system paths.
#[derive(Debug, Clone, Default)]
pub struct PdfiumBackend {
    pub library_path: Option<PathBuf>,
}

impl PdfiumBackend {
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, BackendError> {
        let explicit = self
            .library_path
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

        let bindings = match explicit {
            Some(path) => Pdfium::bind_to_library(&path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| {
            BackendError(format!(
                "Failed to bind to pdfium library: {:?}\n\
                 Install libpdfium or set PDFIUM_LIB_PATH=/path/to/libpdfium",
                e
            ))
        })?;

        Ok(Pdfium::new(bindings))
    }
}

impl PdfBackend for PdfiumBackend {
    fn read_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, BackendError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| BackendError(format!("load failed: {:?}", e)))?;

        let pages = document.pages();
        let total = pages.len() as usize;
        debug!("PDF loaded: {} pages", total);

        let mut result = Vec::with_capacity(total);
        for (idx, page) in pages.iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| BackendError(format!("page {}: {:?}", idx + 1, e)))?;
            let fragments: Vec<String> = text
                .segments()
                .iter()
                .map(|segment| segment.text())
                .collect();
            result.push(PageText::new(idx + 1, fragments));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        pages: Vec<Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(pages: Vec<Vec<&'static str>>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PdfBackend for FakeBackend {
        fn read_pages(&self, _bytes: &[u8]) -> Result<Vec<PageText>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .pages
                .iter()
                .enumerate()
                .map(|(i, frags)| PageText::new(i + 1, frags.iter().map(|s| s.to_string()).collect()))
                .collect())
        }
    }

    struct BrokenBackend;

    impl PdfBackend for BrokenBackend {
        fn read_pages(&self, _bytes: &[u8]) -> Result<Vec<PageText>, BackendError> {
            Err(BackendError("xref table corrupt".into()))
        }
    }

    struct PanickingBackend;

    impl PdfBackend for PanickingBackend {
        fn read_pages(&self, _bytes: &[u8]) -> Result<Vec<PageText>, BackendError> {
            panic!("pdfium crashed")
        }
    }

    fn pdf() -> Document {
        Document::from_bytes("doc.pdf", b"%PDF-1.7".to_vec())
    }

    #[tokio::test]
    async fn three_pages_joined_with_blank_lines() {
        let backend = Arc::new(FakeBackend::new(vec![
            vec!["A", "B"],
            vec!["C"],
            vec!["D", "E", "F"],
        ]));
        let extractor = PdfExtractor::new(backend.clone());

        let content = extractor.extract(&pdf()).await.unwrap();
        assert_eq!(content.page_count, 3);
        assert_eq!(content.text, "A B\n\nC\n\nD E F\n\n");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_page_still_gets_separator() {
        let extractor = PdfExtractor::new(Arc::new(FakeBackend::new(vec![vec![], vec!["x"]])));
        let content = extractor.extract(&pdf()).await.unwrap();
        assert_eq!(content.page_count, 2);
        assert_eq!(content.text, "\n\nx\n\n");
    }

    #[tokio::test]
    async fn zero_pages_is_empty_content() {
        let extractor = PdfExtractor::new(Arc::new(FakeBackend::new(vec![])));
        let content = extractor.extract(&pdf()).await.unwrap();
        assert_eq!(content, ExtractedContent::default());
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_opaque() {
        let extractor = PdfExtractor::new(Arc::new(BrokenBackend));
        let err = extractor.extract(&pdf()).await.unwrap_err();
        assert_eq!(err, ExtractError::InvalidPdf);
        assert!(!err.to_string().contains("xref"));
    }

    #[tokio::test]
    async fn backend_panic_becomes_parse_error() {
        let extractor = PdfExtractor::new(Arc::new(PanickingBackend));
        let err = extractor.extract(&pdf()).await.unwrap_err();
        assert_eq!(err, ExtractError::InvalidPdf);
    }

    #[tokio::test]
    async fn extractor_does_not_check_media_type() {
        let extractor = PdfExtractor::new(Arc::new(FakeBackend::new(vec![vec!["ok"]])));
        let doc = Document::new("notes.txt", "text/plain", b"ok".to_vec());
        assert!(extractor.extract(&doc).await.is_ok());
    }
}
