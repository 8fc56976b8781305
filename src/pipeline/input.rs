//! Input resolution: turn a user-supplied path, URL or buffer into a [`Document`].
//!
//! The document is held entirely in memory; pdfium reads it from a byte
//! slice, so nothing is ever written to disk. The media type is sniffed from
//! the `%PDF` magic bytes here, and *enforced* later by the session when the
//! document is selected.

use crate::error::PdfQaError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Media type of an accepted document.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Media type assigned to anything that does not look like a PDF.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A user-selected file held in memory for the session.
///
/// Cloning is cheap: the content is shared, not copied.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl Document {
    /// Create a document with a caller-declared media type.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Create a document, sniffing the media type from its first bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let media_type = sniff_media_type(&bytes);
        Self::new(name, media_type, bytes)
    }

    /// Read a local file into memory.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PdfQaError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => PdfQaError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => PdfQaError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Read local document: {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(name, bytes))
    }

    /// Download a document over HTTP(S).
    pub async fn from_url(url: &str, timeout_secs: u64) -> Result<Self, PdfQaError> {
        info!("Downloading PDF from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PdfQaError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                PdfQaError::DownloadTimeout {
                    url: url.to_string(),
                    secs: timeout_secs,
                }
            } else {
                PdfQaError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(PdfQaError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PdfQaError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        info!("Downloaded {} bytes", bytes.len());
        Ok(Self::from_bytes(filename_from_url(url), bytes.to_vec()))
    }

    /// File name shown to the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Raw file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the declared media type is `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
    }
}

// Documents can be tens of megabytes; never dump the bytes.
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a path or URL to an in-memory [`Document`].
pub async fn resolve_document(input: &str, timeout_secs: u64) -> Result<Document, PdfQaError> {
    if input.trim().is_empty() {
        return Err(PdfQaError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        Document::from_url(input, timeout_secs).await
    } else {
        Document::from_path(PathBuf::from(input)).await
    }
}

fn sniff_media_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"%PDF") {
        PDF_MEDIA_TYPE
    } else {
        OCTET_STREAM
    }
}

/// Extract a reasonable filename from the URL path.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}
