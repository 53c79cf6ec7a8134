//! Error types for pdfsift.

use std::io;
use thiserror::Error;

/// Result type alias for pdfsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend cannot open or parse the document. Aborts the analysis.
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// A single page could not be extracted.
    ///
    /// The analysis pipeline never escalates this: the page degrades to a
    /// placeholder and the failure is recorded as a page warning.
    #[error("Extraction failed on page {page}: {reason}")]
    PageExtractionFailed {
        /// 1-indexed page number
        page: u32,
        /// Backend-provided reason
        reason: String,
    },

    /// A requested page range is malformed or outside the document.
    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Table detection could not run on the given spans.
    #[error("Table detection failed: {0}")]
    TableDetection(String),

    /// The caller cancelled the analysis before it completed.
    #[error("Analysis cancelled")]
    Cancelled,

    /// Error while rendering an analysis (JSON, text report).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error only affects a single page and must not abort a
    /// document-level analysis.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::PageExtractionFailed { .. } | Error::TableDetection(_)
        )
    }
}

#[cfg(feature = "lopdf-backend")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::DocumentUnreadable(err.to_string()),
        }
    }
}
