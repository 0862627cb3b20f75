//! Error types for the formsight library.
//!
//! A single tagged enum covers the whole pipeline so callers can branch on
//! the failure kind instead of pattern-matching message strings. The HTTP
//! boundary inspects the variant to pick a response status: schema problems
//! are the caller's fault, an unreachable model endpoint is not, and the
//! two must not collapse into one generic 500.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the formsight library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Client input errors ───────────────────────────────────────────────
    /// The supplied schema text is not valid JSON or not a JSON object.
    #[error("Invalid extraction schema: {detail}")]
    SchemaInvalid { detail: String },

    /// The multipart upload was missing a required part or malformed.
    #[error("Invalid upload: {detail}")]
    InvalidUpload { detail: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The file exists and was read, but does not start with `%PDF`.
    /// Display stays single-line: this message travels in response bodies.
    #[error("File is not a valid PDF: '{path}' (first bytes {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// pdfium could not parse the document at all.
    #[error("PDF '{path}' could not be decoded: {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    /// The document parsed but contains zero pages.
    #[error("PDF '{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    /// pdfium returned an error while rendering the first page.
    #[error("Rasterisation of '{path}' failed: {detail}")]
    RenderFailed { path: PathBuf, detail: String },

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The model endpoint was unreachable, unauthorized, or rate-limited.
    /// `status` is the HTTP status when one was received.
    #[error("Model endpoint error{}: {detail}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream { status: Option<u16>, detail: String },

    /// The model responded but did not invoke the extraction tool.
    #[error("Model returned an unexpected response: {detail}")]
    UnexpectedResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Reading or writing a transient file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or environment validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True when the error is attributable to the caller's input rather
    /// than this service or its dependencies.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExtractError::SchemaInvalid { .. } | ExtractError::InvalidUpload { .. }
        )
    }

    /// True when the failure originated in the external model endpoint.
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            ExtractError::Upstream { .. } | ExtractError::UnexpectedResponse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display_with_status() {
        let e = ExtractError::Upstream {
            status: Some(429),
            detail: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn upstream_display_without_status() {
        let e = ExtractError::Upstream {
            status: None,
            detail: "connection refused".into(),
        };
        assert!(!e.to_string().contains("HTTP"));
    }

    #[test]
    fn not_a_pdf_display_is_single_line() {
        let e = ExtractError::NotAPdf {
            path: PathBuf::from("/tmp/fake.pdf"),
            magic: *b"<!DO",
        };
        let msg = e.to_string();
        assert!(msg.contains("fake.pdf"));
        assert!(!msg.contains('\n'), "detail must stay single-line: {msg:?}");
    }

    #[test]
    fn client_error_classification() {
        assert!(ExtractError::SchemaInvalid { detail: "x".into() }.is_client_error());
        assert!(!ExtractError::Internal("x".into()).is_client_error());
    }

    #[test]
    fn upstream_error_classification() {
        assert!(ExtractError::UnexpectedResponse {
            detail: "no tool call".into()
        }
        .is_upstream_error());
        assert!(!ExtractError::EmptyDocument {
            path: PathBuf::new()
        }
        .is_upstream_error());
    }
}
