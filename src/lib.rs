//! # formsight
//!
//! Extract structured form data from PDF documents using a vision
//! language model.
//!
//! A scanned or generated form is hard to parse positionally — field
//! labels float, layouts vary, and OCR loses the association between a
//! label and its value. Instead this crate rasterises the form's first
//! page into a PNG and lets a vision model read it as a human would,
//! constrained by a caller-supplied JSON schema through forced tool
//! calling, so the output is always a structured mapping rather than
//! free text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Store   write bytes under an opaque key in scoped temp storage
//!  ├─ 2. Render  rasterise the first page via pdfium (spawn_blocking)
//!  ├─ 3. Encode  PNG → base64
//!  ├─ 4. Model   one Messages API call, `extract_form_data` tool forced
//!  └─ 5. Unwrap  tool-call arguments returned verbatim to the caller
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formsight::{ExtractionConfig, ExtractionSchema, Extractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::from_env()?; // reads ANTHROPIC_API_KEY
//!     let schema = ExtractionSchema::parse(
//!         r#"{"type": "object", "properties": {"firstName": {"type": "string"}}}"#,
//!     )?;
//!     let extractor = Extractor::new(config);
//!     let result = extractor
//!         .process_document("form.pdf".as_ref(), &schema)
//!         .await?;
//!     println!("{}", serde_json::Value::Object(result));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the HTTP server (axum + tower-http + dotenvy) |
//!
//! Disable `server` when using only the library:
//! ```toml
//! formsight = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod schema;
pub mod storage;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::Extractor;
pub use schema::ExtractionSchema;
pub use storage::StoredDocument;
