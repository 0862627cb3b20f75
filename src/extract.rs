//! Top-level extraction entry points.
//!
//! [`Extractor`] composes the three pipeline stages in sequence:
//! rasterise the first page, base64-encode it, and submit it with the
//! schema-shaped tool to the model endpoint. Any stage failure propagates
//! unchanged — fail-fast, no partial results.
//!
//! The value is stateless and shares nothing across requests beyond a
//! connection pool, so one instance can be passed to every request by
//! reference (or cloned into an `Arc`) without coordination.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::{encode, llm, render};
use crate::schema::ExtractionSchema;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Structured-data extractor over a stored PDF document.
pub struct Extractor {
    client: llm::AnthropicClient,
    max_rendered_pixels: u32,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let max_rendered_pixels = config.max_rendered_pixels;
        Self {
            client: llm::AnthropicClient::new(config),
            max_rendered_pixels,
        }
    }

    /// Extract structured field data from the first page of a stored PDF.
    ///
    /// Exactly one raster image is derived and exactly one result mapping
    /// is produced per call. The mapping is returned verbatim from the
    /// model's tool call — no validation against the schema is performed
    /// here.
    pub async fn process_document(
        &self,
        pdf_path: &Path,
        schema: &ExtractionSchema,
    ) -> Result<Map<String, Value>, ExtractError> {
        let start = Instant::now();
        info!("Starting extraction: {}", pdf_path.display());

        let image_path = render::rasterize_first_page(pdf_path, self.max_rendered_pixels).await?;
        let image_base64 = encode::encode_image(&image_path).await?;
        let result = self
            .client
            .extract_structured_data(&image_base64, schema)
            .await?;

        info!(
            fields = result.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(result)
    }

    /// Extract from in-memory PDF bytes.
    ///
    /// Writes `bytes` to a managed temp file and cleans it (plus the
    /// derived PNG) up automatically on return or panic. Recommended when
    /// the document arrives from a network stream rather than a file.
    pub async fn process_bytes(
        &self,
        bytes: &[u8],
        schema: &ExtractionSchema,
    ) -> Result<Map<String, Value>, ExtractError> {
        let dir = tempfile::tempdir().map_err(|e| ExtractError::Io {
            path: std::env::temp_dir(),
            source: e,
        })?;
        let pdf_path = dir.path().join("document.pdf");

        let mut file = std::fs::File::create(&pdf_path).map_err(|e| ExtractError::Io {
            path: pdf_path.clone(),
            source: e,
        })?;
        file.write_all(bytes).map_err(|e| ExtractError::Io {
            path: pdf_path.clone(),
            source: e,
        })?;
        drop(file);

        // `dir` is dropped (and both files deleted) when this returns.
        self.process_document(&pdf_path, schema).await
    }
}
