//! Server configuration loaded from environment variables.
//!
//! The binary calls `dotenvy::dotenv()` before [`ServerConfig::from_env`],
//! so a local `.env` file works too. `ANTHROPIC_API_KEY` is the only
//! required value; everything else has a development default.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use std::path::PathBuf;

/// Default front-end origin allowed by CORS (the Vite dev server).
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Default location of the downloadable example document.
const DEFAULT_EXAMPLE_PDF: &str = "static/example.pdf";

/// Default upload cap: 25 MB covers any realistic single-form PDF.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Runtime configuration for the formsight server.
#[derive(Debug)]
pub struct ServerConfig {
    /// Bind address. `SERVER_HOST`, default `0.0.0.0`.
    pub host: String,
    /// Bind port. `SERVER_PORT`, default `8000`.
    pub port: u16,
    /// Single origin allowed by CORS. `ALLOWED_ORIGIN`.
    pub allowed_origin: String,
    /// Location of the example document. `EXAMPLE_PDF_PATH`.
    pub example_pdf_path: PathBuf,
    /// Maximum accepted request body size. `MAX_UPLOAD_BYTES`.
    pub max_upload_bytes: usize,
    /// Extraction pipeline configuration (API key et al.).
    pub extraction: ExtractionConfig,
}

impl ServerConfig {
    /// Load from environment variables, validating as we go.
    pub fn from_env() -> Result<Self, ExtractError> {
        Ok(Self {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_env("SERVER_PORT")?.unwrap_or(8000),
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.into()),
            example_pdf_path: std::env::var("EXAMPLE_PDF_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXAMPLE_PDF)),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            extraction: ExtractionConfig::from_env()?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ExtractError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ExtractError::InvalidConfig(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}
