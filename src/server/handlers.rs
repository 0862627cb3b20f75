//! Request handlers for the formsight HTTP surface.
//!
//! Every failure maps to a `{ "detail": string }` body with a status
//! chosen from the error kind: the caller's mistakes come back as 4xx,
//! model-endpoint trouble as 502, and everything else as 500.

use crate::error::ExtractError;
use crate::schema::ExtractionSchema;
use crate::storage::StoredDocument;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::AppState;

/// `GET /` greeting.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the AI-Assisted Form Filling API" }))
}

/// Success response for `POST /upload-pdf`.
#[derive(Serialize)]
pub struct UploadResponse {
    /// The filename the caller supplied, echoed back as display metadata.
    filename: String,
    status: &'static str,
    /// The model's structured tool-call output, returned verbatim.
    result: Map<String, Value>,
}

/// `POST /upload-pdf`: store the document, parse the schema, extract.
///
/// The schema is parsed before anything touches disk or the network, so
/// malformed input fails with no side effects at all.
pub async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    info!(
        filename = %upload.filename,
        bytes = upload.file_bytes.len(),
        "Received upload"
    );

    let schema = ExtractionSchema::parse(&upload.schema_text)?;
    let document = StoredDocument::write(&upload.file_bytes, &upload.filename).await?;

    let result = state
        .extractor
        .process_document(document.path(), &schema)
        .await?;

    info!(filename = %upload.filename, fields = result.len(), "Upload processed");
    Ok(Json(UploadResponse {
        filename: document.display_name().to_string(),
        status: "File processed successfully",
        result,
    }))
}

/// `GET /download-example-pdf`: serve the static example document.
pub async fn download_example_pdf(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.example_pdf_path.as_ref()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"example.pdf\"".to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!(
                path = %state.example_pdf_path.display(),
                error = %e,
                "Example PDF not available"
            );
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Example PDF not found" })),
            )
                .into_response()
        }
    }
}

// ── Multipart handling ─────────────────────────────────────────────────────

struct Upload {
    file_bytes: axum::body::Bytes,
    filename: String,
    schema_text: String,
}

/// Collect the `file` and `schema` parts, in whatever order they arrive.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ExtractError> {
    let mut file: Option<(axum::body::Bytes, String)> = None;
    let mut schema_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExtractError::InvalidUpload {
            detail: e.to_string(),
        })?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "upload.pdf".to_string());
                let bytes = field.bytes().await.map_err(|e| ExtractError::InvalidUpload {
                    detail: format!("failed to read file part: {e}"),
                })?;
                file = Some((bytes, filename));
            }
            Some("schema") => {
                let text = field.text().await.map_err(|e| ExtractError::InvalidUpload {
                    detail: format!("schema part is not valid UTF-8 text: {e}"),
                })?;
                schema_text = Some(text);
            }
            other => {
                warn!(part = ?other, "Ignoring unknown multipart part");
            }
        }
    }

    let (file_bytes, filename) = file.ok_or_else(|| ExtractError::InvalidUpload {
        detail: "missing 'file' part".to_string(),
    })?;
    let schema_text = schema_text.ok_or_else(|| ExtractError::InvalidUpload {
        detail: "missing 'schema' part".to_string(),
    })?;

    Ok(Upload {
        file_bytes,
        filename,
        schema_text,
    })
}

// ── Error mapping ──────────────────────────────────────────────────────────

/// Boundary wrapper that turns an [`ExtractError`] into a response.
pub struct AppError(ExtractError);

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            ExtractError::NotAPdf { .. }
            | ExtractError::CorruptDocument { .. }
            | ExtractError::EmptyDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            e if e.is_upstream_error() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::info!(error = %self.0, "Request rejected");
        }

        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(err: ExtractError) -> StatusCode {
        AppError(err).into_response().status()
    }

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(
            status_for(ExtractError::SchemaInvalid { detail: "x".into() }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(ExtractError::InvalidUpload { detail: "x".into() }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn document_errors_map_to_422() {
        assert_eq!(
            status_for(ExtractError::NotAPdf {
                path: "a.pdf".into(),
                magic: *b"<htm",
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ExtractError::EmptyDocument { path: "a.pdf".into() }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn upstream_errors_map_to_502() {
        assert_eq!(
            status_for(ExtractError::Upstream {
                status: Some(401),
                detail: "unauthorized".into(),
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(ExtractError::UnexpectedResponse { detail: "x".into() }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn everything_else_maps_to_500() {
        assert_eq!(
            status_for(ExtractError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
