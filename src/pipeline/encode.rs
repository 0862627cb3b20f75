//! Image encoding: PNG file → base64 text payload.
//!
//! The Messages API accepts images as base64 data embedded in the JSON
//! request body. PNG is used over JPEG because it is lossless — text
//! crispness matters far more than file size when the model has to read
//! small form labels.

use crate::error::ExtractError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Read an image file fully into memory and base64-encode it.
pub async fn encode_image(image_path: &Path) -> Result<String, ExtractError> {
    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|e| ExtractError::Io {
            path: image_path.to_path_buf(),
            source: e,
        })?;

    let encoded = STANDARD.encode(&bytes);
    debug!(
        "Encoded {} → {} bytes base64",
        image_path.display(),
        encoded.len()
    );
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn round_trip_is_byte_identical() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&payload).unwrap();

        let encoded = encode_image(file.path()).await.unwrap();
        let decoded = STANDARD.decode(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[tokio::test]
    async fn unreadable_file_is_io_error() {
        let err = encode_image(Path::new("/no/such/image.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
