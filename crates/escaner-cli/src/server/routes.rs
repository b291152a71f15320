//! HTTP handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use escaner_core::invoice::InvoiceExtractor;
use escaner_core::models::record::NO_DATA_MESSAGE;
use escaner_core::decode_image;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

/// GET / when no frontend directory is configured.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "API OCR is running",
    })
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// POST /ocr: multipart `image` file plus optional `filter` flag.
///
/// A body that is not `multipart/form-data` carries no image either.
pub async fn ocr(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected /ocr body: {}", rejection);
        ApiError::BadRequest("No image provided".into())
    })?;
    let mut image_bytes = None;
    let mut filter = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                if !bytes.is_empty() {
                    image_bytes = Some(bytes);
                }
            }
            "filter" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                filter = value.to_lowercase() == "true";
            }
            _ => {}
        }
    }

    let Some(bytes) = image_bytes else {
        return Err(ApiError::BadRequest("No image provided".into()));
    };

    let max_image_size = state.max_image_size;
    let image = tokio::task::spawn_blocking(move || decode_image(&bytes, max_image_size))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let result = state.ocr.recognize(image).await?;

    let text = result.text_or_placeholder();
    debug!("OCR text: {}", text);

    if !filter {
        return Ok(Json(TextResponse {
            text: text.to_string(),
        }));
    }

    let text = match state.extractor.extract_from_text(text) {
        Some(table) => table.to_string(),
        None => NO_DATA_MESSAGE.to_string(),
    };
    Ok(Json(TextResponse { text }))
}
