//! Document upload endpoint.
//!
//! `POST /api/upload` — receives one file as multipart form data, saves
//! it under the upload directory, and runs the processing pipeline on a
//! blocking worker.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::report::SummaryReport;

#[derive(Serialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub filename: String,
    pub report: SummaryReport,
}

/// `POST /api/upload` — accept one document and process it synchronously.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(sanitize_filename)
            .ok_or_else(|| ApiError::BadRequest("File field has no filename".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file field: {e}")))?;
        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".into()))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }
    if bytes.len() as u64 > ctx.config.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge {
            limit_bytes: ctx.config.max_upload_bytes,
        });
    }

    let extension = PathBuf::from(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !ctx.config.extension_allowed(&extension) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "File type '{extension}' is not allowed"
        )));
    }

    let document_id = Uuid::new_v4();
    let document_dir = ctx.config.upload_dir.join(document_id.to_string());
    std::fs::create_dir_all(&document_dir)
        .map_err(|e| ApiError::Internal(format!("Upload directory: {e}")))?;

    let source_path = document_dir.join(&filename);
    std::fs::write(&source_path, &bytes)
        .map_err(|e| ApiError::Internal(format!("Saving upload: {e}")))?;

    tracing::info!(
        document_id = %document_id,
        filename,
        size = bytes.len(),
        "document received"
    );

    // The pipeline is blocking (OCR, synchronous HTTP to the completion
    // backend), so it runs off the async executor.
    let processor = Arc::clone(&ctx.processor);
    let report = tokio::task::spawn_blocking(move || {
        processor.process_file(&source_path, &document_dir)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Processing task failed: {e}")))??;

    Ok(Json(UploadResponse {
        document_id: document_id.to_string(),
        filename,
        report,
    }))
}

/// Strip any path components from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    PathBuf::from(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .replace(['\\', ':'], "_")
}
