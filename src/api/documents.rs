use axum::extract::{Multipart, State};
use axum::response::Json;
use tracing::{error, info};

use crate::api::router::AppState;
use crate::api::{validation_error, ApiResponse, ApiResult, ErrorResponse};
use crate::core::IngestReport;

/// Maximum accepted upload size in bytes
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Handle document upload via multipart form
///
/// Fields: `file` (required), `title` (defaults to the file name),
/// `department` (optional scoping). The file is chunked, embedded and
/// persisted; the response reports what was created.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<IngestReport>>> {
    let mut filename: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;
    let mut title: Option<String> = None;
    let mut department: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        validation_error("multipart", "Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("unknown").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            error!("Failed to read file bytes: {}", e);
                            validation_error("file", "Failed to read file data")
                        })?
                        .to_vec(),
                );
            }
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    error!("Failed to read title: {}", e);
                    validation_error("title", "Invalid title")
                })?);
            }
            "department" => {
                department = Some(field.text().await.map_err(|e| {
                    error!("Failed to read department: {}", e);
                    validation_error("department", "Invalid department")
                })?);
            }
            _ => {
                info!("Skipping unknown field: {}", name);
            }
        }
    }

    let filename = filename.ok_or_else(|| validation_error("file", "No file provided"))?;
    let file_data = file_data.ok_or_else(|| validation_error("file", "File data is empty"))?;

    if file_data.is_empty() {
        return Err(validation_error("file", "File cannot be empty"));
    }
    if file_data.len() > MAX_UPLOAD_BYTES {
        return Err(validation_error("file", "File size exceeds 10MB limit"));
    }

    let mime_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();
    if mime_type.starts_with("image/") || mime_type.starts_with("video/") {
        return Err(validation_error("file", "Only text documents are supported"));
    }

    let text = String::from_utf8(file_data)
        .map_err(|_| validation_error("file", "File is not valid UTF-8 text"))?;

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| filename.clone());
    let department = department.filter(|d| !d.trim().is_empty());

    info!(%filename, %mime_type, "Processing document upload");

    let report = state
        .processor
        .ingest(title, department, &text)
        .await
        .map_err(ErrorResponse::from)?;

    Ok(Json(ApiResponse::success_with_message(
        report,
        "Document processed".to_string(),
    )))
}
