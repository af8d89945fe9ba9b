use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use tracing::info;

use crate::api::router::AppState;
use crate::api::{validation_error, ApiResponse, ApiResult};
use crate::models::QaResult;

/// Request body for `POST /api/qa/ask`
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub department: Option<String>,
    pub user_id: Option<String>,
}

/// Answer a question from the document library
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> ApiResult<Json<ApiResponse<QaResult>>> {
    if request.question.trim().is_empty() {
        return Err(validation_error("question", "Question cannot be empty"));
    }

    info!(question = %request.question, "QA request received");

    let result = state
        .qa
        .ask(
            request.question.trim(),
            request.department.as_deref(),
            request.user_id.as_deref(),
        )
        .await;

    Ok(Json(ApiResponse::success(result)))
}
