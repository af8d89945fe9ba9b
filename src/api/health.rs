use axum::response::Json;
use serde::Serialize;

use crate::api::{ApiResponse, ApiResult};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Basic liveness check
pub async fn health_check() -> ApiResult<Json<ApiResponse<HealthResponse>>> {
    Ok(Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })))
}
