use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::router::AppState;
use crate::api::{internal_error, not_found_error, validation_error, ApiResponse, ApiResult};
use crate::models::{ReplySuggestion, RoutingDecision, Ticket};

/// Request body for `POST /api/tickets`
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub body: String,
    pub user_id: Option<String>,
}

/// Response for ticket creation: the stored ticket plus how it was routed
#[derive(Debug, Serialize)]
pub struct CreateTicketResponse {
    pub ticket: Ticket,
    pub routing: RoutingDecision,
}

/// Request body for `POST /api/tickets/:id/routing-feedback`
#[derive(Debug, Deserialize)]
pub struct RoutingFeedbackRequest {
    pub rule_id: Uuid,
    pub was_correct: bool,
}

/// Response for routing feedback
#[derive(Debug, Serialize)]
pub struct RoutingFeedbackResponse {
    pub rule_id: Uuid,
    pub accuracy: u8,
}

/// Create a ticket and route it to a department
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> ApiResult<Json<ApiResponse<CreateTicketResponse>>> {
    if request.subject.trim().is_empty() {
        return Err(validation_error("subject", "Subject cannot be empty"));
    }
    if request.body.trim().is_empty() {
        return Err(validation_error("body", "Body cannot be empty"));
    }

    let mut ticket = Ticket::new(
        request.subject.trim().to_string(),
        request.body.trim().to_string(),
        request.user_id,
    );

    state
        .storage
        .create_ticket(ticket.clone())
        .await
        .map_err(|e| internal_error(&format!("Failed to store ticket: {e}")))?;

    let routing = state.ticket_router.route(&ticket.subject, &ticket.body).await;
    ticket.department = Some(routing.department);

    if let Err(e) = state
        .storage
        .update_ticket_department(ticket.id, routing.department)
        .await
    {
        // The routing decision still stands; assignment is retried by support staff
        warn!(error = %e, ticket_id = %ticket.id, "Failed to persist routed department");
    }

    info!(ticket_id = %ticket.id, department = %routing.department, "Ticket created");
    Ok(Json(ApiResponse::success(CreateTicketResponse {
        ticket,
        routing,
    })))
}

/// Generate tone-varied reply suggestions for a ticket
pub async fn suggest_replies(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<ReplySuggestion>>>> {
    let ticket = state
        .storage
        .ticket(ticket_id)
        .await
        .map_err(|e| internal_error(&format!("Failed to load ticket: {e}")))?
        .ok_or_else(|| not_found_error(format!("ticket {ticket_id}")))?;

    let suggestions = state
        .composer
        .suggest_replies(&ticket.subject, &ticket.body)
        .await;

    Ok(Json(ApiResponse::success(suggestions)))
}

/// Record whether a rule-based routing decision was correct
pub async fn routing_feedback(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(request): Json<RoutingFeedbackRequest>,
) -> ApiResult<Json<ApiResponse<RoutingFeedbackResponse>>> {
    state
        .storage
        .ticket(ticket_id)
        .await
        .map_err(|e| internal_error(&format!("Failed to load ticket: {e}")))?
        .ok_or_else(|| not_found_error(format!("ticket {ticket_id}")))?;

    let accuracy = state
        .ticket_router
        .record_feedback(request.rule_id, request.was_correct)
        .await
        .map_err(crate::api::ErrorResponse::from)?;

    Ok(Json(ApiResponse::success(RoutingFeedbackResponse {
        rule_id: request.rule_id,
        accuracy,
    })))
}
