use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api::documents::upload_document;
use crate::api::health::health_check;
use crate::api::qa::ask_question;
use crate::api::tickets::{create_ticket, routing_feedback, suggest_replies};
use crate::core::{AnswerComposer, DocumentProcessor, QaService, TicketRouter};
use crate::storage::Storage;

/// Shared handler state, assembled once by the composition root
#[derive(Clone)]
pub struct AppState {
    pub qa: Arc<QaService>,
    pub ticket_router: Arc<TicketRouter>,
    pub composer: Arc<AnswerComposer>,
    pub processor: Arc<DocumentProcessor>,
    pub storage: Arc<dyn Storage>,
}

/// Build the API router with all endpoints and middleware
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/qa/ask", post(ask_question))
        .route("/api/tickets", post(create_ticket))
        .route("/api/tickets/:id/suggest-replies", post(suggest_replies))
        .route("/api/tickets/:id/routing-feedback", post(routing_feedback))
        .route("/api/documents/upload", post(upload_document))
        .route("/api/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(60))),
        )
        .with_state(state)
}
