//! Liveness and configuration diagnostics

use axum::Json;
use axum::extract::State;

use crate::infra::completion::GroqKeyDiagnostics;
use crate::infra::http::api::models::HealthResponse;
use crate::infra::http::api::state::ApiState;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Blog API running".to_string(),
    })
}

pub async fn groq_key_diagnostics(State(state): State<ApiState>) -> Json<GroqKeyDiagnostics> {
    Json(state.groq_key)
}
