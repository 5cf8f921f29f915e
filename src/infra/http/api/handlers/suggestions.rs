//! Writing suggestion handler

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;

use super::{json_rejection_to_api, suggestion_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{SuggestionRequest, SuggestionsResponse};
use crate::infra::http::api::state::ApiState;

pub async fn suggest(
    State(state): State<ApiState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(json_rejection_to_api)?;
    let suggestions = state
        .suggestions
        .suggest(payload.into())
        .await
        .map_err(suggestion_to_api)?;

    Ok(Json(SuggestionsResponse { suggestions }))
}
