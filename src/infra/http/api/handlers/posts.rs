//! Blog post handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::{json_rejection_to_api, parse_post_id, post_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

const CREATED: &str = "Blog post created successfully";
const UPDATED: &str = "Blog post updated successfully";
const DELETED: &str = "Blog post deleted successfully";

pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .posts
        .list()
        .await
        .map_err(|err| post_to_api(err, "Failed to fetch blogs"))?;

    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    let post = state
        .posts
        .get(id)
        .await
        .map_err(|err| post_to_api(err, "Failed to fetch blog"))?;

    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<ApiState>,
    payload: Result<Json<PostCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(json_rejection_to_api)?;
    let post = state
        .posts
        .create(payload.into())
        .await
        .map_err(|err| post_to_api(err, "Failed to create blog"))?;

    Ok((
        StatusCode::CREATED,
        Json(PostCreatedResponse {
            message: CREATED.to_string(),
            post_id: post.id,
        }),
    ))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<PostUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    let Json(payload) = payload.map_err(json_rejection_to_api)?;
    state
        .posts
        .update(id, payload.into())
        .await
        .map_err(|err| post_to_api(err, "Failed to update blog"))?;

    Ok(Json(MessageResponse::new(UPDATED)))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    state
        .posts
        .delete(id)
        .await
        .map_err(|err| post_to_api(err, "Failed to delete blog"))?;

    Ok(Json(MessageResponse::new(DELETED)))
}
