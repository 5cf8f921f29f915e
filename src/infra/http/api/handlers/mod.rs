//! API handlers organized by resource type.
//!
//! Error conversions shared by the resource modules live here.

mod posts;
mod suggestions;
mod system;

pub use posts::*;
pub use suggestions::*;
pub use system::*;

use axum::extract::rejection::JsonRejection;

use crate::application::posts::PostServiceError;
use crate::application::suggestions::SuggestionError;
use crate::domain::error::DomainError;

use super::error::ApiError;

const POST_NOT_FOUND: &str = "Blog post not found";
const INVALID_BODY: &str = "Invalid request body";
const SUGGESTION_FAILED: &str = "AI suggestion failed";

/// Path ids that are not integers cannot name a stored post.
pub(crate) fn parse_post_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(POST_NOT_FOUND, format!("`{raw}` is not a post id")))
}

pub(crate) fn json_rejection_to_api(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(INVALID_BODY, Some(rejection.body_text()))
}

/// `failure` is the message reported when storage fails.
pub(crate) fn post_to_api(err: PostServiceError, failure: &'static str) -> ApiError {
    match err {
        PostServiceError::Domain(DomainError::NotFound { entity }) => {
            ApiError::not_found(POST_NOT_FOUND, format!("{entity} not found"))
        }
        PostServiceError::Domain(DomainError::Validation { message }) => {
            ApiError::bad_request(message, None)
        }
        PostServiceError::Repo(repo) => ApiError::internal(failure, repo.to_string())
            .caused_by("infra::http::api::handlers::posts", &repo),
    }
}

pub(crate) fn suggestion_to_api(err: SuggestionError) -> ApiError {
    match err {
        SuggestionError::Domain(DomainError::Validation { message }) => {
            ApiError::bad_request(message, None)
        }
        SuggestionError::Domain(other) => ApiError::internal(SUGGESTION_FAILED, other.to_string()),
        SuggestionError::Completion(completion) => {
            ApiError::internal(SUGGESTION_FAILED, completion.to_string())
                .caused_by("infra::http::api::handlers::suggestions", &completion)
        }
    }
}
