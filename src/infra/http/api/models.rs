use serde::{Deserialize, Serialize};

use crate::application::posts::{CreatePostCommand, UpdatePostCommand};
use crate::application::suggestions::SuggestionCommand;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PostCreateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl From<PostCreateRequest> for CreatePostCommand {
    fn from(request: PostCreateRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            author: request.author,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PostUpdateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl From<PostUpdateRequest> for UpdatePostCommand {
    fn from(request: PostUpdateRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            author: request.author,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SuggestionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<SuggestionRequest> for SuggestionCommand {
    fn from(request: SuggestionRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostCreatedResponse {
    pub message: String,
    #[serde(rename = "postId")]
    pub post_id: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
