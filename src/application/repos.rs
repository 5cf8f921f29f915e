//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::PostRecord;
use crate::domain::posts::{NewPost, PostPatch};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Every stored post, newest first.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<PostRecord, RepoError>;

    /// Applies `patch` and refreshes `updated_at`. `RepoError::NotFound` when absent.
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<PostRecord, RepoError>;

    /// `RepoError::NotFound` when no row was removed.
    async fn delete_post(&self, id: i64) -> Result<(), RepoError>;
}
