//! Blog post use cases behind the REST endpoints.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::application::repos::{PostsRepo, PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::domain::posts::{NewPost, PostPatch};

const POST_ENTITY: &str = "post";

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Fields of a create request as received. Validation happens in the service.
#[derive(Debug, Clone, Default)]
pub struct CreatePostCommand {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

/// Fields of an update request as received. Empty fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        self.reader.list_posts().await.map_err(PostServiceError::from)
    }

    pub async fn get(&self, id: i64) -> Result<PostRecord, PostServiceError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(POST_ENTITY).into())
    }

    pub async fn create(&self, command: CreatePostCommand) -> Result<PostRecord, PostServiceError> {
        let post = NewPost::new(command.title, command.content, command.author)?;
        let record = self.writer.create_post(post).await?;

        info!(
            target = "blogify::application::posts::create",
            post_id = record.id,
            author = %record.author,
            "post created"
        );

        Ok(record)
    }

    pub async fn update(
        &self,
        id: i64,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        let patch = PostPatch::new(command.title, command.content, command.author);
        if patch.is_empty() {
            debug!(
                target = "blogify::application::posts::update",
                post_id = id,
                "update carries no fields; refreshing timestamp only"
            );
        }

        let record = self
            .writer
            .update_post(id, patch)
            .await
            .map_err(not_found_as_domain)?;

        info!(
            target = "blogify::application::posts::update",
            post_id = record.id,
            "post updated"
        );

        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        self.writer
            .delete_post(id)
            .await
            .map_err(not_found_as_domain)?;

        info!(
            target = "blogify::application::posts::delete",
            post_id = id,
            "post deleted"
        );

        Ok(())
    }
}

fn not_found_as_domain(err: RepoError) -> PostServiceError {
    match err {
        RepoError::NotFound => DomainError::not_found(POST_ENTITY).into(),
        other => other.into(),
    }
}
