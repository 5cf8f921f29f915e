use std::sync::Arc;

use crate::application::posts::PostService;
use crate::application::repos::{PostsRepo, PostsWriteRepo};
use crate::application::suggestions::{CompletionClient, SuggestionService};
use crate::infra::completion::GroqKeyDiagnostics;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    pub suggestions: Arc<SuggestionService>,
    pub groq_key: GroqKeyDiagnostics,
}

impl ApiState {
    pub fn new(
        posts_repo: Arc<dyn PostsRepo>,
        posts_write_repo: Arc<dyn PostsWriteRepo>,
        completion: Arc<dyn CompletionClient>,
        groq_key: GroqKeyDiagnostics,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(posts_repo, posts_write_repo)),
            suggestions: Arc::new(SuggestionService::new(completion)),
            groq_key,
        }
    }
}
