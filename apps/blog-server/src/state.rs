//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::RepoError;
use blog_core::ports::PostRepository;
use blog_infra::{StorageConfig, connect_post_repository};

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the state with the backend the descriptor selects.
    pub async fn new(storage: &StorageConfig) -> Result<Self, RepoError> {
        let posts = connect_post_repository(storage).await?;
        tracing::info!(backend = posts.backend_name(), "Application state initialized");
        Ok(Self { posts })
    }

    pub fn with_repository(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}
