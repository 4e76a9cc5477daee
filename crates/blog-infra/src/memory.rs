//! In-memory post repository - used when no store is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::RepoError;
use blog_core::domain::{Post, merge_update};
use blog_core::ports::{Page, PostRepository, ensure_id};

/// Post repository over a `HashMap` behind an async `RwLock`.
///
/// Follows the same creation policy, merge and listing rules as the
/// database backends. Data is lost on process restart.
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<String, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
        }
    }

    /// Apply `f` to the stored post, or fail with `NotFound`.
    async fn modify<F>(&self, id: &str, f: F) -> Result<(), RepoError>
    where
        F: FnOnce(&mut Post),
    {
        let id = ensure_id(id)?;
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(id).ok_or_else(|| RepoError::not_found(id))?;
        f(post);
        Ok(())
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: &str) -> Result<Post, RepoError> {
        let id = ensure_id(id)?;
        let posts = self.posts.read().await;
        posts.get(id).cloned().ok_or_else(|| RepoError::not_found(id))
    }

    async fn find(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut listed: Vec<Post> = posts.values().filter(|p| p.is_public()).cloned().collect();
        drop(posts);

        listed.sort_by(|a, b| {
            b.count_of_stars
                .cmp(&a.count_of_stars)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        Ok(listed.into_iter().skip(offset).take(limit).collect())
    }

    async fn save(&self, post: Post) -> Result<String, RepoError> {
        let mut post = post.prepared_for_insert(Utc::now());
        let id = Uuid::new_v4().to_string();
        post.id = id.clone();

        self.posts.write().await.insert(id.clone(), post);
        tracing::debug!(post_id = %id, "Post saved in memory");
        Ok(id)
    }

    async fn update(&self, post: Post) -> Result<(), RepoError> {
        let id = ensure_id(&post.id)?.to_string();
        let mut posts = self.posts.write().await;
        let existing = posts
            .get(&id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(&id))?;

        let outcome = merge_update(existing, &post, Utc::now());
        tracing::debug!(post_id = %id, changed = ?outcome.changed, "Post updated in memory");
        posts.insert(id, outcome.post);
        Ok(())
    }

    async fn increment_views(&self, id: &str) -> Result<(), RepoError> {
        self.modify(id, Post::record_view).await
    }

    async fn increment_stars(&self, id: &str) -> Result<(), RepoError> {
        self.modify(id, Post::add_star).await
    }

    async fn decrement_stars(&self, id: &str) -> Result<(), RepoError> {
        self.modify(id, Post::remove_star).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let id = ensure_id(id)?;
        self.posts
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found(id))
    }
}
