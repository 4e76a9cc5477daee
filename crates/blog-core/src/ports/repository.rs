use async_trait::async_trait;

use crate::domain::Post;
use crate::error::RepoError;

/// Page size used when the caller asks for zero or fewer posts.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

/// Normalised limit/offset window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Build a page from raw query values.
    ///
    /// A non-positive `limit` becomes [`DEFAULT_PAGE_LIMIT`], a negative
    /// `offset` becomes 0.
    pub fn new(limit: i64, offset: i64) -> Self {
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = u64::try_from(offset).unwrap_or(0);
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Post storage contract, honoured identically by every backend.
///
/// Ids are plain strings at this boundary whatever the store uses natively.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Find a post by id. A missing post is `RepoError::NotFound`.
    async fn find_by_id(&self, id: &str) -> Result<Post, RepoError>;

    /// List public posts, most starred first.
    async fn find(&self, page: Page) -> Result<Vec<Post>, RepoError>;

    /// Insert a new post under the creation policy and return its id.
    async fn save(&self, post: Post) -> Result<String, RepoError>;

    /// Merge an edit into the stored post with the same id.
    async fn update(&self, post: Post) -> Result<(), RepoError>;

    async fn increment_views(&self, id: &str) -> Result<(), RepoError>;

    async fn increment_stars(&self, id: &str) -> Result<(), RepoError>;

    /// Remove one star. A post already at zero stays at zero.
    async fn decrement_stars(&self, id: &str) -> Result<(), RepoError>;

    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}

/// Reject empty ids before they reach a store.
pub fn ensure_id(id: &str) -> Result<&str, RepoError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepoError::invalid_input("post id must not be empty"));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_limit_uses_default() {
        for limit in [0, -1, -50, i64::MIN] {
            assert_eq!(Page::new(limit, 0).limit, DEFAULT_PAGE_LIMIT);
        }
        assert_eq!(Page::new(1, 0).limit, 1);
        assert_eq!(Page::new(500, 0).limit, 500);
    }

    #[test]
    fn test_negative_offset_is_zero() {
        for offset in [-1, -10, i64::MIN] {
            assert_eq!(Page::new(10, offset).offset, 0);
        }
        assert_eq!(Page::new(10, 20).offset, 20);
    }

    #[test]
    fn test_ensure_id() {
        assert!(ensure_id("").is_err());
        assert!(ensure_id("   ").is_err());
        assert_eq!(ensure_id(" abc ").unwrap(), "abc");
    }
}
