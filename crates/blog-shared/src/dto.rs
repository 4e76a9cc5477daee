//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of a create or edit request. Every field may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rubric_id: Option<String>,
    /// Raw markdown.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A post as returned to readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub author_id: Option<String>,
    pub rubric_id: Option<String>,
    pub rubric_title: String,
    /// Raw markdown as stored.
    pub content: String,
    /// Sanitized HTML rendered from `content`.
    pub content_html: String,
    pub tags: Vec<String>,
    pub state: String,
    pub created_at: String,
    pub modified_at: String,
    pub parent_post_id: Option<String>,
    pub count_of_views: u64,
    pub count_of_stars: u64,
    pub comments_ids: Vec<String>,
}

/// `?limit=&offset=` on the listing route. Missing or non-positive values
/// fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Id of a newly created resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}
