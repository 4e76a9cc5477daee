use serde::{Deserialize, Serialize};

/// Comment left under a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: Option<String>,
    pub content: String,
    pub count_of_stars: u64,
    pub post_id: String,
}
