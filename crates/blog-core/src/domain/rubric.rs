use serde::{Deserialize, Serialize};

/// Rubric - topical category of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    pub id: String,
    pub title: String,
    pub description: String,
}
