//! Update merge - folds a partial edit into the stored post.
//!
//! Mergeable fields are listed one by one. A new editable field has to be
//! added here explicitly.

use chrono::{DateTime, Utc};

use super::Post;

/// Result of merging an edit into a stored post.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub post: Post,
    /// Names of the fields whose value changed.
    pub changed: Vec<&'static str>,
}

/// Merge `incoming` into `existing`.
///
/// `title`, `content` and `rubric.title` take the incoming value when it
/// differs from the stored one. `modified_at` is always set to `now`.
/// Every other field keeps the stored value.
pub fn merge_update(mut existing: Post, incoming: &Post, now: DateTime<Utc>) -> MergeOutcome {
    let mut changed = Vec::new();

    if existing.title != incoming.title {
        existing.title = incoming.title.clone();
        changed.push("title");
    }
    if existing.content != incoming.content {
        existing.content = incoming.content.clone();
        changed.push("content");
    }
    if existing.rubric.title != incoming.rubric.title {
        existing.rubric.title = incoming.rubric.title.clone();
        changed.push("rubric.title");
    }
    existing.modified_at = now;

    MergeOutcome {
        post: existing,
        changed,
    }
}
