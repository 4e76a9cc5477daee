use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content;
use crate::error::DomainError;

/// Author assigned to posts created without one.
pub const ANONYMOUS_USER_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Rubric assigned to posts created without one.
pub const DEFAULT_RUBRIC_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Every new post starts here, whatever state the caller asked for.
pub const INITIAL_STATE: PostState = PostState::Public;

/// Tag substituted when stored tag data is missing or unreadable.
pub const DEFAULT_TAG: &str = "blog";

/// Visibility state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostState {
    /// Being written by its author.
    #[default]
    Write,
    /// Saved, visible to the author and moderators only.
    Moderate,
    /// Visible to everyone.
    Public,
    /// Hidden from everyone but administrators.
    Blocked,
}

impl PostState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostState::Write => "write",
            PostState::Moderate => "moderate",
            PostState::Public => "public",
            PostState::Blocked => "blocked",
        }
    }

    /// Whether a post in this state may move to `next`.
    pub fn can_transition_to(self, next: PostState) -> bool {
        use PostState::*;

        matches!(
            (self, next),
            (Write, Moderate)
                | (Write, Public)
                | (Moderate, Public)
                | (Moderate, Blocked)
                | (Public, Moderate)
                | (Public, Blocked)
                | (Blocked, Moderate)
        ) || self == next
    }
}

impl fmt::Display for PostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "write" => Ok(PostState::Write),
            "moderate" => Ok(PostState::Moderate),
            "public" => Ok(PostState::Public),
            "blocked" => Ok(PostState::Blocked),
            other => Err(DomainError::Validation(format!(
                "unknown post state '{other}'"
            ))),
        }
    }
}

/// Ordered list of labels attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(pub Vec<String>);

impl Tags {
    /// The single-element list used when stored tags cannot be read.
    pub fn fallback() -> Self {
        Self(vec![DEFAULT_TAG.to_string()])
    }

    /// Decode text-encoded tags, falling back instead of failing.
    ///
    /// Missing, empty, malformed or empty-array input all yield
    /// [`Tags::fallback`].
    pub fn decode_lenient(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
            .filter(|tags| !tags.is_empty())
            .map(Self)
            .unwrap_or_else(Self::fallback)
    }

    /// Text encoding used by stores without a native array type.
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

/// Reference from a post to its rubric.
///
/// Only the id is persisted by the relational store; the title travels with
/// the post so edits can carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricRef {
    pub id: Option<String>,
    pub title: String,
}

/// Post entity - a blog story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author_id: Option<String>,
    pub rubric: RubricRef,
    /// Raw author markup. Rendering happens on the way out.
    pub content: String,
    pub tags: Tags,
    pub state: PostState,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub parent_post_id: Option<String>,
    pub count_of_views: u64,
    pub count_of_stars: u64,
    pub comments_ids: Vec<String>,
}

impl Post {
    /// Create a new, unsaved post.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            content: content.into(),
            created_at: now,
            modified_at: now,
            ..Default::default()
        }
    }

    /// Apply the creation policy before first insert.
    ///
    /// Forces [`INITIAL_STATE`], fills in the anonymous author and default
    /// rubric when absent, zeroes the counters and stamps both timestamps.
    /// The id is left to the backend.
    pub fn prepared_for_insert(mut self, now: DateTime<Utc>) -> Self {
        self.state = INITIAL_STATE;
        if self.author_id.as_deref().is_none_or(str::is_empty) {
            self.author_id = Some(ANONYMOUS_USER_ID.to_string());
        }
        if self.rubric.id.as_deref().is_none_or(str::is_empty) {
            self.rubric.id = Some(DEFAULT_RUBRIC_ID.to_string());
        }
        self.count_of_views = 0;
        self.count_of_stars = 0;
        self.created_at = now;
        self.modified_at = now;
        self
    }

    /// Move the post to another visibility state.
    pub fn transition_to(&mut self, next: PostState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn is_public(&self) -> bool {
        self.state == PostState::Public
    }

    pub fn record_view(&mut self) {
        self.count_of_views = self.count_of_views.saturating_add(1);
    }

    pub fn add_star(&mut self) {
        self.count_of_stars = self.count_of_stars.saturating_add(1);
    }

    /// Stars never drop below zero.
    pub fn remove_star(&mut self) {
        self.count_of_stars = self.count_of_stars.saturating_sub(1);
    }

    /// Append comment ids in order, skipping ones already attached.
    pub fn append_comment_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !self.comments_ids.contains(&id) {
                self.comments_ids.push(id);
            }
        }
    }

    /// Safe HTML for display.
    pub fn rendered_content(&self) -> String {
        content::render(&self.content)
    }
}
