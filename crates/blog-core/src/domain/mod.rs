//! Domain entities - the core business objects.

mod comment;
mod merge;
mod post;
mod rubric;
mod user;

pub use comment::Comment;
pub use merge::{MergeOutcome, merge_update};
pub use post::{
    ANONYMOUS_USER_ID, DEFAULT_RUBRIC_ID, DEFAULT_TAG, INITIAL_STATE, Post, PostState, RubricRef,
    Tags,
};
pub use rubric::Rubric;
pub use user::{User, UserRole};
