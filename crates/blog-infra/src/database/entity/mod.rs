//! SeaORM entities for the relational schema.

pub mod comment;
pub mod post;
pub mod rubric;
pub mod user;
