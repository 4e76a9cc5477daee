//! MongoDB backend.

mod model;
mod mongo_repo;

pub use model::PostDocument;
pub use mongo_repo::{DEFAULT_DATABASE, DocumentPostRepository};
