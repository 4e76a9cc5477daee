//! # Blog Infrastructure
//!
//! Storage backends implementing the `PostRepository` port from `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `relational` - PostgreSQL via SeaORM
//! - `document` - MongoDB

pub mod config;
pub mod memory;
pub mod seed;
pub mod selector;
mod timeout;

#[cfg(feature = "relational")]
pub mod database;

#[cfg(feature = "document")]
pub mod document;

// Re-exports - In-Memory
pub use config::StorageConfig;
pub use memory::InMemoryPostRepository;
pub use selector::{BackendKind, connect_post_repository, redact_descriptor};

// Re-exports - Database backends
#[cfg(feature = "relational")]
pub use database::RelationalPostRepository;

#[cfg(feature = "document")]
pub use document::DocumentPostRepository;
