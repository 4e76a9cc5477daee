//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod repository;

pub use repository::{DEFAULT_PAGE_LIMIT, Page, PostRepository, ensure_id};
