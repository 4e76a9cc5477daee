//! # Blog Core
//!
//! The domain layer of the blog service: posts and their rules, the update
//! merge, content rendering and the storage port every backend implements.
//! No infrastructure dependencies live here.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, ErrorKind, RepoError};
