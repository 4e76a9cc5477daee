//! Relational backend - SeaORM over PostgreSQL.

mod connections;
pub mod entity;
mod relational_repo;

pub use connections::{connect_relational, normalize_descriptor};
pub use relational_repo::RelationalPostRepository;

#[cfg(test)]
mod tests;
