//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains the database repositories and mail transports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;
pub mod mail;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryBlogStore};
pub use mail::{ConsoleMailer, InMemoryMailer};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository};
