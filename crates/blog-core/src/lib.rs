//! # Blog Core
//!
//! The domain layer of the blog: posts, comments and tags, the published-only
//! query contracts, form validation, and the reader-facing use cases.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod search;
pub mod services;

pub use error::{DomainError, FieldErrors, RepoError};
pub use services::BlogService;
