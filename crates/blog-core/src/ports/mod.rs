//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod mailer;
mod repository;

pub use mailer::{MailError, MailMessage, Mailer, mask_address};
pub use repository::{
    BaseRepository, CommentRepository, CommentedPost, PostRepository, TagRepository,
};
