//! Use cases - the reader-facing flows and the authoring operations they
//! depend on, expressed against the ports only.

mod authoring;
mod blog;

pub use authoring::{NewPost, RESERVED_TAG_SLUGS};
pub use blog::{
    BlogService, PostDetail, PostListing, SIDEBAR_LIMIT, SIMILAR_POSTS_LIMIT, ShareOutcome,
    Sidebar,
};
