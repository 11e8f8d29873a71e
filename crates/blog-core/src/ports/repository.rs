use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag};
use crate::error::RepoError;
use crate::search::{SearchHit, SearchQuery};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// A published post together with how many comments it has.
#[derive(Debug, Clone)]
pub struct CommentedPost {
    pub post: Post,
    pub total_comments: u64,
}

/// Post repository.
///
/// `find_by_id` and `save` see every post; all other reads are restricted
/// to published posts. Saving a post also replaces its tag links with
/// `post.tags`, which must already exist.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Exact match on slug and the calendar date (UTC) of `publish`.
    async fn find_published_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Whether another post already uses `slug` on `date`.
    async fn slug_taken(&self, slug: &str, date: NaiveDate, except: Uuid)
    -> Result<bool, RepoError>;

    async fn count_published(&self, tag_id: Option<Uuid>) -> Result<u64, RepoError>;

    /// Published posts, newest `publish` first, optionally limited to a tag.
    async fn list_published(
        &self,
        tag_id: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Published posts sharing at least one tag with `post`, excluding it,
    /// by shared tag count then `publish`, both descending.
    async fn similar_published(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Published posts matching every term, best match first.
    async fn search_published(&self, query: &SearchQuery)
    -> Result<Vec<SearchHit<Post>>, RepoError>;

    /// Published posts with the most comments first.
    async fn most_commented(&self, limit: u64) -> Result<Vec<CommentedPost>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments of a post, oldest first.
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}
