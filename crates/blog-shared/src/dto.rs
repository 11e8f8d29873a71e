//! Data Transfer Objects - response types for the blog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag as shown next to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

/// A published post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Canonical detail path, `/<year>/<month>/<day>/<slug>/`.
    pub url: String,
    pub tags: Vec<TagResponse>,
}

/// A reader comment. The submitter's email is never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentedPostResponse {
    pub post: PostResponse,
    pub total_comments: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidebarResponse {
    pub total_posts: u64,
    pub latest: Vec<PostResponse>,
    pub most_commented: Vec<CommentedPostResponse>,
}

/// GET / and GET /<tag_slug>/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagResponse>,
    pub posts: PageResponse<PostResponse>,
    pub sidebar: SidebarResponse,
}

/// GET /<year>/<month>/<day>/<slug>/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub similar_posts: Vec<PostResponse>,
    /// Where the comment form posts to.
    pub comment_url: String,
    pub sidebar: SidebarResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultResponse {
    pub post: PostResponse,
    pub rank: f32,
}

/// GET /search/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultResponse>,
}

/// POST /<post_id>/comment/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub post: PostResponse,
    pub comment: CommentResponse,
}

/// GET and POST /<post_id>/share/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub post: PostResponse,
    pub sent: bool,
}
