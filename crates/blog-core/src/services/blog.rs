use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag};
use crate::error::DomainError;
use crate::forms::{self, CommentForm, EmailPostForm};
use crate::pagination::{POSTS_PER_PAGE, Page, PageWindow};
use crate::ports::{
    CommentRepository, CommentedPost, MailMessage, Mailer, PostRepository, TagRepository,
    mask_address,
};
use crate::search::{SearchHit, SearchQuery};

/// How many related posts a detail view shows.
pub const SIMILAR_POSTS_LIMIT: u64 = 4;
/// How many entries the latest and most-commented sidebars show.
pub const SIDEBAR_LIMIT: u64 = 5;

const DEFAULT_MAIL_FROM: &str = "noreply@blog.local";

/// One page of the post listing, with the tag it was filtered by.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub tag: Option<Tag>,
    pub page: Page<Post>,
}

/// Everything the detail view shows next to the post itself.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub similar: Vec<Post>,
}

/// Site-wide widgets shown next to listings and posts.
#[derive(Debug, Clone)]
pub struct Sidebar {
    pub total_posts: u64,
    pub latest: Vec<Post>,
    pub most_commented: Vec<CommentedPost>,
}

/// Result of a share request.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub post: Post,
    pub sent: bool,
}

/// Reader-facing blog operations.
///
/// Every read goes through the published-only repository queries, so drafts
/// are indistinguishable from missing posts.
pub struct BlogService {
    pub(super) posts: Arc<dyn PostRepository>,
    pub(super) comments: Arc<dyn CommentRepository>,
    pub(super) tags: Arc<dyn TagRepository>,
    mailer: Arc<dyn Mailer>,
    mail_from: String,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            mailer,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
        }
    }

    /// Sender address for share mails.
    pub fn with_mail_from(mut self, from: impl Into<String>) -> Self {
        self.mail_from = from.into();
        self
    }

    /// Published posts, newest first, optionally filtered by tag slug.
    pub async fn list(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let tag = match tag_slug {
            Some(slug) => Some(
                self.tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Tag", slug))?,
            ),
            None => None,
        };
        let tag_id = tag.as_ref().map(|t| t.id);

        let total = self.posts.count_published(tag_id).await?;
        let window = PageWindow::resolve(page, total, POSTS_PER_PAGE);
        let items = self
            .posts
            .list_published(tag_id, window.offset(), window.limit())
            .await?;

        tracing::debug!(
            tag = tag_slug.unwrap_or("-"),
            page = window.number,
            num_pages = window.num_pages,
            "Listing published posts"
        );

        Ok(PostListing {
            tag,
            page: Page::new(items, window),
        })
    }

    /// A published post by its date path segments and slug, with its active
    /// comments and similar posts.
    pub async fn detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<PostDetail, DomainError> {
        let not_found = || DomainError::not_found("Post", format!("{year}/{month}/{day}/{slug}"));

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(not_found)?;
        let post = self
            .posts
            .find_published_by_date_and_slug(date, slug)
            .await?
            .ok_or_else(not_found)?;

        let comments = self.comments.find_active_by_post(post.id).await?;
        let similar = self.similar(&post, SIMILAR_POSTS_LIMIT).await?;

        Ok(PostDetail {
            post,
            comments,
            similar,
        })
    }

    pub async fn similar(&self, post: &Post, limit: u64) -> Result<Vec<Post>, DomainError> {
        if post.tags.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.posts.similar_published(post, limit).await?)
    }

    /// Ranked full-text search. Queries with nothing searchable in them
    /// return no results rather than an error.
    pub async fn search(&self, raw: &str) -> Result<Vec<SearchHit<Post>>, DomainError> {
        let Some(query) = SearchQuery::parse(raw) else {
            return Ok(Vec::new());
        };

        let hits = self.posts.search_published(&query).await?;
        tracing::debug!(query = %query.as_str(), hits = hits.len(), "Search completed");
        Ok(hits)
    }

    pub async fn total_posts(&self) -> Result<u64, DomainError> {
        Ok(self.posts.count_published(None).await?)
    }

    pub async fn latest(&self, limit: u64) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_published(None, 0, limit).await?)
    }

    pub async fn most_commented(&self, limit: u64) -> Result<Vec<CommentedPost>, DomainError> {
        Ok(self.posts.most_commented(limit).await?)
    }

    pub async fn sidebar(&self) -> Result<Sidebar, DomainError> {
        Ok(Sidebar {
            total_posts: self.total_posts().await?,
            latest: self.latest(SIDEBAR_LIMIT).await?,
            most_commented: self.most_commented(SIDEBAR_LIMIT).await?,
        })
    }

    /// A published post by id.
    pub async fn published_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_published_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    /// Attach a reader comment to a published post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let post = self.published_post(post_id).await?;
        let form = forms::clean(form, CommentForm::cleaned).map_err(DomainError::Validation)?;

        let comment = Comment::new(post.id, form.name, form.email, form.body);
        let saved = self.comments.save(comment).await?;

        tracing::info!(
            post_id = %post.id,
            comment_id = %saved.id,
            author = %mask_address(&saved.email),
            "Comment added"
        );

        Ok(saved)
    }

    /// Recommend a published post by email. `site_url` is the scheme and
    /// host the post URL is built on, without a trailing slash.
    ///
    /// Transport failures are returned to the caller as-is; nothing is retried.
    pub async fn share(
        &self,
        post_id: Uuid,
        form: EmailPostForm,
        site_url: &str,
    ) -> Result<ShareOutcome, DomainError> {
        let post = self.published_post(post_id).await?;
        let form = forms::clean(form, EmailPostForm::cleaned).map_err(DomainError::Validation)?;

        let post_url = format!("{}{}", site_url.trim_end_matches('/'), post.absolute_path());
        let message = MailMessage {
            subject: format!("{} recommends you read {}", form.name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments: {}",
                post.title, post_url, form.name, form.comments
            ),
            from: self.mail_from.clone(),
            reply_to: Some(form.email),
            to: vec![form.to],
        };

        let recipient = mask_address(&message.to[0]);
        self.mailer.send(message).await?;
        tracing::info!(post_id = %post.id, to = %recipient, "Post shared by email");

        Ok(ShareOutcome { post, sent: true })
    }
}
