use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, Tag, slugify};
use crate::error::DomainError;

use super::BlogService;

/// Tag slugs that collide with fixed top-level routes and so could never be
/// listed.
pub const RESERVED_TAG_SLUGS: &[&str] = &["search"];

/// Input for a new draft.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    /// Defaults to now.
    pub publish: Option<DateTime<Utc>>,
}

impl BlogService {
    /// Create a draft post. Tags are looked up by slug and created on first use.
    pub async fn create_draft(&self, new: NewPost) -> Result<Post, DomainError> {
        let mut post = Post::new(new.author_id, new.title, new.body);
        if let Some(publish) = new.publish {
            post = post.with_publish(publish);
        }
        if post.slug.is_empty() {
            return Err(DomainError::Validation(
                [("title".to_string(), vec!["Title must produce a non-empty slug.".to_string()])]
                    .into_iter()
                    .collect(),
            ));
        }

        if self
            .posts
            .slug_taken(&post.slug, post.publish_date(), post.id)
            .await?
        {
            return Err(DomainError::Duplicate(format!(
                "slug '{}' is already used on {}",
                post.slug,
                post.publish_date()
            )));
        }

        let tags = self.resolve_tags(&new.tags).await?;
        let saved = self.posts.save(post.with_tags(tags)).await?;
        tracing::info!(post_id = %saved.id, slug = %saved.slug, "Draft created");
        Ok(saved)
    }

    /// Publish a post. Publishing an already published post is a no-op.
    pub async fn publish(&self, post_id: Uuid) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        if post.is_published() {
            return Ok(post);
        }

        post.publish();
        let saved = self.posts.save(post).await?;
        tracing::info!(post_id = %saved.id, path = %saved.absolute_path(), "Post published");
        Ok(saved)
    }

    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<Tag>, DomainError> {
        let reserved: Vec<String> = names
            .iter()
            .filter(|name| RESERVED_TAG_SLUGS.contains(&slugify(name).as_str()))
            .map(|name| format!("'{}' is reserved and cannot be used as a tag.", name.trim()))
            .collect();
        if !reserved.is_empty() {
            return Err(DomainError::Validation(
                [("tags".to_string(), reserved)].into_iter().collect(),
            ));
        }

        let mut resolved: Vec<Tag> = Vec::with_capacity(names.len());

        for name in names {
            let slug = slugify(name);
            if slug.is_empty() || resolved.iter().any(|t| t.slug == slug) {
                continue;
            }
            let tag = match self.tags.find_by_slug(&slug).await? {
                Some(tag) => tag,
                None => self.tags.save(Tag::new(name.trim())).await?,
            };
            resolved.push(tag);
        }

        Ok(resolved)
    }
}
