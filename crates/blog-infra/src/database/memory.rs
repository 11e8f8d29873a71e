//! In-memory blog store - used when no database is configured.
//!
//! Mirrors the PostgreSQL repositories: post-tag links live in an explicit
//! join relation indexed from both sides, comments cascade with their post,
//! and every reader query goes through the published-only view.
//! Note: Data is lost on process restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Comment, Post, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentRepository, CommentedPost, PostRepository, TagRepository,
};
use blog_core::search::{SearchHit, SearchQuery};

#[derive(Default)]
struct StoreData {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    tags: HashMap<Uuid, Tag>,
    post_tags: HashMap<Uuid, HashSet<Uuid>>,
    tag_posts: HashMap<Uuid, HashSet<Uuid>>,
}

impl StoreData {
    /// A copy of the post with its tags loaded from the join relation.
    fn hydrate(&self, post: &Post) -> Post {
        let mut tags: Vec<Tag> = self
            .post_tags
            .get(&post.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        Post {
            tags,
            ..post.clone()
        }
    }

    fn has_link(&self, post_id: Uuid, tag_id: Uuid) -> bool {
        self.post_tags
            .get(&post_id)
            .is_some_and(|tags| tags.contains(&tag_id))
    }

    /// Published posts, newest first, optionally limited to one tag.
    fn published(&self, tag_id: Option<Uuid>) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| p.is_published())
            .filter(|p| match tag_id {
                Some(tag_id) => self.has_link(p.id, tag_id),
                None => true,
            })
            .collect();
        posts.sort_by(|a, b| newest_first(a, b));
        posts
    }

    fn unlink_post(&mut self, post_id: Uuid) {
        for tag_id in self.post_tags.remove(&post_id).unwrap_or_default() {
            if let Some(posts) = self.tag_posts.get_mut(&tag_id) {
                posts.remove(&post_id);
            }
        }
    }

    fn link_post(&mut self, post_id: Uuid, tag_ids: impl IntoIterator<Item = Uuid>) {
        for tag_id in tag_ids {
            self.post_tags.entry(post_id).or_default().insert(tag_id);
            self.tag_posts.entry(tag_id).or_default().insert(post_id);
        }
    }

    fn slug_on_date(&self, slug: &str, date: NaiveDate) -> impl Iterator<Item = &Post> {
        self.posts
            .values()
            .filter(move |p| p.slug == slug && p.publish_date() == date)
    }
}

fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.publish
        .cmp(&a.publish)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// In-memory implementation of every blog repository.
pub struct InMemoryBlogStore {
    data: RwLock<StoreData>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
        }
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let data = self.data.read().await;
        Ok(data.posts.get(&id).map(|p| data.hydrate(p)))
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut data = self.data.write().await;

        if let Some(missing) = post.tags.iter().find(|t| !data.tags.contains_key(&t.id)) {
            return Err(RepoError::Constraint(format!("unknown tag {}", missing.id)));
        }

        if data.posts.contains_key(&post.id) {
            post.updated_at = Utc::now();
        }

        let tag_ids: Vec<Uuid> = post.tags.iter().map(|t| t.id).collect();
        data.unlink_post(post.id);
        data.link_post(post.id, tag_ids);

        let saved = data.hydrate(&post);
        post.tags.clear();
        data.posts.insert(post.id, post);

        tracing::debug!(post_id = %saved.id, tags = saved.tags.len(), "Post saved");
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut data = self.data.write().await;
        if data.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        data.unlink_post(id);
        data.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let data = self.data.read().await;
        Ok(data
            .posts
            .get(&id)
            .filter(|p| p.is_published())
            .map(|p| data.hydrate(p)))
    }

    async fn find_published_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let data = self.data.read().await;
        let found = data
            .slug_on_date(slug, date)
            .filter(|p| p.is_published())
            .min_by(|a, b| newest_first(a, b))
            .map(|p| data.hydrate(p));
        Ok(found)
    }

    async fn slug_taken(
        &self,
        slug: &str,
        date: NaiveDate,
        except: Uuid,
    ) -> Result<bool, RepoError> {
        let data = self.data.read().await;
        let taken = data.slug_on_date(slug, date).any(|p| p.id != except);
        Ok(taken)
    }

    async fn count_published(&self, tag_id: Option<Uuid>) -> Result<u64, RepoError> {
        let data = self.data.read().await;
        Ok(data.published(tag_id).len() as u64)
    }

    async fn list_published(
        &self,
        tag_id: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let data = self.data.read().await;
        Ok(data
            .published(tag_id)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| data.hydrate(p))
            .collect())
    }

    async fn similar_published(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let data = self.data.read().await;

        let mut shared: HashMap<Uuid, usize> = HashMap::new();
        for tag_id in data.post_tags.get(&post.id).into_iter().flatten() {
            for other in data.tag_posts.get(tag_id).into_iter().flatten() {
                if *other != post.id {
                    *shared.entry(*other).or_default() += 1;
                }
            }
        }

        let mut candidates: Vec<(&Post, usize)> = shared
            .into_iter()
            .filter_map(|(id, count)| data.posts.get(&id).map(|p| (p, count)))
            .filter(|(p, _)| p.is_published())
            .collect();
        candidates.sort_by(|(a, a_count), (b, b_count)| {
            b_count.cmp(a_count).then_with(|| newest_first(a, b))
        });

        Ok(candidates
            .into_iter()
            .take(limit as usize)
            .map(|(p, _)| data.hydrate(p))
            .collect())
    }

    async fn search_published(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SearchHit<Post>>, RepoError> {
        let data = self.data.read().await;

        let mut hits: Vec<(&Post, f32)> = data
            .published(None)
            .into_iter()
            .filter_map(|p| query.rank(&p.title, &p.body).map(|rank| (p, rank)))
            .collect();
        // `published` is already newest first and the sort is stable.
        hits.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        Ok(hits
            .into_iter()
            .map(|(p, rank)| SearchHit {
                post: data.hydrate(p),
                rank,
            })
            .collect())
    }

    async fn most_commented(&self, limit: u64) -> Result<Vec<CommentedPost>, RepoError> {
        let data = self.data.read().await;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for comment in data.comments.values() {
            *counts.entry(comment.post_id).or_default() += 1;
        }

        let mut ranked: Vec<(&Post, u64)> = data
            .published(None)
            .into_iter()
            .map(|p| (p, counts.get(&p.id).copied().unwrap_or(0)))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(p, total_comments)| CommentedPost {
                post: data.hydrate(p),
                total_comments,
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.data.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut data = self.data.write().await;

        if !data.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "unknown post {}",
                comment.post_id
            )));
        }
        if data.comments.contains_key(&comment.id) {
            comment.updated_at = Utc::now();
        }

        data.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut data = self.data.write().await;
        data.comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let data = self.data.read().await;
        let mut comments: Vec<Comment> = data
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.data.read().await.tags.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut data = self.data.write().await;

        if data
            .tags
            .values()
            .any(|t| t.slug == tag.slug && t.id != tag.id)
        {
            return Err(RepoError::Constraint(format!(
                "tag slug '{}' already exists",
                tag.slug
            )));
        }

        data.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut data = self.data.write().await;
        if data.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post_id in data.tag_posts.remove(&id).unwrap_or_default() {
            if let Some(tags) = data.post_tags.get_mut(&post_id) {
                tags.remove(&id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let data = self.data.read().await;
        Ok(data.tags.values().find(|t| t.slug == slug).cloned())
    }
}
