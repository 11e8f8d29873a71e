//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use sea_orm::{
    ColumnTrait, DbBackend, DbConn, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QueryResult, QuerySelect, Select, Set, Statement, TransactionTrait,
    TryGetable,
};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostStatus, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentRepository, CommentedPost, PostRepository, TagRepository,
};
use blog_core::search::{SearchHit, SearchQuery};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, upsert, write_error};

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

const SIMILAR_SQL: &str = r#"
SELECT p.*
FROM posts p
JOIN post_tags pt ON pt.post_id = p.id
WHERE pt.tag_id IN (SELECT tag_id FROM post_tags WHERE post_id = $1)
  AND p.id <> $1
  AND p.status = $2
GROUP BY p.id
ORDER BY COUNT(pt.tag_id) DESC, p.publish DESC
LIMIT $3
"#;

const SEARCH_SQL: &str = r#"
SELECT p.*,
       ts_rank(
           setweight(to_tsvector('english', p.title), 'A')
               || setweight(to_tsvector('english', p.body), 'B'),
           plainto_tsquery('english', $1)
       ) AS score
FROM posts p
WHERE p.status = $2
  AND (setweight(to_tsvector('english', p.title), 'A')
          || setweight(to_tsvector('english', p.body), 'B'))
      @@ plainto_tsquery('english', $1)
ORDER BY score DESC, p.publish DESC
"#;

const MOST_COMMENTED_SQL: &str = r#"
SELECT p.*, COUNT(c.id) AS score
FROM posts p
LEFT JOIN comments c ON c.post_id = p.id
WHERE p.status = $1
GROUP BY p.id
ORDER BY score DESC, p.publish DESC
LIMIT $2
"#;

/// A post row with one extra computed column named `score`.
struct Scored<S> {
    model: post::Model,
    score: S,
}

impl<S: TryGetable> FromQueryResult for Scored<S> {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            model: post::Model::from_query_result(res, pre)?,
            score: res.try_get(pre, "score")?,
        })
    }
}

/// PostgreSQL post repository. Posts carry their tags, so unlike comments
/// and tags this does not go through the generic base repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// The published-only view over posts.
    fn published() -> Select<PostEntity> {
        PostEntity::find().filter(post::Column::Status.eq(PostStatus::Published.as_code()))
    }

    fn tagged(select: Select<PostEntity>, tag_id: Option<Uuid>) -> Select<PostEntity> {
        match tag_id {
            Some(tag_id) => select
                .inner_join(PostTagEntity)
                .filter(post_tag::Column::TagId.eq(tag_id)),
            None => select,
        }
    }

    /// Load the tags of every post in one query and convert to domain posts.
    async fn attach_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(ids))
            .find_also_related(TagEntity)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for (link, tag) in links {
            if let Some(tag) = tag {
                tags_by_post.entry(link.post_id).or_default().push(tag.into());
            }
        }

        models
            .into_iter()
            .map(|model| {
                let mut tags = tags_by_post.remove(&model.id).unwrap_or_default();
                tags.sort_by(|a, b| a.name.cmp(&b.name));
                model.into_domain(tags)
            })
            .collect()
    }

    async fn attach_tags_one(
        &self,
        model: Option<post::Model>,
    ) -> Result<Option<Post>, RepoError> {
        match model {
            Some(model) => Ok(self.attach_tags(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// `[start, end)` of a UTC calendar day.
fn day_bounds(date: NaiveDate) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let start = date.and_time(NaiveTime::default()).and_utc();
    let end = start + chrono::Duration::days(1);
    (start.into(), end.into())
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;
        self.attach_tags_one(model).await
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = upsert(post::ActiveModel::from(&post), &txn).await?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post.id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        if !post.tags.is_empty() {
            let links = post.tags.iter().map(|tag| post_tag::ActiveModel {
                post_id: Set(post.id),
                tag_id: Set(tag.id),
            });
            PostTagEntity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(write_error)?;
        }

        txn.commit().await.map_err(query_error)?;
        tracing::debug!(post_id = %post.id, tags = post.tags.len(), "Post saved");

        model.into_domain(post.tags)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = Self::published()
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(query_error)?;
        self.attach_tags_one(model).await
    }

    async fn find_published_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        tracing::debug!(%date, slug, "Finding published post by date and slug");

        let (start, end) = day_bounds(date);
        let model = Self::published()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .one(&self.db)
            .await
            .map_err(query_error)?;
        self.attach_tags_one(model).await
    }

    async fn slug_taken(
        &self,
        slug: &str,
        date: NaiveDate,
        except: Uuid,
    ) -> Result<bool, RepoError> {
        let (start, end) = day_bounds(date);
        let count = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .filter(post::Column::Id.ne(except))
            .count(&self.db)
            .await
            .map_err(query_error)?;
        Ok(count > 0)
    }

    async fn count_published(&self, tag_id: Option<Uuid>) -> Result<u64, RepoError> {
        Self::tagged(Self::published(), tag_id)
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn list_published(
        &self,
        tag_id: Option<Uuid>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let models = Self::tagged(Self::published(), tag_id)
            .order_by_desc(post::Column::Publish)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;
        self.attach_tags(models).await
    }

    async fn similar_published(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            SIMILAR_SQL,
            [
                post.id.into(),
                PostStatus::Published.as_code().into(),
                (limit as i64).into(),
            ],
        );
        let models = PostEntity::find()
            .from_raw_sql(stmt)
            .all(&self.db)
            .await
            .map_err(query_error)?;
        self.attach_tags(models).await
    }

    async fn search_published(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SearchHit<Post>>, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            SEARCH_SQL,
            [
                query.as_str().into(),
                PostStatus::Published.as_code().into(),
            ],
        );
        let rows = Scored::<f32>::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let ranks: Vec<f32> = rows.iter().map(|r| r.score).collect();
        let posts = self
            .attach_tags(rows.into_iter().map(|r| r.model).collect())
            .await?;

        Ok(posts
            .into_iter()
            .zip(ranks)
            .map(|(post, rank)| SearchHit { post, rank })
            .collect())
    }

    async fn most_commented(&self, limit: u64) -> Result<Vec<CommentedPost>, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            MOST_COMMENTED_SQL,
            [PostStatus::Published.as_code().into(), (limit as i64).into()],
        );
        let rows = Scored::<i64>::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let counts: Vec<i64> = rows.iter().map(|r| r.score).collect();
        let posts = self
            .attach_tags(rows.into_iter().map(|r| r.model).collect())
            .await?;

        Ok(posts
            .into_iter()
            .zip(counts)
            .map(|(post, total)| CommentedPost {
                post,
                total_comments: total.max(0) as u64,
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        tracing::debug!(slug, "Finding tag by slug");

        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}
