#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use blog_core::domain::{Comment, PostStatus, Tag};
    use blog_core::ports::{BaseRepository, PostRepository, TagRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use uuid::Uuid;

    use crate::database::entity::{comment, post, post_tag, tag};
    use crate::database::postgres_repo::{
        PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    };

    fn post_model(id: Uuid, status: PostStatus) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id: Uuid::new_v4(),
            title: "Test Post".to_owned(),
            slug: "test-post".to_owned(),
            body: "Content".to_owned(),
            publish: now.into(),
            created_at: now.into(),
            updated_at: now.into(),
            status: status.as_code().to_owned(),
        }
    }

    #[tokio::test]
    async fn test_find_comment_by_id() {
        let comment_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![comment::Model {
                id: comment_id,
                post_id,
                name: "Ann".to_owned(),
                email: "ann@example.com".to_owned(),
                body: "Great read".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
                active: true,
            }]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let result: Option<Comment> = repo.find_by_id(comment_id).await.unwrap();

        let comment = result.unwrap();
        assert_eq!(comment.id, comment_id);
        assert_eq!(comment.post_id, post_id);
        assert!(comment.active);
    }

    #[tokio::test]
    async fn test_find_tag_by_slug() {
        let tag_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![tag::Model {
                id: tag_id,
                name: "Web Dev".to_owned(),
                slug: "web-dev".to_owned(),
            }]])
            .into_connection();

        let repo = PostgresTagRepository::new(db);

        let tag: Tag = repo.find_by_slug("web-dev").await.unwrap().unwrap();
        assert_eq!(tag.id, tag_id);
        assert_eq!(tag.name, "Web Dev");
    }

    #[tokio::test]
    async fn test_find_published_post_without_tags() {
        let post_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, PostStatus::Published)]])
            .append_query_results(vec![Vec::<post_tag::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let post = repo.find_published_by_id(post_id).await.unwrap().unwrap();
        assert_eq!(post.id, post_id);
        assert!(post.is_published());
        assert!(post.tags.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_code_is_a_query_error() {
        let post_id = Uuid::new_v4();
        let mut model = post_model(post_id, PostStatus::Draft);
        model.status = "ZZ".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .append_query_results(vec![Vec::<post_tag::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let err = repo.find_by_id(post_id).await.unwrap_err();
        assert!(matches!(err, blog_core::RepoError::Query(_)));
    }

    #[tokio::test]
    async fn test_most_commented_reads_comment_totals() {
        let post_id = Uuid::new_v4();
        let model = post_model(post_id, PostStatus::Published);

        let row = BTreeMap::from([
            ("id", Value::from(model.id)),
            ("author_id", Value::from(model.author_id)),
            ("title", Value::from(model.title.clone())),
            ("slug", Value::from(model.slug.clone())),
            ("body", Value::from(model.body.clone())),
            ("publish", Value::from(model.publish)),
            ("created_at", Value::from(model.created_at)),
            ("updated_at", Value::from(model.updated_at)),
            ("status", Value::from(model.status.clone())),
            ("score", Value::from(3i64)),
        ]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .append_query_results(vec![Vec::<post_tag::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let ranked = repo.most_commented(5).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].post.id, post_id);
        assert_eq!(ranked[0].total_comments, 3);
    }
}
