//! Idempotent schema bootstrap derived from the SeaORM entities.

use sea_orm::{ConnectionTrait, DbConn, DbErr, Schema};

use super::entity::{comment, post, post_tag, tag};

/// Secondary indexes the entities cannot express.
const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS posts_publish_idx ON posts (publish DESC)",
    "CREATE INDEX IF NOT EXISTS post_tags_tag_idx ON post_tags (tag_id)",
    "CREATE INDEX IF NOT EXISTS comments_post_created_idx ON comments (post_id, created_at)",
    "CREATE INDEX IF NOT EXISTS posts_search_idx ON posts USING GIN (
        (setweight(to_tsvector('english', title), 'A')
            || setweight(to_tsvector('english', body), 'B'))
    )",
];

/// Create any missing tables and indexes. Parents are created before the
/// tables that reference them.
pub async fn ensure_schema(db: &DbConn) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut tables = vec![
        schema.create_table_from_entity(post::Entity),
        schema.create_table_from_entity(tag::Entity),
        schema.create_table_from_entity(post_tag::Entity),
        schema.create_table_from_entity(comment::Entity),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(backend.build(&*table)).await?;
    }

    for index in INDEXES {
        db.execute_unprepared(index).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}
