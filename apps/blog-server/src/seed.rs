//! Demo content for a fresh instance.

use chrono::{Duration, Utc};
use uuid::Uuid;

use blog_core::services::NewPost;
use blog_core::{BlogService, DomainError};

struct DemoPost {
    title: &'static str,
    body: &'static str,
    tags: &'static [&'static str],
    days_ago: i64,
    published: bool,
}

const DEMO_POSTS: &[DemoPost] = &[
    DemoPost {
        title: "Getting started with Rust",
        body: "Ownership, borrowing and lifetimes are the three ideas everything else builds on.",
        tags: &["rust", "beginners"],
        days_ago: 6,
        published: true,
    },
    DemoPost {
        title: "Building a web service with actix-web",
        body: "Handlers, extractors and shared application state, wired together in a few lines.",
        tags: &["rust", "web"],
        days_ago: 4,
        published: true,
    },
    DemoPost {
        title: "Full-text search in PostgreSQL",
        body: "Weighted tsvector columns and ts_rank give relevance ordering without another service.",
        tags: &["postgres", "web"],
        days_ago: 2,
        published: true,
    },
    DemoPost {
        title: "Notes for a future post",
        body: "Unfinished thoughts on async traits.",
        tags: &["rust"],
        days_ago: 0,
        published: false,
    },
];

/// Create the demo posts. Posts whose slug is already taken on their date are
/// left alone, so seeding a persistent database twice is harmless.
pub async fn seed_demo_content(blog: &BlogService) -> Result<(), DomainError> {
    let author_id = Uuid::new_v4();
    let now = Utc::now();
    let mut created = 0;

    for demo in DEMO_POSTS {
        let draft = blog
            .create_draft(NewPost {
                author_id,
                title: demo.title.to_string(),
                body: demo.body.to_string(),
                tags: demo.tags.iter().map(|t| t.to_string()).collect(),
                publish: Some(now - Duration::days(demo.days_ago)),
            })
            .await;

        let post = match draft {
            Ok(post) => post,
            Err(DomainError::Duplicate(reason)) => {
                tracing::debug!(%reason, "Demo post already present");
                continue;
            }
            Err(e) => return Err(e),
        };

        if demo.published {
            blog.publish(post.id).await?;
        }
        created += 1;
    }

    tracing::info!(created, "Demo content seeded");
    Ok(())
}
