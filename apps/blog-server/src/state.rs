//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::BlogService;
use blog_core::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use blog_infra::{ConsoleMailer, InMemoryBlogStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    /// Which storage backend is serving requests, reported by the health check.
    pub storage: &'static str,
}

/// The three repositories the blog service runs on, from one backend.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    storage: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        Self {
            posts: store.clone(),
            comments: store.clone(),
            tags: store,
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &blog_infra::DatabaseConfig) -> Option<Self> {
        use blog_infra::database::{connect, ensure_schema};
        use blog_infra::{PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository};

        let db = match connect(config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        if let Err(e) = ensure_schema(&db).await {
            tracing::error!(
                "Failed to prepare database schema: {}. Using in-memory fallback.",
                e
            );
            return None;
        }

        Some(Self {
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            tags: Arc::new(PostgresTagRepository::new(db)),
            storage: "postgres",
        })
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db_config) => match Repositories::postgres(db_config).await {
                Some(repos) => repos,
                None => Repositories::in_memory(),
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repository");
            Repositories::in_memory()
        };

        let state = Self::assemble(repos, Arc::new(ConsoleMailer), &config.mail_from);
        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    /// In-memory state with the given mail transport.
    pub fn in_memory(mailer: Arc<dyn Mailer>, mail_from: &str) -> Self {
        Self::assemble(Repositories::in_memory(), mailer, mail_from)
    }

    fn assemble(repos: Repositories, mailer: Arc<dyn Mailer>, mail_from: &str) -> Self {
        let blog = BlogService::new(repos.posts, repos.comments, repos.tags, mailer)
            .with_mail_from(mail_from);

        Self {
            blog: Arc::new(blog),
            storage: repos.storage,
        }
    }
}
