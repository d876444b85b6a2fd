//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::error::RepoError;
use blog_core::ports::PostRepository;
use blog_infra::database::{DatabaseConfig, InMemoryPostRepository, StoreKind};

#[cfg(feature = "postgres")]
use blog_infra::database::{DatabaseConnections, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    #[cfg(feature = "postgres")]
    db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// State over an arbitrary post store.
    pub fn with_repository(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryPostRepository::new()))
    }

    /// Open the post store selected by the database URL.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        match config.kind()? {
            StoreKind::Memory => {
                tracing::info!("Using in-memory post store");
                Ok(Self::in_memory())
            }
            #[cfg(feature = "postgres")]
            StoreKind::Postgres => {
                let connections = DatabaseConnections::init(config)
                    .await
                    .map_err(|e| RepoError::Connection(e.to_string()))?;
                let repo = PostgresPostRepository::new(connections.main.clone());
                repo.ensure_schema().await?;

                tracing::info!("Using PostgreSQL post store");
                Ok(Self {
                    posts: Arc::new(repo),
                    db: Some(Arc::new(connections)),
                })
            }
            #[cfg(not(feature = "postgres"))]
            StoreKind::Postgres => Err(RepoError::Connection(
                "PostgreSQL support is not compiled in (enable the `postgres` feature)"
                    .to_string(),
            )),
        }
    }

    /// Release the database connection, if there is one.
    ///
    /// The pool closes here when this is the last clone of the state;
    /// otherwise it closes once the remaining clones drop.
    pub async fn close(self) -> Result<(), RepoError> {
        #[cfg(feature = "postgres")]
        {
            let Self { posts, db } = self;
            drop(posts);
            if let Some(db) = db {
                match Arc::try_unwrap(db) {
                    Ok(connections) => connections
                        .close()
                        .await
                        .map_err(|e| RepoError::Connection(e.to_string()))?,
                    Err(_) => tracing::warn!(
                        "Post store still in use, connection pool closes on last drop"
                    ),
                }
            }
        }

        #[cfg(not(feature = "postgres"))]
        drop(self);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::ports::BaseRepository;

    #[tokio::test]
    async fn test_connect_memory_store() {
        let state = AppState::connect(&DatabaseConfig::new("memory://test"))
            .await
            .unwrap();

        assert_eq!(state.posts.count().await.unwrap(), 0);
        assert!(state.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_scheme() {
        let result = AppState::connect(&DatabaseConfig::new("mongodb://localhost/blog")).await;
        assert!(matches!(result, Err(RepoError::Connection(_))));
    }
}
