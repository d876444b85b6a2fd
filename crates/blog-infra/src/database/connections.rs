#[cfg(feature = "postgres")]
use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

use blog_core::RepoError;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Which store a database URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// `memory://` - process-local store, lost on shutdown.
    Memory,
    /// `postgres://` or `postgresql://`.
    Postgres,
}

impl StoreKind {
    pub fn from_url(url: &str) -> Result<Self, RepoError> {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| RepoError::Connection(format!("Malformed database URL: {url}")))?;

        match scheme.as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(RepoError::Connection(format!(
                "Unsupported database scheme: {other}"
            ))),
        }
    }
}

/// Configuration for the post database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
        }
    }

    pub fn kind(&self) -> Result<StoreKind, RepoError> {
        StoreKind::from_url(&self.url)
    }
}

/// Connection pool for the post database.
///
/// `main` is shared with the repositories built on top of it.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connections...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self {
            main: Arc::new(main),
        })
    }

    /// Close the pool once every repository sharing `main` has been dropped.
    ///
    /// If a handle is still alive the pool is left to close when that last
    /// handle drops.
    pub async fn close(self) -> Result<(), DbErr> {
        match Arc::try_unwrap(self.main) {
            Ok(main) => {
                main.close().await?;
                tracing::info!("Database connections closed");
            }
            Err(shared) => tracing::warn!(
                handles = Arc::strong_count(&shared),
                "Database connection still shared, deferring close to last handle"
            ),
        }
        Ok(())
    }
}
