/// SQLite connection management
///
/// Opens the pool, enables foreign keys (cascade deletes depend on them) and
/// applies the versioned migrations before anything else touches the tables.

use anyhow::Result;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use std::{str::FromStr, time::Duration};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Handle to the projects/tasks database
#[derive(Debug, Clone)]
pub struct Database {
    /// Shared connection pool; connections are acquired per query or transaction
    pool: SqlitePool,
}

impl Database {
    /// Open (and create if missing) the database at `url`, then migrate it.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| anyhow::anyhow!("Invalid database url '{}': {}", url, e))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tracing::info!("📁 Ensuring database directory exists: {}", parent.display());
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow::anyhow!("Failed to create database directory '{}': {}", parent.display(), e)
                })?;
            }
        }

        tracing::info!("🗄️ Opening database: {}", url);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    /// Private in-memory database, used by tests and throwaway instances.
    ///
    /// Pinned to a single connection that is never recycled: every SQLite
    /// `:memory:` connection is its own database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to apply migrations: {}", e))?;
        tracing::info!("✅ Database migrations applied");

        Ok(Self { pool })
    }

    /// Borrow the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Row counts for (projects, tasks)
    pub async fn row_counts(&self) -> Result<(i64, i64)> {
        let projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        let tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok((projects, tasks))
    }
}
