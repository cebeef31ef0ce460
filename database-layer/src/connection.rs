// Database connection management
use crate::error::{StoreError, StoreResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: Arc<PgPool>,
}

impl DatabasePool {
    /// Create a new database pool from a connection string
    pub async fn new(connection_string: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("Database connection pool created");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Wrap an existing pool (used by tests)
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a scoped transaction.
    ///
    /// The returned handle rolls back when dropped; call `commit` to make
    /// the enclosed writes visible.
    pub async fn begin(&self) -> StoreResult<Transaction<'static, Postgres>> {
        let tx = self.pool.begin().await?;
        Ok(tx)
    }

    /// Run the embedded schema migrations
    pub async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::Unavailable(format!("migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Check if the pool is healthy
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        }
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
