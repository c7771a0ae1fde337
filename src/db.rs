use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Lazily-initialized, process-wide database handle.
///
/// The first caller of [`Db::ensure_connected`] establishes the pool;
/// callers arriving while that attempt is in flight await the same
/// initialization instead of opening duplicate pools. A failed attempt
/// caches nothing, so a later request starts a fresh one. There is no
/// automatic retry or reconnect.
#[derive(Clone)]
pub struct Db {
    url: String,
    pool: Arc<OnceCell<PgPool>>,
}

impl Db {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: Arc::new(OnceCell::new()),
        }
    }

    pub async fn ensure_connected(&self) -> sqlx::Result<&PgPool> {
        self.pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .acquire_timeout(CONNECT_TIMEOUT)
                    .connect(&self.url)
                    .await?;
                info!("database connected");
                // Run migrations if present
                if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
                    warn!(error = %e, "migration failed; continuing");
                }
                Ok(pool)
            })
            .await
    }
}
