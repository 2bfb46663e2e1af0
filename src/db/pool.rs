//! Async database connection pool implementation.

use std::time::Duration;

use async_trait::async_trait;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap. The pool is built once
/// at startup and handed to each repository.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Creates an async database connection pool from configuration.
///
/// # Errors
///
/// - `AppError::Configuration` if no database URL is configured
/// - `AppError::ConnectionPool` if the initial connections cannot be opened
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    if config.url.trim().is_empty() {
        return Err(AppError::Configuration {
            key: "database.url".to_string(),
            source: anyhow::anyhow!("database URL is empty"),
        });
    }

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::from(e),
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool established"
    );

    Ok(pool)
}

/// Cheap connectivity check used by the health endpoint.
#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl StoreProbe for AsyncDbPool {
    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.get().await?;
        conn.batch_execute("SELECT 1")
            .await
            .map_err(|e| AppError::Database {
                operation: "ping".to_string(),
                source: anyhow::Error::from(e),
            })
    }
}
