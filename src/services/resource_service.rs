//! Generic list/get/create/update/delete orchestration.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::{Resource, Updated};
use crate::repositories::DynRepository;
use crate::utils::PageRequest;

/// Current UTC wall-clock time, the value stored in `created_at`/`updated_at`.
pub fn utc_now() -> jiff::civil::DateTime {
    jiff::Timestamp::now()
        .to_zoned(jiff::tz::TimeZone::UTC)
        .datetime()
}

pub struct ResourceService<R: Resource> {
    repo: DynRepository<R>,
    query_timeout: Duration,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            query_timeout: self.query_timeout,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(repo: DynRepository<R>, query_timeout: Duration) -> Self {
        Self {
            repo,
            query_timeout,
        }
    }

    /// Runs one store call, failing with a database error once
    /// `query_timeout` has passed.
    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(result) => result,
            Err(elapsed) => Err(AppError::Database {
                operation: format!("{} {}", operation, R::ENTITY),
                source: anyhow::Error::from(elapsed),
            }),
        }
    }

    pub async fn list(&self, page: PageRequest) -> AppResult<Vec<R::Listing>> {
        self.bounded("list", self.repo.list(page)).await
    }

    /// Gets one record, or `NotFound`.
    pub async fn get(&self, id: i32) -> AppResult<R::Record> {
        self.bounded("find", self.repo.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found_by_id(R::ENTITY, id))
    }

    /// Inserts and returns the row as the store now holds it.
    ///
    /// The row may exist even when this fails with `PostWriteVerification`.
    pub async fn create(&self, input: R::Input) -> AppResult<R::Record> {
        let id = self
            .bounded("insert", self.repo.insert(&input, utc_now()))
            .await?;

        let reread = self.bounded("re-read", self.repo.find_by_id(id)).await;
        match reread {
            Ok(Some(record)) => {
                tracing::debug!(entity = R::ENTITY, id, "Created");
                Ok(record)
            }
            Ok(None) => Err(AppError::PostWriteVerification {
                entity: R::ENTITY.to_string(),
                id,
                source: anyhow::anyhow!("row disappeared before it could be read back"),
            }),
            Err(error) => Err(AppError::PostWriteVerification {
                entity: R::ENTITY.to_string(),
                id,
                source: anyhow::Error::from(error),
            }),
        }
    }

    /// Overwrites an existing record and echoes the submitted fields.
    ///
    /// A missing id is reported before any write is attempted.
    pub async fn update(&self, id: i32, input: R::Input) -> AppResult<Updated<R::Input>> {
        self.get(id).await?;

        let affected = self
            .bounded("update", self.repo.overwrite(id, &input, utc_now()))
            .await?;
        if affected == 0 {
            // Deleted between the existence check and the write.
            return Err(AppError::not_found_by_id(R::ENTITY, id));
        }

        Ok(Updated { id, fields: input })
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let affected = self.bounded("delete", self.repo.delete(id)).await?;
        if affected == 0 {
            return Err(AppError::not_found_by_id(R::ENTITY, id));
        }
        Ok(())
    }
}
