//! Repository layer for data access operations.
//!
//! Each resource gets one diesel-backed implementation of
//! [`CrudRepository`]. The service layer only sees the trait object, so tests
//! can swap in the in-memory store from [`memory`].

mod category_repo;
#[cfg(test)]
pub mod memory;
mod product_repo;
mod user_repo;

pub use category_repo::CategoryRepository;
pub use product_repo::ProductRepository;
pub use user_repo::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{CategoryResource, ProductResource, Resource, UserResource};
use crate::utils::PageRequest;

/// Store operations for one resource.
///
/// `now` is passed in by the caller so timestamps are decided in one place.
#[async_trait]
pub trait CrudRepository<R: Resource>: Send + Sync {
    /// Rows of the requested page in ascending id order.
    async fn list(&self, page: PageRequest) -> AppResult<Vec<R::Listing>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<R::Record>>;

    /// Inserts a row and returns the id the store assigned.
    async fn insert(&self, input: &R::Input, now: jiff::civil::DateTime) -> AppResult<i32>;

    /// Overwrites every mutable column of row `id`. Returns affected rows.
    async fn overwrite(
        &self,
        id: i32,
        input: &R::Input,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize>;

    /// Removes row `id`. Returns affected rows.
    async fn delete(&self, id: i32) -> AppResult<usize>;
}

pub type DynRepository<R> = Arc<dyn CrudRepository<R>>;

/// Aggregates all repositories for convenient access.
#[derive(Clone)]
pub struct Repositories {
    pub categories: DynRepository<CategoryResource>,
    pub users: DynRepository<UserResource>,
    pub products: DynRepository<ProductResource>,
}

impl Repositories {
    /// Creates the diesel-backed repositories, all sharing `pool`.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            categories: Arc::new(CategoryRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            products: Arc::new(ProductRepository::new(pool)),
        }
    }
}
