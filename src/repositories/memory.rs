//! In-memory store used by service and router tests.
//!
//! One [`MemoryStore`] implements [`CrudRepository`] for all three resources
//! so the product listing can join against the categories it holds.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{CrudRepository, Repositories};
use crate::error::{AppError, AppResult};
use crate::models::{
    Category, CategoryInput, CategoryResource, Product, ProductInput, ProductResource,
    ProductWithCategory, User, UserInput, UserResource,
};
use crate::utils::PageRequest;

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    users: BTreeMap<i32, User>,
    products: BTreeMap<i32, Product>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
    pool_exhausted: AtomicBool,
    drop_inserted_rows: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            categories: self.clone(),
            users: self.clone(),
            products: self.clone(),
        }
    }

    /// Number of insert/overwrite/delete calls that changed something.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Every subsequent call fails like a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Every subsequent call fails to obtain a pooled connection.
    pub fn set_pool_exhausted(&self, exhausted: bool) {
        self.pool_exhausted.store(exhausted, Ordering::SeqCst);
    }

    /// Inserts report an id but the row is gone before it can be re-read.
    pub fn set_drop_inserted_rows(&self, drop: bool) {
        self.drop_inserted_rows.store(drop, Ordering::SeqCst);
    }

    /// Stores a product as-is, bypassing any reference checks.
    pub fn seed_product(&self, product: Product) {
        self.tables().products.insert(product.id, product);
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self, operation: &str) -> AppResult<()> {
        if self.pool_exhausted.load(Ordering::SeqCst) {
            return Err(AppError::ConnectionPool {
                source: anyhow::anyhow!("timed out waiting for a connection"),
            });
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("connection refused"),
            });
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn keep_inserted(&self) -> bool {
        !self.drop_inserted_rows.load(Ordering::SeqCst)
    }
}

impl Tables {
    /// Mirrors the `products_category_id_fkey` constraint.
    fn check_category_reference(&self, category_id: Option<i32>) -> AppResult<()> {
        match category_id.filter(|id| !self.categories.contains_key(id)) {
            Some(missing) => Err(AppError::Validation {
                field: "category_id".to_string(),
                reason: format!("Invalid reference with value '{}'", missing),
            }),
            None => Ok(()),
        }
    }
}

fn page_of<T: Clone>(rows: &BTreeMap<i32, T>, page: PageRequest) -> Vec<T> {
    rows.values()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[async_trait]
impl CrudRepository<CategoryResource> for MemoryStore {
    async fn list(&self, page: PageRequest) -> AppResult<Vec<Category>> {
        self.check_available("list categories")?;
        Ok(page_of(&self.tables().categories, page))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        self.check_available("find category")?;
        Ok(self.tables().categories.get(&id).cloned())
    }

    async fn insert(&self, input: &CategoryInput, now: jiff::civil::DateTime) -> AppResult<i32> {
        self.check_available("insert category")?;
        let mut tables = self.tables();
        let id = tables.next_id();
        if self.keep_inserted() {
            tables.categories.insert(
                id,
                Category {
                    id,
                    name: input.name.clone(),
                    description: input.description.clone(),
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        self.record_write();
        Ok(id)
    }

    async fn overwrite(
        &self,
        id: i32,
        input: &CategoryInput,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize> {
        self.check_available("update category")?;
        let mut tables = self.tables();
        let Some(row) = tables.categories.get_mut(&id) else {
            return Ok(0);
        };
        row.name = input.name.clone();
        row.description = input.description.clone();
        row.updated_at = now;
        self.record_write();
        Ok(1)
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        self.check_available("delete category")?;
        let mut tables = self.tables();
        if tables
            .products
            .values()
            .any(|product| product.category_id == Some(id))
        {
            return Err(AppError::Conflict {
                message: "categories row is still referenced by products".to_string(),
            });
        }
        let removed = tables.categories.remove(&id).map_or(0, |_| 1);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}

#[async_trait]
impl CrudRepository<UserResource> for MemoryStore {
    async fn list(&self, page: PageRequest) -> AppResult<Vec<User>> {
        self.check_available("list users")?;
        Ok(page_of(&self.tables().users, page))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        self.check_available("find user")?;
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn insert(&self, input: &UserInput, now: jiff::civil::DateTime) -> AppResult<i32> {
        self.check_available("insert user")?;
        let mut tables = self.tables();
        let id = tables.next_id();
        if self.keep_inserted() {
            tables.users.insert(
                id,
                User {
                    id,
                    first_name: input.first_name.clone(),
                    last_name: input.last_name.clone(),
                    email: input.email.clone(),
                    password: input.password.clone(),
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        self.record_write();
        Ok(id)
    }

    async fn overwrite(
        &self,
        id: i32,
        input: &UserInput,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize> {
        self.check_available("update user")?;
        let mut tables = self.tables();
        let Some(row) = tables.users.get_mut(&id) else {
            return Ok(0);
        };
        row.first_name = input.first_name.clone();
        row.last_name = input.last_name.clone();
        row.email = input.email.clone();
        row.password = input.password.clone();
        row.updated_at = now;
        self.record_write();
        Ok(1)
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        self.check_available("delete user")?;
        let removed = self.tables().users.remove(&id).map_or(0, |_| 1);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}

#[async_trait]
impl CrudRepository<ProductResource> for MemoryStore {
    async fn list(&self, page: PageRequest) -> AppResult<Vec<ProductWithCategory>> {
        self.check_available("list products")?;
        let tables = self.tables();
        Ok(page_of(&tables.products, page)
            .into_iter()
            .map(|product| {
                let category = product
                    .category_id
                    .and_then(|id| tables.categories.get(&id));
                ProductWithCategory {
                    product_id: product.id,
                    product_name: product.name,
                    product_description: product.description,
                    product_price: product.price,
                    product_stock_quantity: product.stock_quantity,
                    product_category_id: product.category_id,
                    category_id: category.map(|c| c.id),
                    category_name: category.map(|c| c.name.clone()),
                    category_description: category.map(|c| c.description.clone()),
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        self.check_available("find product")?;
        Ok(self.tables().products.get(&id).cloned())
    }

    async fn insert(&self, input: &ProductInput, now: jiff::civil::DateTime) -> AppResult<i32> {
        self.check_available("insert product")?;
        let mut tables = self.tables();
        tables.check_category_reference(input.category_id)?;
        let id = tables.next_id();
        if self.keep_inserted() {
            tables.products.insert(
                id,
                Product {
                    id,
                    name: input.name.clone(),
                    description: input.description.clone(),
                    price: input.price,
                    stock_quantity: input.stock_quantity,
                    category_id: input.category_id,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        self.record_write();
        Ok(id)
    }

    async fn overwrite(
        &self,
        id: i32,
        input: &ProductInput,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize> {
        self.check_available("update product")?;
        let mut tables = self.tables();
        if !tables.products.contains_key(&id) {
            return Ok(0);
        }
        tables.check_category_reference(input.category_id)?;
        let Some(row) = tables.products.get_mut(&id) else {
            return Ok(0);
        };
        row.name = input.name.clone();
        row.description = input.description.clone();
        row.price = input.price;
        row.stock_quantity = input.stock_quantity;
        row.category_id = input.category_id;
        row.updated_at = now;
        self.record_write();
        Ok(1)
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        self.check_available("delete product")?;
        let removed = self.tables().products.remove(&id).map_or(0, |_| 1);
        if removed > 0 {
            self.record_write();
        }
        Ok(removed)
    }
}
