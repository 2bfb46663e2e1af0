//! Category repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;

use super::CrudRepository;
use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{Category, CategoryInput, CategoryResource, CategoryRow, NewCategory};
use crate::schema::categories;
use crate::utils::PageRequest;

/// Category repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: AsyncDbPool,
}

impl CategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn new_category(input: &CategoryInput, now: jiff::civil::DateTime) -> NewCategory<'_> {
    NewCategory {
        name: &input.name,
        description: &input.description,
        created_at: now.to_diesel(),
        updated_at: now.to_diesel(),
    }
}

#[async_trait]
impl CrudRepository<CategoryResource> for CategoryRepository {
    async fn list(&self, page: PageRequest) -> AppResult<Vec<Category>> {
        let mut conn = self.pool.get().await?;

        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list categories"))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        let mut conn = self.pool.get().await?;

        let row = categories::table
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find category"))?;

        Ok(row.map(Category::from))
    }

    async fn insert(&self, input: &CategoryInput, now: jiff::civil::DateTime) -> AppResult<i32> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(categories::table)
            .values(&new_category(input, now))
            .returning(categories::id)
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert category"))
    }

    async fn overwrite(
        &self,
        id: i32,
        input: &CategoryInput,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::update(categories::table.filter(categories::id.eq(id)))
            .set(&new_category(input, now))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update category"))
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(categories::table.filter(categories::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete category"))
    }
}
