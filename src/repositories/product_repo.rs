//! Product repository for async database operations.
//!
//! The list query left-joins `categories` so products without a resolvable
//! category are still returned, with the category columns set to `NULL`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;

use super::CrudRepository;
use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{
    NewProduct, Product, ProductInput, ProductResource, ProductRow, ProductWithCategory,
};
use crate::schema::{categories, products};
use crate::utils::PageRequest;

#[derive(Clone)]
pub struct ProductRepository {
    pool: AsyncDbPool,
}

impl ProductRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn new_product(input: &ProductInput, now: jiff::civil::DateTime) -> NewProduct<'_> {
    NewProduct {
        name: &input.name,
        description: &input.description,
        price: input.price,
        stock_quantity: input.stock_quantity,
        category_id: input.category_id,
        created_at: now.to_diesel(),
        updated_at: now.to_diesel(),
    }
}

#[async_trait]
impl CrudRepository<ProductResource> for ProductRepository {
    async fn list(&self, page: PageRequest) -> AppResult<Vec<ProductWithCategory>> {
        let mut conn = self.pool.get().await?;

        products::table
            .left_join(categories::table)
            .select((
                products::id,
                products::name,
                products::description,
                products::price,
                products::stock_quantity,
                products::category_id,
                categories::id.nullable(),
                categories::name.nullable(),
                categories::description.nullable(),
            ))
            .order(products::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<ProductWithCategory>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list products"))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let mut conn = self.pool.get().await?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find product"))?;

        Ok(row.map(Product::from))
    }

    async fn insert(&self, input: &ProductInput, now: jiff::civil::DateTime) -> AppResult<i32> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(products::table)
            .values(&new_product(input, now))
            .returning(products::id)
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert product"))
    }

    async fn overwrite(
        &self,
        id: i32,
        input: &ProductInput,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::update(products::table.filter(products::id.eq(id)))
            .set(&new_product(input, now))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update product"))
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(products::table.filter(products::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete product"))
    }
}
