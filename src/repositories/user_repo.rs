//! User repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;

use super::CrudRepository;
use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, User, UserInput, UserResource, UserRow};
use crate::schema::users;
use crate::utils::PageRequest;

#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn new_user(input: &UserInput, now: jiff::civil::DateTime) -> NewUser<'_> {
    NewUser {
        first_name: &input.first_name,
        last_name: &input.last_name,
        email: &input.email,
        password: &input.password,
        created_at: now.to_diesel(),
        updated_at: now.to_diesel(),
    }
}

#[async_trait]
impl CrudRepository<UserResource> for UserRepository {
    async fn list(&self, page: PageRequest) -> AppResult<Vec<User>> {
        let mut conn = self.pool.get().await?;

        let rows = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list users"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        let row = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find user"))?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, input: &UserInput, now: jiff::civil::DateTime) -> AppResult<i32> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(&new_user(input, now))
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert user"))
    }

    async fn overwrite(
        &self,
        id: i32,
        input: &UserInput,
        now: jiff::civil::DateTime,
    ) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set(&new_user(input, now))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(users::table.filter(users::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete user"))
    }
}
