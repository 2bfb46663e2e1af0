use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Resource;

/// Category row as stored.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Category as served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Tools")]
    pub name: String,
    pub description: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::civil::DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::civil::DateTime,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// Request body for creating or overwriting a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct CategoryInput {
    #[schema(example = "Tools")]
    pub name: String,
    #[schema(example = "Hand and power tools")]
    pub description: String,
}

/// Insert/overwrite payload. `updated_at` always moves, `created_at` only on insert.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[diesel(skip_update)]
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

pub struct CategoryResource;

impl Resource for CategoryResource {
    const ENTITY: &'static str = "category";
    type Record = Category;
    type Listing = Category;
    type Input = CategoryInput;
}
