use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Resource;

/// Product row as stored.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub category_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Product as served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub name: String,
    pub description: String,
    #[schema(example = 9.99)]
    pub price: f64,
    #[serde(rename = "stockQuantity")]
    #[schema(example = 5)]
    pub stock_quantity: i32,
    #[serde(rename = "categoryID")]
    #[schema(example = 1)]
    pub category_id: Option<i32>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::civil::DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::civil::DateTime,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity,
            category_id: row.category_id,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// Request body for creating or overwriting a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct ProductInput {
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = "d")]
    pub description: String,
    #[schema(example = 9.99)]
    pub price: f64,
    #[serde(rename = "stockQuantity")]
    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    #[schema(minimum = 0, example = 5)]
    pub stock_quantity: i32,
    #[serde(rename = "categoryID", default)]
    #[schema(example = 1)]
    pub category_id: Option<i32>,
}

/// Insert/overwrite payload. A `None` category clears the reference.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub stock_quantity: i32,
    pub category_id: Option<i32>,
    #[diesel(skip_update)]
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// One row of the product listing: a product left-joined with its category.
///
/// The category columns are `null` when the product has no category or the
/// reference does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, ToSchema)]
pub struct ProductWithCategory {
    pub product_id: i32,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    #[serde(rename = "product_stockQuantity")]
    pub product_stock_quantity: i32,
    pub product_category_id: Option<i32>,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub category_description: Option<String>,
}

pub struct ProductResource;

impl Resource for ProductResource {
    const ENTITY: &'static str = "product";
    type Record = Product;
    type Listing = ProductWithCategory;
    type Input = ProductInput;
}
