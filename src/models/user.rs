use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Resource;

/// User row as stored. The password is kept verbatim.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// User as served over HTTP. The password never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[schema(format = "email")]
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::civil::DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::civil::DateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password: row.password,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// Request body for creating or overwriting a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserInput {
    #[serde(rename = "firstName", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "lastName", alias = "last_name")]
    pub last_name: String,
    #[schema(format = "email")]
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(format = "password", write_only)]
    pub password: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[diesel(skip_update)]
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

pub struct UserResource;

impl Resource for UserResource {
    const ENTITY: &'static str = "user";
    type Record = User;
    type Listing = User;
    type Input = UserInput;
}
