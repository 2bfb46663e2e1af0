//! Store-facing records, one file per resource.
//!
//! Every resource is described by a [`Resource`] marker so the repository
//! and service layers can be written once and instantiated three times.

mod category;
mod product;
mod user;

pub use category::{Category, CategoryInput, CategoryResource, CategoryRow, NewCategory};
pub use product::{
    NewProduct, Product, ProductInput, ProductResource, ProductRow, ProductWithCategory,
};
pub use user::{NewUser, User, UserInput, UserResource, UserRow};

use serde::{Serialize, de::DeserializeOwned};

/// Type-level description of one resource.
pub trait Resource: Send + Sync + 'static {
    /// Entity label used in errors and logs.
    const ENTITY: &'static str;

    /// A full stored row.
    type Record: Serialize + Clone + Send + Sync + 'static;

    /// What the list operation yields.
    type Listing: Serialize + Clone + Send + Sync + 'static;

    /// Caller-supplied fields for create and update.
    type Input: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;
}

/// Response of an update: the submitted fields plus the path id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Updated<T> {
    pub id: i32,
    #[serde(flatten)]
    pub fields: T,
}
