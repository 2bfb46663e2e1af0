//! Service layer.
//!
//! All three resources share one generic implementation,
//! [`ResourceService`]; `Services` just instantiates it per resource.

mod resource_service;

pub use resource_service::{ResourceService, utc_now};

use std::time::Duration;

use crate::models::{CategoryResource, ProductResource, UserResource};
use crate::repositories::Repositories;

pub type CategoryService = ResourceService<CategoryResource>;
pub type UserService = ResourceService<UserResource>;
pub type ProductService = ResourceService<ProductResource>;

/// Aggregates all services for convenient access.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
    pub users: UserService,
    pub products: ProductService,
}

impl Services {
    /// Creates the services, bounding every store call by `query_timeout`.
    pub fn new(repos: Repositories, query_timeout: Duration) -> Self {
        Self {
            categories: ResourceService::new(repos.categories, query_timeout),
            users: ResourceService::new(repos.users, query_timeout),
            products: ResourceService::new(repos.products, query_timeout),
        }
    }
}
