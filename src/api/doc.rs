use utoipa::OpenApi;

pub const PRODUCT_TAG: &str = "Products";
pub const CATEGORY_TAG: &str = "Categories";
pub const USER_TAG: &str = "Users";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop",
        description = "Back-office API for products, categories and users",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = PRODUCT_TAG, description = "Product endpoints"),
        (name = CATEGORY_TAG, description = "Category endpoints"),
        (name = USER_TAG, description = "User endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
