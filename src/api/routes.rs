//! Router configuration for the API.

use axum::{Router, middleware};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Routes
/// - `/products`, `/users`, `/cat` - resource CRUD
/// - `/health`, `/health/live` - health probes
/// - `/swagger-ui` and `/api-docs/openapi.json` - API documentation
///
/// Middleware added last runs first, so the request id is assigned before
/// the logging middleware reads it.
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/products", handlers::products::product_routes())
        .nest("/users", handlers::users::user_routes())
        .nest("/cat", handlers::categories::category_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::db::StoreProbe;
    use crate::error::{AppError, AppResult};
    use crate::repositories::memory::MemoryStore;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    enum Probe {
        Up,
        Down,
        /// Never answers.
        Stalled,
    }

    #[async_trait]
    impl StoreProbe for Probe {
        async fn ping(&self) -> AppResult<()> {
            match self {
                Probe::Up => Ok(()),
                Probe::Down => Err(AppError::ConnectionPool {
                    source: anyhow::anyhow!("no connections"),
                }),
                Probe::Stalled => std::future::pending().await,
            }
        }
    }

    fn app_with(store: &Arc<MemoryStore>, probe: Probe) -> Router {
        let state = AppState::from_parts(
            store.repositories(),
            Arc::new(probe),
            Duration::from_secs(5),
        );
        create_router(state)
    }

    fn app(store: &Arc<MemoryStore>) -> Router {
        app_with(store, Probe::Up)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn create_category(app: &Router) -> i64 {
        let response = send(
            app,
            Method::POST,
            "/cat",
            Some(json!({"name": "Tools", "description": "Hand tools"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_product_returns_created_record() {
        let store = MemoryStore::new();
        let app = app(&store);
        let category_id = create_category(&app).await;

        let before = crate::services::utc_now();
        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 9.99,
                "stockQuantity": 5,
                "categoryID": category_id
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["name"], "Widget");
        assert_eq!(body["stockQuantity"], 5);
        assert_eq!(body["categoryID"], category_id);

        let created_at: jiff::civil::DateTime =
            body["created_at"].as_str().unwrap().parse().unwrap();
        let updated_at: jiff::civil::DateTime =
            body["updated_at"].as_str().unwrap().parse().unwrap();
        assert!(created_at >= before);
        assert!(created_at <= crate::services::utc_now());
        assert_eq!(created_at, updated_at);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_404_with_empty_body() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(&app, Method::GET, "/users/999", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_put_missing_category_is_404_and_writes_nothing() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(
            &app,
            Method::PUT,
            "/cat/5",
            Some(json!({"name": "Garden", "description": "Outdoor"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.writes(), 0);

        let response = send(&app, Method::GET, "/cat/5", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_product_then_get_is_404() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 9.99,
                "stockQuantity": 5
            })),
        )
        .await;
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = send(&app, Method::DELETE, &format!("/products/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(response).await.is_empty());

        let response = send(&app, Method::GET, &format!("/products/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, &format!("/products/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_listing_wire_format() {
        let store = MemoryStore::new();
        let app = app(&store);
        let category_id = create_category(&app).await;

        for (name, category) in [("Hammer", Some(category_id)), ("Loose", None)] {
            let response = send(
                &app,
                Method::POST,
                "/products",
                Some(json!({
                    "name": name,
                    "description": "x",
                    "price": 1.5,
                    "stockQuantity": 1,
                    "categoryID": category
                })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&app, Method::GET, "/products?page=1&limit=10", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let rows = body_json(response).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0]["product_name"], "Hammer");
        assert_eq!(rows[0]["product_stockQuantity"], 1);
        assert_eq!(rows[0]["category_id"], category_id);
        assert_eq!(rows[0]["category_name"], "Tools");

        assert_eq!(rows[1]["product_name"], "Loose");
        assert_eq!(rows[1]["category_id"], Value::Null);
        assert_eq!(rows[1]["category_name"], Value::Null);
        assert_eq!(rows[1]["category_description"], Value::Null);
    }

    #[tokio::test]
    async fn test_list_with_garbage_pagination_uses_defaults() {
        let store = MemoryStore::new();
        let app = app(&store);
        for n in 0..12 {
            let response = send(
                &app,
                Method::POST,
                "/cat",
                Some(json!({"name": format!("c{}", n), "description": ""})),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&app, Method::GET, "/cat?page=abc&limit=-3", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 10);

        let response = send(&app, Method::GET, "/cat?page=2&limit=10", None).await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_user_password_is_never_returned() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@example.com",
                "password": "cobol"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["firstName"], "Grace");
        assert!(created.get("password").is_none());

        let id = created["id"].as_i64().unwrap();
        let response = send(
            &app,
            Method::PUT,
            &format!("/users/{}", id),
            Some(json!({
                "first_name": "Grace",
                "last_name": "Murray",
                "email": "grace@example.com",
                "password": "flowmatic"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["id"], id);
        assert_eq!(updated["lastName"], "Murray");
        assert!(updated.get("password").is_none());
    }

    #[tokio::test]
    async fn test_update_echoes_submitted_fields() {
        let store = MemoryStore::new();
        let app = app(&store);
        let id = create_category(&app).await;

        let response = send(
            &app,
            Method::PUT,
            &format!("/cat/{}", id),
            Some(json!({"name": "Power tools", "description": "Corded"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"id": id, "name": "Power tools", "description": "Corded"})
        );
    }

    #[tokio::test]
    async fn test_client_errors_are_400() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(&app, Method::GET, "/products/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::POST, "/cat", Some(json!({"name": "x"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 1.0,
                "stockQuantity": -1
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{broken"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        for method in [Method::PUT, Method::DELETE] {
            let response = send(&app, method, "/products", None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_unknown_category_reference_is_400() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 1.0,
                "stockQuantity": 1,
                "categoryID": 4242
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deleting_referenced_category_is_409() {
        let store = MemoryStore::new();
        let app = app(&store);
        let category_id = create_category(&app).await;
        send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 1.0,
                "stockQuantity": 1,
                "categoryID": category_id
            })),
        )
        .await;

        let response = send(&app, Method::DELETE, &format!("/cat/{}", category_id), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_empty_body() {
        let store = MemoryStore::new();
        let app = app(&store);
        store.set_unavailable(true);

        let response = send(&app, Method::GET, "/products", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_pool_is_500_with_empty_body() {
        let store = MemoryStore::new();
        let app = app(&store);
        store.set_pool_exhausted(true);

        for uri in ["/products", "/users/1", "/cat"] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert!(body_bytes(response).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_put_with_unknown_category_is_400_and_keeps_row() {
        let store = MemoryStore::new();
        let app = app(&store);
        let category_id = create_category(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 1.0,
                "stockQuantity": 1,
                "categoryID": category_id
            })),
        )
        .await;
        let product = body_json(response).await;
        let product_id = product["id"].as_i64().unwrap();

        let response = send(
            &app,
            Method::PUT,
            &format!("/products/{}", product_id),
            Some(json!({
                "name": "Widget",
                "description": "d",
                "price": 1.0,
                "stockQuantity": 1,
                "categoryID": 4242
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["details"]["field"], "category_id");

        let response = send(&app, Method::GET, &format!("/products/{}", product_id), None).await;
        assert_eq!(body_json(response).await["categoryID"], category_id);
    }

    #[tokio::test]
    async fn test_post_write_failure_is_500() {
        let store = MemoryStore::new();
        let app = app(&store);
        store.set_drop_inserted_rows(true);

        let response = send(
            &app,
            Method::POST,
            "/cat",
            Some(json!({"name": "Tools", "description": ""})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_health_reflects_store() {
        let store = MemoryStore::new();

        let response = send(&app_with(&store, Probe::Up), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");

        let response = send(&app_with(&store, Probe::Down), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["checks"]["database"]["status"], "unhealthy");
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_gives_up_on_a_stalled_store() {
        let store = MemoryStore::new();

        let response = send(&app_with(&store, Probe::Stalled), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let store = MemoryStore::new();
        let app = app(&store);

        let response = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"].as_object().unwrap().keys().any(|p| p.starts_with("/cat")));
    }
}
