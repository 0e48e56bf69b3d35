use crate::api::{handlers, openapi::ApiDoc};
use crate::auth::middleware::auth_middleware;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Routes mounted under `/api`.
pub fn create_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/health", get(|| async { "OK" }))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/users", post(handlers::users::register));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/auth/session", get(handlers::auth::current_session))
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        .route("/users/{id}/profile", patch(handlers::users::update_profile))
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::replace_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .patch(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public_routes.merge(protected_routes)
}

/// The complete application: API routes, OpenAPI document and HTTP layers.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api", create_router(state.clone()))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/swagger.json", ApiDoc::openapi()),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::jwt::AuthService, db::TursoClient, StoregateConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let db = TursoClient::new_memory().await.expect("memory db");
        AppState {
            config: Arc::new(StoregateConfig::default()),
            db: Arc::new(db),
            auth_service: Arc::new(AuthService::new(
                "test-secret-at-least-32-characters-long".to_string(),
                24 * 60 * 60,
            )),
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = build_app(test_state().await);

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_user_listing_is_gated_but_registration_is_not() {
        let app = build_app(test_state().await);

        let listing = app
            .clone()
            .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(listing.status(), StatusCode::UNAUTHORIZED);

        // Reaches the handler: an empty body is a 400, not a 401
        let registration = app
            .oneshot(
                Request::post("/api/users")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(registration.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_business_records_are_gated() {
        let app = build_app(test_state().await);

        for uri in ["/api/products", "/api/customers"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }
}
