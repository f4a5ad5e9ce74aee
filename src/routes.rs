use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::handlers;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Credential endpoints are rate limited per client IP
    let credential_routes = Router::new()
        .route("/api/login", post(handlers::auth::login))
        .route("/api/users", post(handlers::users::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::limit_credentials,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(credential_routes);

    let protected_routes = Router::new()
        // Users
        .route(
            "/api/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // Emotion logs
        .route(
            "/api/emotionlogs",
            get(handlers::emotion_logs::list_logs).post(handlers::emotion_logs::create_log),
        )
        .route(
            "/api/emotionlogs/:id",
            get(handlers::emotion_logs::get_log)
                .put(handlers::emotion_logs::update_log)
                .delete(handlers::emotion_logs::delete_log),
        )
        // Analytics
        .route("/api/analytics/distribution", get(handlers::analytics::distribution))
        .route("/api/analytics/triggers", get(handlers::analytics::triggers))
        .route("/api/analytics/patterns", get(handlers::analytics::patterns))
        .route("/api/analytics/wellness", get(handlers::analytics::wellness))
        .route("/api/analytics/activities", get(handlers::analytics::activities))
        .route(
            "/api/analytics/generate-test-data",
            post(handlers::analytics::generate_test_data),
        )
        // Advice
        .route("/api/advice", get(handlers::advice::get_advice))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins = Vec::new();
    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => origins.push(origin),
        Err(_) => tracing::warn!(origin = %config.frontend_url, "Ignoring invalid FRONTEND_URL"),
    }
    // Extra origins for LAN testing, comma separated
    for extra in &config.cors_extra_origins {
        if let Ok(origin) = extra.parse::<HeaderValue>() {
            origins.push(origin);
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::connect_info::MockConnectInfo,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use std::{net::SocketAddr, sync::Arc};
    use tower::ServiceExt;

    use crate::auth::rate_limit::RateLimiter;

    /// Router over a pool that never connects; only routes that stop before
    /// the database can be exercised.
    fn test_app() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/emotion_journal_test")
            .unwrap();
        let state = AppState {
            db,
            config: Arc::new(Config::for_tests()),
            rate_limiter: RateLimiter::default(),
        };
        build_router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], env!("CARGO_PKG_NAME"));
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        for uri in [
            "/api/emotionlogs",
            "/api/analytics/distribution?timeRange=week",
            "/api/analytics/triggers",
            "/api/analytics/patterns",
            "/api/analytics/wellness",
            "/api/analytics/activities",
            "/api/advice",
        ] {
            let response = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
            let body = body_json(response).await;
            assert_eq!(body["error"]["code"], 401);
        }
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/analytics/wellness")
                    .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let response = test_app()
            .oneshot(json_request(
                Method::POST,
                "/api/users",
                r#"{"username":"alice","name":"Alice","password":"password"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Password is not strong enough"));
    }

    #[tokio::test]
    async fn test_login_malformed_body_is_bad_request() {
        let response = test_app()
            .oneshot(json_request(Method::POST, "/api/login", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let app = test_app();
        for _ in 0..crate::auth::rate_limit::MAX_ATTEMPTS {
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/api/login", "{}"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        let response = app
            .oneshot(json_request(Method::POST, "/api/login", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        // No token: unmatched paths must not reach the auth middleware
        for uri in ["/api/nope", "/api/analytics/nope", "/api/emotionlogs/a/b"] {
            let response = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_not_rate_limited() {
        let app = test_app();
        for _ in 0..=crate::auth::rate_limit::MAX_ATTEMPTS {
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/api/nope", "{}"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        let response = app
            .oneshot(json_request(Method::POST, "/api/login", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
