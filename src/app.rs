use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::Database;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::schema::links::API_PREFIX;
use crate::schema::Links;

/// Shared handler state: database handle, configuration and link builder
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub links: Links,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Result<Self, url::ParseError> {
        let links = Links::new(config.api.public_url.as_deref())?;
        Ok(Self {
            db,
            config: Arc::new(config),
            links,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/health", get(public::health))
        .route(API_PREFIX, get(public::index))
        .route(&format!("{}/", API_PREFIX), get(public::index))
        .nest(API_PREFIX, auth_public_routes().merge(protected_routes(state.clone())))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }

    router
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, bucketlists, items, tags};

    Router::new()
        // Session management for authenticated users
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/users/:id", get(auth::user_detail))
        // Bucketlists
        .route("/bucketlists", get(bucketlists::list).post(bucketlists::create))
        .route("/bucketlists/", get(bucketlists::list).post(bucketlists::create))
        .route(
            "/bucketlists/:id",
            get(bucketlists::get).put(bucketlists::update).delete(bucketlists::delete),
        )
        // Items
        .route("/bucketlists/:id/items", get(items::list).post(items::create))
        .route("/bucketlists/:id/items/", get(items::list).post(items::create))
        .route(
            "/bucketlists/:id/items/:item_id",
            get(items::get).put(items::update).delete(items::delete),
        )
        // Tags
        .route("/bucketlists/:id/tags", get(tags::list).post(tags::create))
        .route("/bucketlists/:id/tags/", get(tags::list).post(tags::create))
        .route(
            "/bucketlists/:id/tags/:tag_id",
            get(tags::get).put(tags::update).delete(tags::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Any origin only for an explicit `*`; an empty list allows none
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Page Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let config = AppConfig::testing();
        let db = Database::connect(&config.database).await.unwrap();
        db.create_all().await.unwrap();
        app(AppState::new(db, config).unwrap())
    }

    #[tokio::test]
    async fn unknown_routes_are_json_404() {
        let response = test_app()
            .await
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_requests() {
        for uri in ["/api/v1/bucketlists", "/api/v1/bucketlists/", "/api/v1/bucketlists/1/items/"] {
            let response = test_app()
                .await
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    async fn json_request(app: Router, content_type: Option<&str>, body: String) -> Response {
        let mut request = Request::builder().method("POST").uri("/api/v1/auth/register");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        app.oneshot(request.body(Body::from(body)).unwrap()).await.unwrap()
    }

    async fn error_code(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let description = "x".repeat(100 * 1024);
        let body = serde_json::json!({ "username": "big", "email": "big@example.com", "password": description });
        let response = json_request(test_app().await, Some("application/json"), body.to_string()).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error_code(response).await, "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn missing_content_type_is_unsupported_media_type() {
        let response = json_request(test_app().await, None, "{}".to_string()).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error_code(response).await, "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_json() {
        let response = json_request(test_app().await, Some("application/json"), "{\"username\":".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "INVALID_JSON");
    }

    async fn cors_header(origins: &[&str]) -> Option<HeaderValue> {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&origins));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn cors_empty_origin_list_allows_nobody() {
        assert!(cors_header(&[]).await.is_none());
    }

    #[tokio::test]
    async fn cors_wildcard_allows_any_origin() {
        assert_eq!(cors_header(&["*"]).await.unwrap(), "*");
    }

    #[tokio::test]
    async fn cors_list_only_echoes_listed_origins() {
        assert!(cors_header(&["http://localhost:3000", "not a header\n"]).await.is_none());
        assert_eq!(
            cors_header(&["http://elsewhere.example"]).await.unwrap(),
            "http://elsewhere.example"
        );
    }
}
