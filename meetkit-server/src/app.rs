//! Router assembly and HTTP middleware.

use axum::{
    Json, Router, middleware,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{SecurityConfig, ServerConfig};
use crate::controllers::chat::ChatController;
use crate::controllers::oauth::OauthController;
use crate::controllers::schedule::ScheduleController;
use crate::ratelimit::RateLimiter;
use crate::{controllers, ratelimit};

/// Build CORS layer based on security configuration
fn build_cors_layer(config: &SecurityConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            config.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

/// Assembles the full application router.
///
/// The scheduling endpoint carries its own, stricter rate limit; every
/// other route shares the default budget.
pub fn create_app(config: ServerConfig) -> Router {
    let schedule_controller = ScheduleController::new(&config);
    let oauth_controller = OauthController::new(&config);
    let chat_controller = ChatController::new(&config);

    let default_limiter = Arc::new(RateLimiter::per_minute(config.rate_limit.default_per_minute));
    let schedule_limiter = Arc::new(RateLimiter::per_minute(config.rate_limit.schedule_per_minute));

    let schedule_router = Router::new()
        .route("/api/schedule", post(controllers::schedule::schedule_meeting))
        .route("/api/schedule/", post(controllers::schedule::schedule_meeting))
        .with_state(schedule_controller)
        .layer(middleware::from_fn_with_state(schedule_limiter, ratelimit::enforce));

    let app_router = Router::new()
        .route("/", get(controllers::chat::index))
        .route("/chat", post(controllers::chat::chat))
        .route("/history", get(controllers::chat::history))
        .with_state(chat_controller)
        .route("/oauth/login", get(controllers::oauth::login))
        .route("/oauth/callback", get(controllers::oauth::callback))
        .with_state(oauth_controller)
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(default_limiter, ratelimit::enforce));

    let cors_layer = build_cors_layer(&config.security);

    app_router.merge(schedule_router).layer(
        ServiceBuilder::new()
            // Tracing for observability
            .layer(TraceLayer::new_for_http())
            // Request timeout
            .layer(TimeoutLayer::with_status_code(
                axum::http::StatusCode::REQUEST_TIMEOUT,
                config.security.request_timeout,
            ))
            // Request body size limit
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            // CORS configuration
            .layer(cors_layer)
            // Security headers
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static("1; mode=block"),
            )),
    )
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
