//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{HttpSheetFetcher, ServerDeps};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    admin_applications_handler, admin_login_events_handler, admin_members_handler,
    admin_pages_handler,
    approve_application_handler, approve_login_handler, apply_handler, delete_page_handler,
    generate_page_handler, health_handler, import_members_handler, import_sheet_handler,
    list_pages_handler, log_login_handler, members_handler, page_handler,
    refresh_sheets_handler, reject_application_handler, save_page_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
///
/// Returns (Router, Arc<ServerDeps>) - deps are also needed by the
/// scheduled re-sync task.
pub fn build_app(pool: PgPool, config: &Config) -> (Router, Arc<ServerDeps>) {
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let server_deps = Arc::new(ServerDeps::new(
        pool.clone(),
        Arc::new(HttpSheetFetcher::new()),
        jwt_service.clone(),
        config.admin_emails.clone(),
    ));

    let app_state = AppState {
        db_pool: pool,
        deps: server_deps.clone(),
        jwt_service: jwt_service.clone(),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting: 10 requests per second per IP with bursts of 20.
    // The public apply form is the target; admins share the same limit.
    let rate_limit_config = std::sync::Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let jwt_service_for_middleware = jwt_service;

    let app = Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Public
        .route("/api/apply", post(apply_handler))
        // Authenticated members
        .route("/api/approve-login", post(approve_login_handler))
        .route("/api/log-login", post(log_login_handler))
        .route("/api/pages", get(list_pages_handler))
        .route("/api/pages/:slug", get(page_handler))
        // Admin
        .route("/api/ai/generate-page", post(generate_page_handler))
        .route("/api/admin/import-sheet", post(import_sheet_handler))
        .route("/api/admin/refresh-sheets", post(refresh_sheets_handler))
        .route(
            "/api/admin/pages",
            get(admin_pages_handler).post(save_page_handler),
        )
        .route("/api/admin/pages/:slug", delete(delete_page_handler))
        .route(
            "/api/admin/members",
            get(admin_members_handler).post(members_handler),
        )
        .route("/api/admin/import-members", post(import_members_handler))
        .route("/api/admin/login-events", get(admin_login_events_handler))
        .route("/api/admin/applications", get(admin_applications_handler))
        .route(
            "/api/admin/approve-application",
            post(approve_application_handler),
        )
        .route(
            "/api/admin/reject-application",
            post(reject_application_handler),
        )
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(rate_limit_layer)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    (app, server_deps)
}
