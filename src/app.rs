use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

pub const UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/admin/login", get(handlers::login_page).post(handlers::login))
        .route("/admin/logout", post(handlers::logout))
        .route("/admin/upload", post(handlers::upload))
        .route("/admin/config", post(handlers::save_config))
        .route("/admin/status", post(handlers::status))
        .route(
            "/consulta",
            get(handlers::consulta_get).post(handlers::consulta_post),
        )
        .route("/api/query", get(handlers::api_query))
        .route("/theme/toggle", post(handlers::toggle_theme))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state)
}
