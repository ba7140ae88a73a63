use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route(
            "/auth/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB, covers picture uploads
}
