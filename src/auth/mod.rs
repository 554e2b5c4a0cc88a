use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::{require_auth, AuthUser};

/// Routes reachable without a token.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes that expect the auth layer in front of them.
pub fn protected_router() -> Router<AppState> {
    handlers::me_routes()
}
