//! HTTP API routes for the Users service

pub mod health;

use axum::Router;
use domain_users::{MongoUserRepository, UserService};

use crate::state::AppState;

/// Create all API routes
pub fn routes(service: UserService<MongoUserRepository>, state: &AppState) -> Router {
    domain_users::handlers::router(service).merge(health::router(state.clone()))
}
