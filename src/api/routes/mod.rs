//! API route handlers

pub mod auth;
pub mod expenses;
pub mod health;
pub mod hierarchy;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::auth::require_auth;
use crate::api::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Everything under /expenses requires a bearer token
    let expenses = Router::new()
        .route(
            "/heads",
            get(hierarchy::list_heads).post(hierarchy::add_head),
        )
        .route("/categories", post(hierarchy::add_category))
        .route("/categories/{head_id}", get(hierarchy::list_categories))
        .route("/subcategories", post(hierarchy::add_subcategory))
        .route(
            "/subcategories/{category_id}",
            get(hierarchy::list_subcategories),
        )
        .route("/reports", get(expenses::get_reports))
        .route("/add", post(expenses::add_expense))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .nest("/expenses", expenses)
        .with_state(state)
}
