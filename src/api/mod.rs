//! HTTP API
//!
//! An axum router over the core services. `/auth` and `/health` are public; everything
//! under `/expenses` passes through [`auth::require_auth`] first.

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;


pub use routes::create_router;
pub use server::{create_server, run_server};
pub use state::AppState;
