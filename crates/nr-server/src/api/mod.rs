//! API routes for the NR configuration server.

mod routes;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;

pub use routes::{CoordinateInput, InvalidCoordinate};

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
