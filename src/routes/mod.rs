//! Route builders: material CRUD under /api plus service health endpoints.

mod common;
mod materials;

pub use common::{common_routes, common_routes_with_ready};
pub use materials::material_routes;

use crate::state::AppState;
use axum::Router;

/// Full service router: common routes at the root, material API under /api.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api", material_routes(state))
}
