//! Material CRUD routes.

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::materials::{create, delete as delete_handler, list, update};
use crate::state::AppState;

pub fn material_routes(state: AppState) -> Router {
    Router::new()
        .route("/materials", get(list).post(create))
        .route("/materials/:id", put(update).delete(delete_handler))
        .with_state(state)
}
