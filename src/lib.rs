//! Material registry: inventory master-data service over JSON/HTTP.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ServiceConfig;
pub use error::AppError;
pub use migration::apply_migrations;
pub use model::{Material, MaterialDraft, MaterialPatch, MaterialRecord, MaterialType, Supplier};
pub use routes::{app, common_routes_with_ready, material_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, MaterialStore};
