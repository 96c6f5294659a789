//! Environment-driven service configuration.

use std::env;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl ServiceConfig {
    /// Read configuration from the process environment, with development
    /// defaults. `.env` loading happens in `main` before this is called.
    pub fn from_env() -> Self {
        ServiceConfig {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/materials".into()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
