// Agent Report API - company analysis reports and agent recommendations

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod analysis;  // Client for the external company analysis service
pub mod storage;   // Report file bodies
pub mod routes;
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
