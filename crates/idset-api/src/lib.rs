//! HTTP API server for interactive datasets.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
