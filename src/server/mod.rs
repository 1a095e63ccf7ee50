//! HTTP server implementation

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod state;

pub use builder::run_server;
pub use state::AppState;
