//! HTTP server: health endpoint plus the WebSocket audio ingestion route.
//!
//! - GET /health - Health check
//! - GET /ws/audio - Upgrade to a streaming audio session

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
