//! HTTP endpoint handlers for the dashboard server.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/`: dashboard page embedding the chart renderer
//! - `/metrics-stream`: SSE metrics stream
//! - `/health`: health check endpoint

pub mod health;
pub mod index;
pub mod stream;

// Re-export handlers
pub use health::health_handler;
pub use index::index_handler;
pub use stream::stream_handler;
