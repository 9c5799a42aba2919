//! Application state management for the dashboard server.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::health_stats::HealthStats;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Application state shared across requests. Connection handlers are
/// independently constructible from this immutable configuration; they
/// share no mutable state beyond the health counters.
pub struct AppState {
    pub config: Arc<Config>,
    pub health_stats: Arc<HealthStats>,
    pub started: Instant,
}
