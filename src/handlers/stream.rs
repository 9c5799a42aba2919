//! SSE endpoint streaming metrics snapshots to connected clients.
//!
//! Each client connection drives its own sampling loop; there is no shared
//! broadcast. The sampler's blocking CPU window is the effective tick
//! interval, and it runs on the blocking pool so one client's window never
//! stalls another connection.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tracing::{debug, error, info, instrument, warn};

use crate::health_stats::HealthStats;
use crate::sampler::{Sampler, CPU_SAMPLE_WINDOW};
use crate::state::SharedState;

/// Decrements the active-stream gauge on every exit path, including a
/// client disconnect that drops the stream mid-await.
struct StreamGuard {
    stats: Arc<HealthStats>,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        let active = self.stats.stream_closed();
        info!(active_streams = active, "metrics stream client disconnected");
    }
}

/// Handler for the /metrics-stream endpoint.
///
/// Emits one `metrics` event per sampling tick until the client
/// disconnects. A disconnect drops the response stream, which ends the
/// loop and releases the connection; the client must open a new stream to
/// resume.
#[instrument(skip(state))]
pub async fn stream_handler(
    State(state): State<SharedState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let active = state.health_stats.stream_opened();
    info!(active_streams = active, "metrics stream client connected");

    let stats = state.health_stats.clone();

    let stream = async_stream::stream! {
        let _guard = StreamGuard { stats: stats.clone() };
        let sampler = Sampler::new();

        loop {
            let started = Instant::now();

            let snapshot = match tokio::task::spawn_blocking(move || sampler.sample()).await {
                Ok(Ok(snapshot)) => snapshot,
                Ok(Err(e)) => {
                    // Non-fatal: skip this tick, retry on the next one.
                    warn!(error = %e, "sampling failed, skipping tick");
                    tokio::time::sleep(CPU_SAMPLE_WINDOW).await;
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "sampling task aborted");
                    break;
                }
            };

            stats.record_frame(started.elapsed().as_secs_f64());

            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    debug!(payload = %json, "emitting metrics frame");
                    yield Ok(Event::default().event("metrics").data(json));
                }
                Err(e) => {
                    error!(error = %e, "failed to serialize snapshot");
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
