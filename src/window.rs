//! Rolling window of recent snapshots.
//!
//! The browser client keeps the most recent snapshots for charting and
//! evicts the oldest point from every series in lockstep once the window is
//! full. This type states that contract on the Rust side; the `test`
//! subcommand uses it to replay what a connected client would hold.

use std::collections::VecDeque;

use crate::sampler::MetricsSnapshot;

/// Number of points a connected client keeps per series.
pub const DEFAULT_CHART_POINTS: usize = 20;

/// Fixed-capacity, FIFO-evicting buffer of snapshots in arrival order.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    points: VecDeque<MetricsSnapshot>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a snapshot, evicting the oldest entry when at capacity.
    pub fn push(&mut self, snapshot: MetricsSnapshot) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MetricsSnapshot> {
        self.points.iter()
    }

    pub fn oldest(&self) -> Option<&MetricsSnapshot> {
        self.points.front()
    }

    pub fn newest(&self) -> Option<&MetricsSnapshot> {
        self.points.back()
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_POINTS)
    }
}
