//! Internal statistics for the /health endpoint.
//!
//! Tracks stream lifecycle counters and a running aggregate of sample
//! durations. Counters are updated from per-connection tasks, so
//! everything here is atomic or mutex-guarded.

use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Default)]
struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
            self.last = value;
            self.sum = value;
            self.count = 1;
            return;
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

#[derive(Default)]
struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Aggregated stream statistics rendered by the /health endpoint.
#[derive(Default)]
pub struct HealthStats {
    sample_duration_seconds: Stat,
    active_streams: AtomicU64,
    streams_total: AtomicU64,
    frames_sent: AtomicU64,
}

impl HealthStats {
    pub fn new() -> Self {
        Default::default()
    }

    /// Records a newly opened metrics stream. Returns the active count.
    pub fn stream_opened(&self) -> u64 {
        self.streams_total.fetch_add(1, Ordering::Relaxed);
        self.active_streams.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a terminated metrics stream (any exit path). Returns the
    /// remaining active count.
    pub fn stream_closed(&self) -> u64 {
        self.active_streams
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1)
    }

    /// Records one delivered frame and the duration of the sample behind it.
    pub fn record_frame(&self, sample_duration_seconds: f64) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.sample_duration_seconds
            .add_sample(sample_duration_seconds);
    }

    pub fn active_streams(&self) -> u64 {
        self.active_streams.load(Ordering::Relaxed)
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn render_table(&self) -> String {
        let (sd_cur, sd_avg, sd_max, sd_min, _sd_count) =
            self.sample_duration_seconds.snapshot();

        let left_col = 26usize;
        let col_w = 12usize;

        let mut out = String::new();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "metric",
            "current",
            "average",
            "max",
            "min",
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(out, "{}", "-".repeat(left_col + 3 + (col_w + 3) * 4)).ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "sample duration (s)",
            format!("{:.3}", sd_cur),
            format!("{:.3}", sd_avg),
            format!("{:.3}", sd_max),
            format!("{:.3}", sd_min),
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(out).ok();
        writeln!(
            out,
            "active streams: {}",
            self.active_streams.load(Ordering::Relaxed)
        )
        .ok();
        writeln!(
            out,
            "streams served: {}",
            self.streams_total.load(Ordering::Relaxed)
        )
        .ok();
        writeln!(
            out,
            "frames sent:    {}",
            self.frames_sent.load(Ordering::Relaxed)
        )
        .ok();

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_counters_track_open_and_close() {
        let stats = HealthStats::new();
        assert_eq!(stats.stream_opened(), 1);
        assert_eq!(stats.stream_opened(), 2);
        assert_eq!(stats.stream_closed(), 1);
        assert_eq!(stats.stream_closed(), 0);
        assert_eq!(stats.active_streams(), 0);
    }

    #[test]
    fn running_stat_tracks_min_max_avg() {
        let mut stat = RunningStat::default();
        stat.add(1.0);
        stat.add(3.0);
        stat.add(2.0);

        assert_eq!(stat.min, 1.0);
        assert_eq!(stat.max, 3.0);
        assert_eq!(stat.last, 2.0);
        assert_eq!(stat.avg(), 2.0);
    }

    #[test]
    fn render_table_includes_counters() {
        let stats = HealthStats::new();
        stats.stream_opened();
        stats.record_frame(1.002);

        let table = stats.render_table();
        assert!(table.contains("sample duration (s)"));
        assert!(table.contains("active streams: 1"));
        assert!(table.contains("frames sent:    1"));
    }
}
