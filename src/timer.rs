use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

// ─── Configuration ───────────────────────────────────────────────

/// Default number of samples the moving window retains per unit.
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

// ─── Public types ────────────────────────────────────────────────

/// Moving-window statistics for one unit, computed fresh at query time.
/// All duration fields are fractional milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// Arithmetic mean over the retained window; 0.0 when `n == 0`.
    pub mean: f64,
    /// Sample standard deviation (n−1 denominator); 0.0 when `n <= 1`.
    pub stddev: f64,
    /// Smallest retained sample; 0.0 when `n == 0` — check `n` first.
    pub min: f64,
    /// Largest retained sample; 0.0 when `n == 0` — check `n` first.
    pub max: f64,
    /// Number of samples currently in the window.
    pub n: usize,
    /// Lifetime sample count, unaffected by window eviction.
    pub total_calls: u64,
}

/// Tracks the execution time of one unit of code over a fixed-size
/// moving window. Callers push samples with `add_sample()` and read
/// aggregates with `stats()`. Thread-safe.
pub struct RollingWindowTimer {
    inner: Mutex<Inner>,
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    /// Ring of retained samples in milliseconds, oldest at the front.
    window: VecDeque<f64>,
    capacity: usize,
    /// Every sample ever added, including ones already evicted.
    total_calls: u64,
}

// ─── RollingWindowTimer impl ─────────────────────────────────────

impl RollingWindowTimer {
    /// A timer with the default window of [`DEFAULT_WINDOW_CAPACITY`] samples.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    /// A timer whose window retains the most recent `capacity` samples.
    /// A capacity of zero retains no samples at all; only the lifetime
    /// call counter advances.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                window: VecDeque::with_capacity(capacity),
                capacity,
                total_calls: 0,
            }),
        }
    }

    /// Record one execution-time sample, evicting the oldest retained
    /// sample once the window is full. `Duration` is non-negative and
    /// finite by construction, so no validation happens here.
    pub fn add_sample(&self, duration: Duration) {
        let ms = duration.as_secs_f64() * 1000.0;
        let mut inner = self.inner.lock();
        inner.total_calls += 1;
        // A zero-capacity window retains nothing; the call still counts.
        if inner.capacity == 0 {
            return;
        }
        if inner.window.len() == inner.capacity {
            inner.window.pop_front();
        }
        inner.window.push_back(ms);
    }

    /// Compute mean / stddev / min / max over the current window in one
    /// consistent snapshot — a concurrent `add_sample` is either fully
    /// visible or not at all.
    pub fn stats(&self) -> Stats {
        self.inner.lock().stats()
    }

    /// Number of samples the moving statistics are currently computed over.
    pub fn measurement_count(&self) -> usize {
        self.inner.lock().window.len()
    }
}

impl Default for RollingWindowTimer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Inner impl ──────────────────────────────────────────────────

impl Inner {
    fn stats(&self) -> Stats {
        let n = self.window.len();
        if n == 0 {
            return Stats {
                mean: 0.0,
                stddev: 0.0,
                min: 0.0,
                max: 0.0,
                n: 0,
                total_calls: self.total_calls,
            };
        }

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &ms in &self.window {
            sum += ms;
            min = min.min(ms);
            max = max.max(ms);
        }
        let mean = sum / n as f64;

        // Sample standard deviation: measurements, not a full population.
        let stddev = if n > 1 {
            let sq_dev: f64 = self.window.iter().map(|&ms| (ms - mean).powi(2)).sum();
            (sq_dev / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Stats {
            mean,
            stddev,
            min,
            max,
            n,
            total_calls: self.total_calls,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn ms(v: f64) -> Duration {
        Duration::from_secs_f64(v / 1000.0)
    }

    #[test]
    fn fresh_timer_is_empty() {
        let timer = RollingWindowTimer::new();
        assert_eq!(timer.measurement_count(), 0);

        let s = timer.stats();
        assert_eq!(s.n, 0);
        assert_eq!(s.total_calls, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.stddev, 0.0);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 0.0);
    }

    #[test]
    fn known_sequence_statistics() {
        let timer = RollingWindowTimer::new();
        for v in [1.0, 2.0, 3.0] {
            timer.add_sample(ms(v));
        }

        let s = timer.stats();
        assert_eq!(s.n, 3);
        assert_eq!(s.total_calls, 3);
        assert!((s.mean - 2.0).abs() < 1e-9);
        assert!((s.min - 1.0).abs() < 1e-9);
        assert!((s.max - 3.0).abs() < 1e-9);
        // Sample stddev of [1, 2, 3] is exactly 1.
        assert!((s.stddev - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_sample_has_zero_stddev() {
        let timer = RollingWindowTimer::new();
        timer.add_sample(ms(5.0));

        let s = timer.stats();
        assert_eq!(s.n, 1);
        assert_eq!(s.stddev, 0.0);
        assert!((s.mean - 5.0).abs() < 1e-9);
        assert!((s.min - 5.0).abs() < 1e-9);
        assert!((s.max - 5.0).abs() < 1e-9);
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let timer = RollingWindowTimer::with_capacity(4);
        for i in 0..50 {
            timer.add_sample(ms(i as f64));
            assert!(timer.measurement_count() <= 4);
        }
        assert_eq!(timer.measurement_count(), 4);
    }

    #[test]
    fn eviction_drops_oldest_first() {
        let timer = RollingWindowTimer::with_capacity(3);
        // Fill to capacity with [1, 2, 3], then push 4 — 1 must go.
        for v in [1.0, 2.0, 3.0, 4.0] {
            timer.add_sample(ms(v));
        }

        let s = timer.stats();
        assert_eq!(s.n, 3);
        assert_eq!(s.total_calls, 4);
        assert!((s.min - 2.0).abs() < 1e-9);
        assert!((s.max - 4.0).abs() < 1e-9);
        assert!((s.mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_capacity_window_retains_nothing() {
        let timer = RollingWindowTimer::with_capacity(0);
        for _ in 0..5 {
            timer.add_sample(ms(1.0));
        }

        assert_eq!(timer.measurement_count(), 0);
        let s = timer.stats();
        assert_eq!(s.n, 0);
        assert_eq!(s.total_calls, 5);
        assert_eq!(s.mean, 0.0);
    }

    #[test]
    fn total_calls_counts_evicted_samples() {
        let timer = RollingWindowTimer::with_capacity(2);
        for _ in 0..1000 {
            timer.add_sample(ms(1.0));
        }
        let s = timer.stats();
        assert_eq!(s.total_calls, 1000);
        assert_eq!(s.n, 2);
    }

    #[test]
    fn concurrent_adds_lose_nothing() {
        let timer = Arc::new(RollingWindowTimer::with_capacity(64));
        let threads = 8;
        let per_thread = 1000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let timer = Arc::clone(&timer);
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        timer.add_sample(ms(1.0));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let s = timer.stats();
        assert_eq!(s.total_calls, threads * per_thread);
        assert_eq!(s.n, 64);
        // Every sample was 1 ms, so a torn read would show here.
        assert!((s.mean - 1.0).abs() < 1e-9);
        assert_eq!(s.stddev, 0.0);
    }

    #[test]
    fn stats_serializes_as_flat_record() {
        let timer = RollingWindowTimer::new();
        timer.add_sample(ms(2.0));

        let json = serde_json::to_value(timer.stats()).unwrap();
        assert_eq!(json["n"], 1);
        assert_eq!(json["total_calls"], 1);
        assert!((json["mean"].as_f64().unwrap() - 2.0).abs() < 1e-9);
    }
}
