use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::clock::ScopedSample;
use crate::timer::{RollingWindowTimer, Stats, DEFAULT_WINDOW_CAPACITY};

/// Profiles for multiple units of code, keyed by name. A unit's timer is
/// created on first reference and lives for the registry's lifetime.
/// Thread-safe: the name map has its own lock, so recording against an
/// existing unit never contends with activity on unrelated units.
pub struct UnitRegistry {
    units: RwLock<HashMap<String, Arc<RollingWindowTimer>>>,
    window_capacity: usize,
}

impl UnitRegistry {
    /// A registry whose timers keep [`DEFAULT_WINDOW_CAPACITY`] samples each.
    pub fn new() -> Self {
        Self::with_window_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    /// A registry whose timers each retain the most recent `capacity` samples.
    pub fn with_window_capacity(capacity: usize) -> Self {
        Self {
            units: RwLock::new(HashMap::new()),
            window_capacity: capacity,
        }
    }

    /// Record one execution-time sample for `unit`, creating its timer on
    /// first use.
    pub fn add_sample(&self, unit: &str, duration: Duration) {
        self.timer(unit).add_sample(duration);
    }

    /// Current moving-window statistics for `unit`. A never-seen unit
    /// reports empty stats (`n == 0`, `total_calls == 0`) rather than
    /// an error, and is registered by the query.
    pub fn stats(&self, unit: &str) -> Stats {
        self.timer(unit).stats()
    }

    /// Window occupancy for `unit`, with the same lazy-create policy
    /// as `stats()`.
    pub fn measurement_count(&self, unit: &str) -> usize {
        self.timer(unit).measurement_count()
    }

    /// Snapshot the stats of every known unit. Each unit's entry is
    /// internally consistent, but entries are captured one after another,
    /// so concurrent writers may land between units.
    pub fn all_stats(&self) -> HashMap<String, Stats> {
        // Clone the Arcs first so per-unit locks are taken with the
        // map lock already released.
        let timers: Vec<(String, Arc<RollingWindowTimer>)> = self
            .units
            .read()
            .iter()
            .map(|(name, timer)| (name.clone(), Arc::clone(timer)))
            .collect();

        timers
            .into_iter()
            .map(|(name, timer)| (name, timer.stats()))
            .collect()
    }

    /// Start timing a region of code attributed to `unit`; the sample is
    /// recorded when the returned guard drops.
    pub fn scope<'a>(&'a self, unit: &str) -> ScopedSample<'a> {
        ScopedSample::new(self, unit)
    }

    /// Fetch the timer for `unit`, inserting a fresh one if the name is new.
    fn timer(&self, unit: &str) -> Arc<RollingWindowTimer> {
        // Fast path: the unit already exists, a read lock suffices.
        if let Some(timer) = self.units.read().get(unit) {
            return Arc::clone(timer);
        }

        // Insert-if-absent under the write lock; a racing creator for the
        // same name loses and we hand out whichever timer won.
        let mut units = self.units.write();
        let timer = units
            .entry(unit.to_owned())
            .or_insert_with(|| Arc::new(RollingWindowTimer::with_capacity(self.window_capacity)));
        Arc::clone(timer)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────
