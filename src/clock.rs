use std::time::{Duration, Instant};

use crate::registry::UnitRegistry;

/// Current instant from the platform's monotonic high-resolution clock.
pub fn now() -> Instant {
    Instant::now()
}

/// Elapsed time between two timestamps, with sub-millisecond resolution.
/// Saturates to zero rather than panicking if `end` precedes `start`.
pub fn duration(start: Instant, end: Instant) -> Duration {
    end.saturating_duration_since(start)
}

/// Drop guard that brackets a measured region: captures the clock on
/// creation and records the elapsed time into the registry on drop.
///
/// Obtained from [`UnitRegistry::scope`]; keeps no lock while the
/// measured code runs.
pub struct ScopedSample<'a> {
    registry: &'a UnitRegistry,
    unit: String,
    start: Instant,
}

impl<'a> ScopedSample<'a> {
    pub(crate) fn new(registry: &'a UnitRegistry, unit: &str) -> Self {
        Self {
            registry,
            unit: unit.to_owned(),
            start: now(),
        }
    }
}

impl Drop for ScopedSample<'_> {
    fn drop(&mut self) {
        let elapsed = duration(self.start, now());
        self.registry.add_sample(&self.unit, elapsed);
    }
}
