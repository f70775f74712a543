//! Per-unit execution-time profiling with moving-window statistics.
//!
//! Callers record how long named "units" of code take to run; each unit
//! keeps a fixed-size window of its most recent samples plus a lifetime
//! call counter, and answers statistical queries (mean, sample stddev,
//! min, max) over that window on demand. Everything is safe for
//! concurrent use from many threads.
//!
//! ```
//! use unitprof::UnitRegistry;
//!
//! let registry = UnitRegistry::new();
//!
//! let start = unitprof::clock::now();
//! // ... the code being measured ...
//! let elapsed = unitprof::clock::duration(start, unitprof::clock::now());
//! registry.add_sample("db_query", elapsed);
//!
//! let stats = registry.stats("db_query");
//! assert_eq!(stats.total_calls, 1);
//! ```

pub mod clock;
pub mod registry;
pub mod timer;

pub use clock::ScopedSample;
pub use registry::UnitRegistry;
pub use timer::{RollingWindowTimer, Stats, DEFAULT_WINDOW_CAPACITY};
