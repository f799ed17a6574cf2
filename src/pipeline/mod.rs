//! Bounded fan-out of composition tasks over every combination.

/// Worker pool, per-task outcomes, and the run report.
pub mod coordinator;
