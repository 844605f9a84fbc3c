//! Diagnostics gathered while generating operators.
//!
//! [`GenerationCounters`] accumulate across calls and are used to compare
//! samplers offline; they are never reset by the generator itself.
//! [`GenerationStats`] describe a single call.

use std::ops::AddAssign;
use std::time::Duration;

/// Running counters across generation calls.
///
/// # Example
///
/// ```
/// use pap_types::GenerationCounters;
///
/// let mut total = GenerationCounters::default();
/// total += GenerationCounters { ik_checks: 10, ik_infeasible: 7, ..Default::default() };
/// assert_eq!(total.ik_checks, 10);
/// assert!((total.ik_feasible_ratio() - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationCounters {
    /// Candidates submitted to the feasibility checker.
    pub ik_checks: usize,
    /// Candidates rejected by the feasibility checker.
    pub ik_infeasible: usize,
    /// Verified candidates submitted to motion planning.
    pub mp_checks: usize,
    /// Verified candidates for which a pick or place motion was not found.
    pub mp_infeasible: usize,
}

impl GenerationCounters {
    /// Fraction of feasibility checks that passed (0 when none ran).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ik_feasible_ratio(&self) -> f64 {
        if self.ik_checks == 0 {
            return 0.0;
        }
        (self.ik_checks - self.ik_infeasible.min(self.ik_checks)) as f64 / self.ik_checks as f64
    }

    /// Fraction of motion-planning checks that found both motions (0 when none ran).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mp_feasible_ratio(&self) -> f64 {
        if self.mp_checks == 0 {
            return 0.0;
        }
        (self.mp_checks - self.mp_infeasible.min(self.mp_checks)) as f64 / self.mp_checks as f64
    }
}

impl AddAssign for GenerationCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.ik_checks += rhs.ik_checks;
        self.ik_infeasible += rhs.ik_infeasible;
        self.mp_checks += rhs.mp_checks;
        self.mp_infeasible += rhs.mp_infeasible;
    }
}

/// Statistics about a single generation call.
///
/// # Example
///
/// ```
/// use pap_types::GenerationStats;
/// use std::time::Duration;
///
/// let stats = GenerationStats::new()
///     .with_draws(40)
///     .with_pool_size(3)
///     .with_sampling_elapsed(Duration::from_millis(12));
/// assert_eq!(stats.draws(), 40);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    draws: usize,
    pool_size: usize,
    motion_candidates_tried: usize,
    sampling_elapsed: Duration,
    motion_elapsed: Duration,
}

impl GenerationStats {
    /// Creates empty statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            draws: 0,
            pool_size: 0,
            motion_candidates_tried: 0,
            sampling_elapsed: Duration::ZERO,
            motion_elapsed: Duration::ZERO,
        }
    }

    /// Sets the number of candidates drawn.
    #[must_use]
    pub const fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws;
        self
    }

    /// Sets the number of feasibility-verified candidates.
    #[must_use]
    pub const fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Sets the number of candidates that went through motion planning.
    #[must_use]
    pub const fn with_motion_candidates_tried(mut self, count: usize) -> Self {
        self.motion_candidates_tried = count;
        self
    }

    /// Updates the number of candidates that went through motion planning in place.
    pub const fn set_motion_candidates_tried(&mut self, count: usize) {
        self.motion_candidates_tried = count;
    }

    /// Sets the time spent sampling and checking feasibility.
    #[must_use]
    pub const fn with_sampling_elapsed(mut self, elapsed: Duration) -> Self {
        self.sampling_elapsed = elapsed;
        self
    }

    /// Sets the time spent in motion planning.
    #[must_use]
    pub const fn with_motion_elapsed(mut self, elapsed: Duration) -> Self {
        self.motion_elapsed = elapsed;
        self
    }

    /// Updates the time spent in motion planning in place.
    pub const fn set_motion_elapsed(&mut self, elapsed: Duration) {
        self.motion_elapsed = elapsed;
    }

    /// Returns the number of candidates drawn.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.draws
    }

    /// Returns the number of feasibility-verified candidates.
    #[must_use]
    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Returns the number of candidates that went through motion planning.
    #[must_use]
    pub const fn motion_candidates_tried(&self) -> usize {
        self.motion_candidates_tried
    }

    /// Returns the time spent sampling and checking feasibility.
    #[must_use]
    pub const fn sampling_elapsed(&self) -> Duration {
        self.sampling_elapsed
    }

    /// Returns the time spent in motion planning.
    #[must_use]
    pub const fn motion_elapsed(&self) -> Duration {
        self.motion_elapsed
    }

    /// Returns the total time of the call.
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.sampling_elapsed + self.motion_elapsed
    }
}
