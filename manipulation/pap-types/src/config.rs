//! Configuration for the generator and its motion-planning schedule.
//!
//! # Example
//!
//! ```
//! use pap_types::{GeneratorConfig, IterationSchedule};
//!
//! let config = GeneratorConfig::default()
//!     .with_n_iter_limit(500)
//!     .with_fan_out(5)
//!     .with_schedule(IterationSchedule::new(vec![50, 200]).unwrap());
//!
//! assert!(config.validate().is_empty());
//! ```

use crate::error::{PapError, PapResult};

/// Default escalating iteration budgets for a motion-planning request.
pub const DEFAULT_ITERATION_SCHEDULE: [usize; 5] = [20, 50, 100, 500, 1000];

/// An ordered list of increasing iteration budgets.
///
/// A planner is asked with each budget in turn, stopping at the first
/// success, so cheap attempts are always made before expensive ones.
///
/// # Example
///
/// ```
/// use pap_types::IterationSchedule;
///
/// let schedule = IterationSchedule::default();
/// assert_eq!(schedule.budgets(), &[20, 50, 100, 500, 1000]);
///
/// assert!(IterationSchedule::new(vec![100, 50]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<usize>", into = "Vec<usize>"))]
pub struct IterationSchedule {
    budgets: Vec<usize>,
}

impl IterationSchedule {
    /// Creates a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::InvalidConfig`] if the schedule is empty, contains
    /// a zero budget, or is not strictly increasing.
    pub fn new(budgets: Vec<usize>) -> PapResult<Self> {
        let issues = Self::check(&budgets);
        if !issues.is_empty() {
            return Err(PapError::invalid_config(issues.join("; ")));
        }
        Ok(Self { budgets })
    }

    fn check(budgets: &[usize]) -> Vec<String> {
        let mut issues = Vec::new();
        if budgets.is_empty() {
            issues.push("iteration schedule is empty".to_string());
        }
        if budgets.contains(&0) {
            issues.push("iteration schedule contains a zero budget".to_string());
        }
        if budgets.windows(2).any(|w| w[0] >= w[1]) {
            issues.push(format!(
                "iteration schedule {budgets:?} is not strictly increasing"
            ));
        }
        issues
    }

    /// Validates the schedule and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        Self::check(&self.budgets)
    }

    /// Returns the budgets in the order they are tried.
    #[must_use]
    pub fn budgets(&self) -> &[usize] {
        &self.budgets
    }

    /// Returns an iterator over the budgets.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.budgets.iter().copied()
    }

    /// Returns the largest budget.
    #[must_use]
    pub fn max_budget(&self) -> usize {
        self.budgets.last().copied().unwrap_or_default()
    }
}

impl TryFrom<Vec<usize>> for IterationSchedule {
    type Error = PapError;

    fn try_from(budgets: Vec<usize>) -> PapResult<Self> {
        Self::new(budgets)
    }
}

impl From<IterationSchedule> for Vec<usize> {
    fn from(schedule: IterationSchedule) -> Self {
        schedule.budgets
    }
}

impl Default for IterationSchedule {
    fn default() -> Self {
        Self {
            budgets: DEFAULT_ITERATION_SCHEDULE.to_vec(),
        }
    }
}

/// Configuration for a pick-and-place generator.
///
/// - `n_iter_limit`: hard ceiling on candidates drawn per call (must be > 0)
/// - `fan_out`: number of feasibility-verified candidates collected before
///   motion planning starts (`n_parameters_to_try_motion_planning`)
/// - `schedule`: escalating motion-planning budgets
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    n_iter_limit: usize,
    fan_out: usize,
    schedule: IterationSchedule,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    ///
    /// Defaults:
    /// - `n_iter_limit`: 2000
    /// - `fan_out`: 3
    /// - schedule: `[20, 50, 100, 500, 1000]`
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_iter_limit: 2000,
            fan_out: 3,
            schedule: IterationSchedule::default(),
        }
    }

    /// Sets the maximum number of draws per call.
    #[must_use]
    pub const fn with_n_iter_limit(mut self, limit: usize) -> Self {
        self.n_iter_limit = limit;
        self
    }

    /// Sets the number of verified candidates to collect before motion planning.
    #[must_use]
    pub const fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Sets the motion-planning iteration schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: IterationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Returns the maximum number of draws per call.
    #[must_use]
    pub const fn n_iter_limit(&self) -> usize {
        self.n_iter_limit
    }

    /// Returns the fan-out target.
    #[must_use]
    pub const fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Returns the iteration schedule.
    #[must_use]
    pub const fn schedule(&self) -> &IterationSchedule {
        &self.schedule
    }

    /// Validates the configuration and returns any issues.
    ///
    /// A zero fan-out is allowed: it makes every call return immediately.
    /// A fan-out above `n_iter_limit` is allowed too; the pool is then
    /// simply never filled and motion planning runs on whatever was found.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.n_iter_limit == 0 {
            issues.push("n_iter_limit must be positive".to_string());
        }
        issues.extend(self.schedule.validate());

        issues
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ==================== IterationSchedule Tests ====================

    #[test]
    fn test_schedule_default() {
        let schedule = IterationSchedule::default();
        assert_eq!(schedule.budgets(), &DEFAULT_ITERATION_SCHEDULE);
        assert_eq!(schedule.max_budget(), 1000);
        assert_eq!(schedule.iter().collect::<Vec<_>>(), vec![20, 50, 100, 500, 1000]);
    }

    #[test]
    fn test_schedule_rejects_invalid() {
        assert!(IterationSchedule::new(vec![]).is_err());
        assert!(IterationSchedule::new(vec![0, 10]).is_err());
        assert!(IterationSchedule::new(vec![10, 10]).is_err());
        assert!(IterationSchedule::new(vec![50, 20]).is_err());
    }

    #[test]
    fn test_schedule_reports_every_issue() {
        let issues = IterationSchedule::check(&[0, 0]);
        assert_eq!(issues.len(), 2);
        assert!(IterationSchedule::default().validate().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_schedule_deserialization_validates() {
        let parsed: Result<IterationSchedule, _> = serde_json::from_str("[10, 20]");
        assert_eq!(parsed.unwrap().budgets(), &[10, 20]);

        assert!(serde_json::from_str::<IterationSchedule>("[]").is_err());
        assert!(serde_json::from_str::<IterationSchedule>("[20, 10]").is_err());
    }

    #[test]
    fn test_schedule_single_budget() {
        let schedule = IterationSchedule::new(vec![300]).unwrap();
        assert_eq!(schedule.max_budget(), 300);
    }

    // ==================== GeneratorConfig Tests ====================

    #[test]
    fn test_config_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.n_iter_limit(), 2000);
        assert_eq!(config.fan_out(), 3);
        assert_eq!(config.schedule(), &IterationSchedule::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new()
            .with_n_iter_limit(50)
            .with_fan_out(10)
            .with_schedule(IterationSchedule::new(vec![5, 10]).unwrap());
        assert_eq!(config.n_iter_limit(), 50);
        assert_eq!(config.fan_out(), 10);
        assert_eq!(config.schedule().budgets(), &[5, 10]);
    }

    #[test]
    fn test_config_zero_iter_limit() {
        let issues = GeneratorConfig::new().with_n_iter_limit(0).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("n_iter_limit"));
    }

    #[test]
    fn test_config_reports_invalid_schedule() {
        let config = GeneratorConfig::new().with_schedule(IterationSchedule {
            budgets: Vec::new(),
        });
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("empty"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_deserialization_rejects_empty_schedule() {
        let json = r#"{"n_iter_limit": 10, "fan_out": 1, "schedule": []}"#;
        assert!(serde_json::from_str::<GeneratorConfig>(json).is_err());

        let json = r#"{"n_iter_limit": 10, "fan_out": 1, "schedule": [5, 50]}"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_zero_fan_out_is_valid() {
        let config = GeneratorConfig::new().with_fan_out(0);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_fan_out_above_limit_is_valid() {
        let config = GeneratorConfig::new().with_n_iter_limit(2).with_fan_out(3);
        assert!(config.validate().is_empty());
    }
}
