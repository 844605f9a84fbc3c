//! Motion planning capability and escalating-budget planning.
//!
//! A [`MotionPlanner`] only has to implement
//! [`plan_with_budget`](MotionPlanner::plan_with_budget). The provided
//! [`plan`](MotionPlanner::plan) retries with each budget of an
//! [`IterationSchedule`] in turn, stopping at the first success, and reports
//! which goal the trajectory reached.
//!
//! # Example
//!
//! ```
//! use pap_generator::motion::{MotionPlanner, nearest_goal};
//! use pap_generator::planar::PlanarWorld;
//! use pap_generator::world::World;
//! use pap_types::{Configuration, IterationSchedule, Trajectory};
//!
//! /// Teleports once the budget reaches 50 iterations.
//! struct Teleport;
//!
//! impl MotionPlanner<PlanarWorld> for Teleport {
//!     fn plan_with_budget(
//!         &mut self,
//!         world: &mut PlanarWorld,
//!         goals: &[Configuration],
//!         iterations: usize,
//!     ) -> Option<Trajectory> {
//!         (iterations >= 50).then(|| {
//!             Trajectory::new(vec![world.robot_configuration(), goals[0].clone()])
//!         })?
//!     }
//! }
//!
//! let mut world = PlanarWorld::new();
//! let goal = Configuration::from_row_slice(&[1.0, 2.0, 0.0]);
//! let plan = Teleport
//!     .plan(&mut world, &[goal], &IterationSchedule::default())
//!     .unwrap();
//! assert_eq!(plan.budget, 50);
//! assert_eq!(plan.attempts, 2);
//! ```

use pap_types::{Configuration, IterationSchedule, Trajectory};
use tracing::debug;

use crate::world::World;

/// A trajectory found under an escalation schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPlan {
    /// The planned trajectory.
    pub trajectory: Trajectory,
    /// Index of the goal nearest to the trajectory's final configuration.
    pub goal_index: usize,
    /// Iteration budget of the successful attempt.
    pub budget: usize,
    /// Number of budgets tried, the successful one included.
    pub attempts: usize,
}

/// Finds collision-free trajectories from the robot's current configuration.
pub trait MotionPlanner<W: World + ?Sized> {
    /// Plans to any of `goals` within `iterations` planner iterations.
    ///
    /// Implementations must leave `world` as they found it.
    fn plan_with_budget(
        &mut self,
        world: &mut W,
        goals: &[Configuration],
        iterations: usize,
    ) -> Option<Trajectory>;

    /// Plans with each budget of `schedule` in order, stopping at the first success.
    fn plan(
        &mut self,
        world: &mut W,
        goals: &[Configuration],
        schedule: &IterationSchedule,
    ) -> Option<MotionPlan> {
        if goals.is_empty() {
            return None;
        }
        for (i, budget) in schedule.iter().enumerate() {
            if let Some(trajectory) = self.plan_with_budget(world, goals, budget) {
                let goal_index = nearest_goal(trajectory.last(), goals)?;
                return Some(MotionPlan {
                    trajectory,
                    goal_index,
                    budget,
                    attempts: i + 1,
                });
            }
            debug!(budget, goals = goals.len(), "No motion within budget");
        }
        None
    }
}

impl<W: World + ?Sized, P: MotionPlanner<W> + ?Sized> MotionPlanner<W> for &mut P {
    fn plan_with_budget(
        &mut self,
        world: &mut W,
        goals: &[Configuration],
        iterations: usize,
    ) -> Option<Trajectory> {
        (**self).plan_with_budget(world, goals, iterations)
    }

    fn plan(
        &mut self,
        world: &mut W,
        goals: &[Configuration],
        schedule: &IterationSchedule,
    ) -> Option<MotionPlan> {
        (**self).plan(world, goals, schedule)
    }
}

/// Returns the index of the goal closest to `endpoint`.
///
/// Distance is Euclidean; goals of a different dimension are infinitely far.
/// Ties go to the lowest index. Returns `None` only when `goals` is empty.
///
/// # Example
///
/// ```
/// use pap_generator::motion::nearest_goal;
/// use pap_types::Configuration;
///
/// let end = Configuration::from_row_slice(&[1.0, 0.0, 0.0]);
/// let goals = [
///     Configuration::from_row_slice(&[3.0, 0.0, 0.0]),
///     Configuration::from_row_slice(&[1.1, 0.0, 0.0]),
/// ];
/// assert_eq!(nearest_goal(&end, &goals), Some(1));
/// ```
#[must_use]
pub fn nearest_goal(endpoint: &Configuration, goals: &[Configuration]) -> Option<usize> {
    let distance = |goal: &Configuration| {
        if goal.len() == endpoint.len() {
            (goal - endpoint).norm()
        } else {
            f64::INFINITY
        }
    };

    let mut best: Option<(usize, f64)> = None;
    for (i, goal) in goals.iter().enumerate() {
        let d = distance(goal);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
