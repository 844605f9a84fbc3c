//! Goal-biased RRT over robot base configurations.
//!
//! The tree grows from the robot's current configuration. After every new
//! node the planner tries a straight, collision-checked connection to each
//! goal; the first connection found ends the search. Segments are checked
//! by interpolating at a fixed resolution and querying the world.
//!
//! # Example
//!
//! ```
//! use pap_generator::motion::MotionPlanner;
//! use pap_generator::planar::PlanarWorld;
//! use pap_generator::rrt::{RrtConfig, RrtPlanner};
//! use pap_types::{Configuration, ParamDomain};
//!
//! let bounds = ParamDomain::new(vec![-5.0, -5.0, -3.2], vec![5.0, 5.0, 3.2]).unwrap();
//! let mut planner = RrtPlanner::new(RrtConfig::new(bounds).with_seed(1)).unwrap();
//! let mut world = PlanarWorld::new();
//!
//! let goal = Configuration::from_row_slice(&[2.0, 1.0, 0.0]);
//! let path = planner.plan_with_budget(&mut world, &[goal], 10).unwrap();
//! assert_eq!(path.len(), 2);
//! ```

use pap_types::{Configuration, PapError, PapResult, ParamDomain, Trajectory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::motion::MotionPlanner;
use crate::world::{RestoreGuard, World};

/// RRT parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RrtConfig {
    bounds: ParamDomain,
    step_size: f64,
    goal_bias: f64,
    resolution: f64,
    seed: Option<u64>,
}

impl RrtConfig {
    /// Creates a configuration sampling within `bounds`.
    #[must_use]
    pub const fn new(bounds: ParamDomain) -> Self {
        Self {
            bounds,
            step_size: 0.5,
            goal_bias: 0.1,
            resolution: 0.05,
            seed: None,
        }
    }

    /// Sets the maximum extension per iteration.
    #[must_use]
    pub const fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the probability of sampling a goal instead of a random configuration.
    #[must_use]
    pub const fn with_goal_bias(mut self, goal_bias: f64) -> Self {
        self.goal_bias = goal_bias;
        self
    }

    /// Sets the interpolation step used for segment collision checks.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Fixes the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the sampling bounds.
    #[must_use]
    pub const fn bounds(&self) -> &ParamDomain {
        &self.bounds
    }

    /// Returns the step size.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the goal bias.
    #[must_use]
    pub const fn goal_bias(&self) -> f64 {
        self.goal_bias
    }

    /// Returns the collision-check resolution.
    #[must_use]
    pub const fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty list if valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.step_size <= 0.0 || !self.step_size.is_finite() {
            errors.push("step_size must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.goal_bias) {
            errors.push("goal_bias must be in [0, 1]".to_string());
        }
        if self.resolution <= 0.0 || !self.resolution.is_finite() {
            errors.push("resolution must be positive".to_string());
        }
        errors
    }
}

struct Node {
    config: Configuration,
    parent: Option<usize>,
}

/// Rapidly-exploring random tree planner.
#[derive(Debug, Clone)]
pub struct RrtPlanner {
    config: RrtConfig,
    rng: StdRng,
}

impl RrtPlanner {
    /// Creates a planner; seeded from the config or from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: RrtConfig) -> PapResult<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(PapError::invalid_config(errors.join("; ")));
        }
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(Self { config, rng })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RrtConfig {
        &self.config
    }

    fn sample(&mut self, goals: &[Configuration]) -> Configuration {
        if self.rng.gen_range(0.0..1.0) < self.config.goal_bias {
            let i = self.rng.gen_range(0..goals.len());
            return goals[i].clone();
        }
        let bounds = &self.config.bounds;
        let values: Vec<f64> = bounds
            .lower()
            .iter()
            .zip(bounds.upper())
            .map(|(&lo, &hi)| if lo < hi { self.rng.gen_range(lo..hi) } else { lo })
            .collect();
        Configuration::from_vec(values)
    }

    fn steer(&self, from: &Configuration, toward: &Configuration) -> Configuration {
        let delta = toward - from;
        let distance = delta.norm();
        if distance <= self.config.step_size {
            toward.clone()
        } else {
            from + delta * (self.config.step_size / distance)
        }
    }

    fn in_collision<W: World + ?Sized>(world: &mut W, config: &Configuration) -> bool {
        world.set_robot_configuration(config);
        world.check_collision()
    }

    /// Checks the segment `from -> to`, excluding `from`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn segment_free<W: World + ?Sized>(
        &self,
        world: &mut W,
        from: &Configuration,
        to: &Configuration,
    ) -> bool {
        let steps = ((to - from).norm() / self.config.resolution).ceil().max(1.0) as usize;
        (1..=steps).all(|i| {
            let t = i as f64 / steps as f64;
            !Self::in_collision(world, &from.lerp(to, t))
        })
    }

    /// Tries a direct connection from `node` to each goal in order.
    fn connect<W: World + ?Sized>(
        &self,
        world: &mut W,
        node: &Configuration,
        goals: &[Configuration],
    ) -> Option<usize> {
        goals
            .iter()
            .position(|goal| self.segment_free(world, node, goal))
    }
}

fn extract_path(tree: &[Node], leaf: usize, goal: Configuration) -> Option<Trajectory> {
    let mut waypoints = vec![goal];
    let mut current = Some(leaf);
    while let Some(i) = current {
        waypoints.push(tree[i].config.clone());
        current = tree[i].parent;
    }
    waypoints.reverse();
    Trajectory::new(waypoints)
}

fn nearest_node(tree: &[Node], target: &Configuration) -> usize {
    tree.iter()
        .enumerate()
        .map(|(i, n)| (i, (&n.config - target).norm()))
        .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
        .0
}

impl<W: World + ?Sized> MotionPlanner<W> for RrtPlanner {
    fn plan_with_budget(
        &mut self,
        world: &mut W,
        goals: &[Configuration],
        iterations: usize,
    ) -> Option<Trajectory> {
        let dim = self.config.bounds.dim();
        let start = world.robot_configuration();
        if start.len() != dim || goals.iter().any(|g| g.len() != dim) {
            warn!(
                expected = dim,
                start = start.len(),
                "Configuration dimension does not match planner bounds"
            );
            return None;
        }

        let mut guard = RestoreGuard::new(world);
        let reachable: Vec<Configuration> = goals
            .iter()
            .filter(|g| !Self::in_collision(&mut *guard, g))
            .cloned()
            .collect();
        if reachable.is_empty() {
            debug!(goals = goals.len(), "Every goal is in collision");
            return None;
        }
        if Self::in_collision(&mut *guard, &start) {
            debug!("Start configuration is in collision");
            return None;
        }

        let mut tree = vec![Node {
            config: start,
            parent: None,
        }];
        if let Some(g) = self.connect(&mut *guard, &tree[0].config, &reachable) {
            return extract_path(&tree, 0, reachable[g].clone());
        }

        for _ in 0..iterations {
            let target = self.sample(&reachable);
            let near = nearest_node(&tree, &target);
            let new = self.steer(&tree[near].config, &target);
            if !self.segment_free(&mut *guard, &tree[near].config, &new) {
                continue;
            }
            tree.push(Node {
                config: new,
                parent: Some(near),
            });
            let leaf = tree.len() - 1;
            if let Some(g) = self.connect(&mut *guard, &tree[leaf].config, &reachable) {
                debug!(nodes = tree.len(), "RRT connected to goal");
                return extract_path(&tree, leaf, reachable[g].clone());
            }
        }
        None
    }
}
