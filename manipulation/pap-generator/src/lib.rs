//! Pick-and-place operator parameter generation.
//!
//! Given an abstract pick-and-place action, a [`Generator`] searches for
//! continuous parameters (grasp, pick base pose, place base pose) together
//! with collision-free motions that realise the action in a simulated world.
//!
//! # Pipeline
//!
//! 1. A [`Sampler`] proposes raw candidates.
//! 2. A [`FeasibilityChecker`] verifies each candidate kinematically and
//!    against collisions, in two stages: pick, then place.
//! 3. A [`MotionPlanner`] plans the pick motion and then the place motion
//!    for verified candidates, escalating its iteration budget.
//!
//! All three capabilities take the [`World`] explicitly. Every probe runs
//! under scoped guards ([`RestoreGuard`], [`PickGuard`], [`PlaceGuard`]) so
//! the world is left unchanged on every exit path.
//!
//! # Reference implementations
//!
//! - [`UniformSampler`] and [`LearnedSampler`]
//! - [`PickAndPlaceChecker`] with a [`GraspSolver`]
//! - [`RrtPlanner`], a goal-biased RRT
//! - [`PlanarWorld`] and [`ReachGraspSolver`], a planar mobile manipulator
//!
//! # Example
//!
//! ```
//! use pap_generator::{
//!     Generator, PickAndPlaceChecker, PlanarWorld, ReachGraspSolver, RrtConfig, RrtPlanner,
//!     UniformSampler,
//! };
//! use pap_types::{Aabb, AbstractAction, GeneratorConfig, ParamDomain};
//!
//! let mut world = PlanarWorld::new()
//!     .with_region("entire_region", Aabb::new([-5.0, -5.0, 0.0].into(), [5.0, 5.0, 2.0].into()))
//!     .with_region("home_region", Aabb::new([1.0, 1.0, 0.0].into(), [4.0, 4.0, 2.0].into()))
//!     .with_object("box", Aabb::new([1.8, -0.2, 0.0].into(), [2.2, 0.2, 0.4].into()));
//!
//! let pick = ParamDomain::new(
//!     vec![0.0, 0.0, 0.0, 0.5, -1.0, -0.1],
//!     vec![1.0, 1.0, 1.0, 1.5, 1.0, 0.1],
//! )
//! .unwrap();
//! let place = ParamDomain::new(vec![0.5, 1.5, -0.1], vec![2.5, 3.0, 0.1]).unwrap();
//! let bounds = ParamDomain::new(vec![-5.0, -5.0, -3.2], vec![5.0, 5.0, 3.2]).unwrap();
//!
//! let mut generator = Generator::new(
//!     AbstractAction::pick_and_place("box", "home_region"),
//!     UniformSampler::from_domains(&pick, &place).unwrap().with_seed(7),
//!     PickAndPlaceChecker::new(ReachGraspSolver::default()),
//!     RrtPlanner::new(RrtConfig::new(bounds).with_seed(7)).unwrap(),
//!     GeneratorConfig::default(),
//! )
//! .unwrap();
//!
//! // Kinematic check only.
//! let outcome = generator.sample_next_point(&mut world, true).unwrap();
//! assert!(outcome.is_feasible());
//! assert!(!outcome.operator().unwrap().has_motions());
//! ```

#![doc(html_root_url = "https://docs.rs/pap-generator/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod feasibility;
pub mod generator;
pub mod motion;
pub mod planar;
pub mod rrt;
pub mod sampler;
pub mod world;

pub use feasibility::{
    DEFAULT_OPERATING_REGION, FeasibilityChecker, FeasibilityOutcome, GraspSolver,
    PickAndPlaceChecker,
};
pub use generator::Generator;
pub use motion::{MotionPlan, MotionPlanner, nearest_goal};
pub use planar::{PlanarWorld, ReachGraspSolver};
pub use rrt::{RrtConfig, RrtPlanner};
pub use sampler::{GenerativeModel, LearnedSampler, Sampler, UniformSampler};
pub use world::{PickGuard, PlaceGuard, RestoreGuard, World, WorldSnapshot};
