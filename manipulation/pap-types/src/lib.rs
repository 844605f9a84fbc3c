//! Core types for pick-and-place operator parameter generation.
//!
//! This crate provides the data model shared by samplers, feasibility
//! checkers, motion planners and the generator that coordinates them.
//!
//! # Overview
//!
//! - **Actions**: symbolic steps naming an object and a region ([`AbstractAction`])
//! - **Candidates**: raw sampler output and its domain ([`RawCandidate`], [`ParamDomain`])
//! - **Parameters**: verified pick/place parameters and final operators
//!   ([`OperatorParameters`], [`FeasibleOperator`], [`Trajectory`])
//! - **Outcomes**: feasibility statuses, failure reasons and the append-only
//!   attempt log ([`FeasibilityStatus`], [`AttemptLabel`], [`AttemptLog`])
//! - **Configuration**: generator budgets and the escalating motion-planning
//!   schedule ([`GeneratorConfig`], [`IterationSchedule`])
//! - **Diagnostics**: cross-call counters and per-call statistics
//!   ([`GenerationCounters`], [`GenerationStats`])
//!
//! # Example
//!
//! ```
//! use pap_types::{
//!     AbstractAction, AttemptLabel, AttemptLog, BasePose, GeneratorConfig, GraspParams,
//!     RawCandidate,
//! };
//!
//! let action = AbstractAction::pick_and_place("box", "home_region");
//! let config = GeneratorConfig::default().with_fan_out(5);
//! assert!(config.validate().is_empty());
//!
//! let raw = RawCandidate::from_parts(
//!     GraspParams::new(0.0, 0.5, 0.5),
//!     BasePose::new(1.0, 0.0, 0.0),
//!     BasePose::new(3.0, 3.0, 0.0),
//! );
//! let mut log = AttemptLog::new();
//! log.record(raw, AttemptLabel::PickInfeasible);
//! assert_eq!(log.attempt_count(), 1);
//! # let _ = action;
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![doc(html_root_url = "https://docs.rs/pap-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod action;
pub mod candidate;
pub mod config;
pub mod error;
pub mod geometry;
pub mod outcome;
pub mod params;
pub mod stats;

pub use action::{AbstractAction, ActionKind, ObjectId, RegionId};
pub use candidate::{
    BASE_POSE_DIM, BasePose, CANDIDATE_DIM, Configuration, GRASP_DIM, GraspParams, PICK_DIM,
    PLACE_DIM, ParamDomain, RawCandidate,
};
pub use config::{DEFAULT_ITERATION_SCHEDULE, GeneratorConfig, IterationSchedule};
pub use error::{PapError, PapResult};
pub use geometry::Aabb;
pub use outcome::{
    AttemptId, AttemptLabel, AttemptLog, AttemptRecord, FeasibilityStatus, PickFailure,
    PlaceFailure,
};
pub use params::{
    FeasibleOperator, GenerationOutcome, InfeasibleReason, OperatorParameters, PickParameters,
    PlaceParameters, Trajectory,
};
pub use stats::{GenerationCounters, GenerationStats};
