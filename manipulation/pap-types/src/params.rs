//! Verified operator parameters, trajectories and generation results.

use crate::candidate::{BasePose, Configuration, GraspParams, RawCandidate};
use crate::error::{PapError, PapResult};
use crate::outcome::{AttemptId, FeasibilityStatus};

/// An ordered, non-empty sequence of robot configurations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Configuration>", into = "Vec<Configuration>")
)]
pub struct Trajectory {
    waypoints: Vec<Configuration>,
}

impl Trajectory {
    /// Creates a trajectory, returning `None` if `waypoints` is empty.
    #[must_use]
    pub fn new(waypoints: Vec<Configuration>) -> Option<Self> {
        if waypoints.is_empty() {
            None
        } else {
            Some(Self { waypoints })
        }
    }

    /// Returns the waypoints in order.
    #[must_use]
    pub fn waypoints(&self) -> &[Configuration] {
        &self.waypoints
    }

    /// Returns the first configuration.
    #[must_use]
    pub fn first(&self) -> &Configuration {
        &self.waypoints[0]
    }

    /// Returns the final configuration.
    #[must_use]
    pub fn last(&self) -> &Configuration {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Returns the number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; trajectories hold at least one waypoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Returns the summed Euclidean length between consecutive waypoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| (&w[1] - &w[0]).norm())
            .sum()
    }
}

impl TryFrom<Vec<Configuration>> for Trajectory {
    type Error = PapError;

    fn try_from(waypoints: Vec<Configuration>) -> PapResult<Self> {
        Self::new(waypoints).ok_or(PapError::EmptyTrajectory)
    }
}

impl From<Trajectory> for Vec<Configuration> {
    fn from(trajectory: Trajectory) -> Self {
        trajectory.waypoints
    }
}

/// Parameters of a kinematically verified pick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickParameters {
    /// Grasp parameters relative to the object.
    pub grasp: GraspParams,
    /// Base pose from which the grasp is executed.
    pub base_pose: BasePose,
    /// Solved arm configuration for the grasp.
    pub grasp_config: Configuration,
}

impl PickParameters {
    /// Returns the motion-planning goal (the pick base configuration).
    #[must_use]
    pub fn goal(&self) -> Configuration {
        self.base_pose.to_configuration()
    }
}

/// Parameters of a verified placement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceParameters {
    /// Base pose at which the held object is released.
    pub base_pose: BasePose,
}

impl PlaceParameters {
    /// Returns the motion-planning goal (the place base configuration).
    #[must_use]
    pub fn goal(&self) -> Configuration {
        self.base_pose.to_configuration()
    }
}

/// Structured result of a successful feasibility check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorParameters {
    /// Verified pick.
    pub pick: PickParameters,
    /// Verified place.
    pub place: PlaceParameters,
    /// The raw candidate these parameters were derived from.
    pub raw: RawCandidate,
    /// Feasibility tag assigned by the checker.
    pub status: FeasibilityStatus,
}

/// A fully resolved pick-and-place operator.
///
/// Motions are `None` only when the generator was asked to skip motion
/// verification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeasibleOperator {
    /// Verified pick.
    pub pick: PickParameters,
    /// Trajectory from the starting configuration to the pick goal.
    pub pick_motion: Option<Trajectory>,
    /// Verified place.
    pub place: PlaceParameters,
    /// Trajectory from the pick goal to the place goal, object held.
    pub place_motion: Option<Trajectory>,
    /// The raw candidate the operator was derived from.
    pub raw: RawCandidate,
    /// The attempt that produced this operator.
    pub attempt: AttemptId,
}

impl FeasibleOperator {
    /// Returns `true` if both motions were verified.
    #[must_use]
    pub const fn has_motions(&self) -> bool {
        self.pick_motion.is_some() && self.place_motion.is_some()
    }
}

/// Why a generation call produced no operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfeasibleReason {
    /// No sampled candidate passed the feasibility check.
    NoSolution,
    /// Candidates passed the check but none had both motions.
    NoFeasibleMotion {
        /// Candidates rejected for lack of a pick motion.
        pick_failures: usize,
        /// Candidates rejected for lack of a place motion.
        place_failures: usize,
    },
}

/// The tagged result of one generation call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationOutcome {
    /// A verified operator was found.
    Feasible(FeasibleOperator),
    /// No operator could be found within budget.
    Infeasible(InfeasibleReason),
}

impl GenerationOutcome {
    /// Returns `true` if an operator was found.
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }

    /// Returns the operator, if any.
    #[must_use]
    pub const fn operator(&self) -> Option<&FeasibleOperator> {
        match self {
            Self::Feasible(op) => Some(op),
            Self::Infeasible(_) => None,
        }
    }

    /// Consumes the outcome and returns the operator, if any.
    #[must_use]
    pub fn into_operator(self) -> Option<FeasibleOperator> {
        match self {
            Self::Feasible(op) => Some(op),
            Self::Infeasible(_) => None,
        }
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub const fn infeasible_reason(&self) -> Option<InfeasibleReason> {
        match self {
            Self::Feasible(_) => None,
            Self::Infeasible(reason) => Some(*reason),
        }
    }
}
