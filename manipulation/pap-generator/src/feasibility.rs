//! Staged kinematic and collision verification of raw candidates.
//!
//! [`PickAndPlaceChecker`] runs two stages per candidate:
//!
//! 1. **Pick**: the base pose must be collision-free, the grasp must have an
//!    IK solution, and in the grasp configuration the robot must be
//!    collision-free and inside the operating region.
//! 2. **Place** (only after a feasible pick): with the pick executed, the
//!    robot carrying the object must be collision-free at the place base
//!    pose, and the released object must lie inside the target region.
//!
//! Every stage runs under [`RestoreGuard`]s, so the world is left exactly as
//! it was found on every exit path.

use pap_types::{
    AbstractAction, BasePose, Configuration, FeasibilityStatus, GraspParams, ObjectId,
    OperatorParameters, PickFailure, PickParameters, PlaceFailure, PlaceParameters,
    RawCandidate, RegionId,
};
use tracing::debug;

use crate::world::{PickGuard, PlaceGuard, RestoreGuard, World};

/// Region the robot must stay inside while grasping, unless configured otherwise.
pub const DEFAULT_OPERATING_REGION: &str = "entire_region";

/// Result of checking one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum FeasibilityOutcome {
    /// Both stages passed.
    Feasible(OperatorParameters),
    /// The pick stage failed.
    PickFailed(PickFailure),
    /// The place stage failed after a feasible pick.
    PlaceFailed(PlaceFailure),
}

impl FeasibilityOutcome {
    /// Returns the status tag of this outcome.
    #[must_use]
    pub const fn status(&self) -> FeasibilityStatus {
        match self {
            Self::Feasible(_) => FeasibilityStatus::HasSolution,
            Self::PickFailed(_) => FeasibilityStatus::PickFailed,
            Self::PlaceFailed(_) => FeasibilityStatus::PlaceFailed,
        }
    }

    /// Returns `true` if the candidate passed both stages.
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }
}

/// Verifies raw candidates against a world.
pub trait FeasibilityChecker<W: World + ?Sized> {
    /// Checks `raw` for `action`, leaving `world` unchanged.
    fn check_feasibility(
        &mut self,
        world: &mut W,
        action: &AbstractAction,
        raw: &RawCandidate,
    ) -> FeasibilityOutcome;
}

impl<W: World + ?Sized, C: FeasibilityChecker<W> + ?Sized> FeasibilityChecker<W> for &mut C {
    fn check_feasibility(
        &mut self,
        world: &mut W,
        action: &AbstractAction,
        raw: &RawCandidate,
    ) -> FeasibilityOutcome {
        (**self).check_feasibility(world, action, raw)
    }
}

/// Inverse kinematics and grasp geometry.
///
/// Solvers may toggle object collision flags or move the robot while
/// solving; callers run them under a [`RestoreGuard`].
pub trait GraspSolver<W: World + ?Sized> {
    /// Returns an arm configuration realising `grasp` on `object` from `base`,
    /// or `None` if no solution exists.
    fn solve_grasp(
        &mut self,
        world: &mut W,
        object: &ObjectId,
        grasp: &GraspParams,
        base: &BasePose,
    ) -> Option<Configuration>;
}

/// Two-stage pick-then-place feasibility checker.
#[derive(Debug, Clone)]
pub struct PickAndPlaceChecker<G> {
    solver: G,
    operating_region: RegionId,
}

impl<G> PickAndPlaceChecker<G> {
    /// Creates a checker around a grasp solver.
    ///
    /// The operating region defaults to [`DEFAULT_OPERATING_REGION`].
    #[must_use]
    pub fn new(solver: G) -> Self {
        Self {
            solver,
            operating_region: RegionId::new(DEFAULT_OPERATING_REGION),
        }
    }

    /// Sets the region the robot must stay inside while grasping.
    #[must_use]
    pub fn with_operating_region(mut self, region: impl Into<RegionId>) -> Self {
        self.operating_region = region.into();
        self
    }

    /// Returns the operating region.
    #[must_use]
    pub const fn operating_region(&self) -> &RegionId {
        &self.operating_region
    }

    /// Returns the grasp solver.
    #[must_use]
    pub const fn solver(&self) -> &G {
        &self.solver
    }

    fn check_pick<W>(
        &mut self,
        world: &mut W,
        object: &ObjectId,
        raw: &RawCandidate,
    ) -> Result<PickParameters, PickFailure>
    where
        W: World + ?Sized,
        G: GraspSolver<W>,
    {
        let grasp = raw.grasp();
        let base_pose = raw.pick_base_pose();

        let grasp_config = {
            let mut guard = RestoreGuard::new(world);
            guard.set_robot_configuration(&base_pose.to_configuration());
            if guard.check_collision() {
                return Err(PickFailure::BaseInCollision);
            }
            self.solver
                .solve_grasp(&mut *guard, object, &grasp, &base_pose)
                .ok_or(PickFailure::NoIkSolution)?
        };

        let pick = PickParameters {
            grasp,
            base_pose,
            grasp_config,
        };

        let mut guard = RestoreGuard::new(world);
        guard.set_robot_configuration(&pick.goal());
        let held = PickGuard::execute(&mut *guard, object, &pick);
        if !held.is_executed() {
            return Err(PickFailure::PickRefused);
        }
        if held.check_collision() {
            return Err(PickFailure::GraspInCollision);
        }
        if !held.region_contains(&self.operating_region, &held.robot_aabb()) {
            return Err(PickFailure::OutsideOperatingRegion);
        }
        Ok(pick)
    }

    fn check_place<W>(
        world: &mut W,
        action: &AbstractAction,
        pick: &PickParameters,
        raw: &RawCandidate,
    ) -> Result<PlaceParameters, PlaceFailure>
    where
        W: World + ?Sized,
    {
        let object = action.object();
        let place = PlaceParameters {
            base_pose: raw.place_base_pose(),
        };

        let mut guard = RestoreGuard::new(world);
        guard.set_robot_configuration(&pick.goal());
        let mut held = PickGuard::execute(&mut *guard, object, pick);
        if !held.is_executed() {
            return Err(PlaceFailure::PlaceRefused);
        }
        held.set_robot_configuration(&place.goal());
        if held.check_collision() {
            return Err(PlaceFailure::PlacementInCollision);
        }

        let placed = PlaceGuard::execute(&mut *held, object, &place);
        if !placed.is_executed() {
            return Err(PlaceFailure::PlaceRefused);
        }
        let inside = placed
            .object_aabb(object)
            .is_some_and(|aabb| placed.region_contains(action.region(), &aabb));
        if inside {
            Ok(place)
        } else {
            Err(PlaceFailure::OutsideTargetRegion)
        }
    }
}

impl<W, G> FeasibilityChecker<W> for PickAndPlaceChecker<G>
where
    W: World + ?Sized,
    G: GraspSolver<W>,
{
    fn check_feasibility(
        &mut self,
        world: &mut W,
        action: &AbstractAction,
        raw: &RawCandidate,
    ) -> FeasibilityOutcome {
        let pick = match self.check_pick(world, action.object(), raw) {
            Ok(pick) => pick,
            Err(reason) => {
                debug!(?reason, object = %action.object(), "Pick stage failed");
                return FeasibilityOutcome::PickFailed(reason);
            }
        };

        match Self::check_place(world, action, &pick, raw) {
            Ok(place) => FeasibilityOutcome::Feasible(OperatorParameters {
                pick,
                place,
                raw: raw.clone(),
                status: FeasibilityStatus::HasSolution,
            }),
            Err(reason) => {
                debug!(?reason, region = %action.region(), "Place stage failed");
                FeasibilityOutcome::PlaceFailed(reason)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::planar::{PlanarWorld, ReachGraspSolver};
    use pap_types::Aabb;

    /// Robot at the origin, a box at (3, 0), a target region around (6, 4).
    fn scene() -> PlanarWorld {
        PlanarWorld::new()
            .with_region(
                DEFAULT_OPERATING_REGION,
                Aabb::new([-10.0, -10.0, 0.0].into(), [10.0, 10.0, 2.0].into()),
            )
            .with_region(
                "home_region",
                Aabb::new([5.0, 3.0, 0.0].into(), [8.0, 6.0, 2.0].into()),
            )
            .with_object(
                "box",
                Aabb::new([2.8, -0.2, 0.0].into(), [3.2, 0.2, 0.4].into()),
            )
            .with_object(
                "wall",
                Aabb::new([-3.0, 2.0, 0.0].into(), [-2.0, 6.0, 1.0].into()),
            )
    }

    fn checker() -> PickAndPlaceChecker<ReachGraspSolver> {
        PickAndPlaceChecker::new(ReachGraspSolver::default())
    }

    fn action() -> AbstractAction {
        AbstractAction::pick_and_place("box", "home_region")
    }

    /// Picks the box from 1m to its left; places with the base at `place`.
    fn candidate(pick_base: BasePose, place: BasePose) -> RawCandidate {
        RawCandidate::from_parts(GraspParams::new(0.0, 0.5, 0.5), pick_base, place)
    }

    fn good_candidate() -> RawCandidate {
        // Held object sits 1m ahead of the base, so it lands at (6.5, 4.5).
        candidate(BasePose::new(2.0, 0.0, 0.0), BasePose::new(5.5, 4.5, 0.0))
    }

    #[test]
    fn test_feasible_candidate() {
        let mut world = scene();
        let outcome = checker().check_feasibility(&mut world, &action(), &good_candidate());

        assert_eq!(outcome.status(), FeasibilityStatus::HasSolution);
        let FeasibilityOutcome::Feasible(params) = outcome else {
            panic!("expected a feasible outcome");
        };
        assert_eq!(params.raw, good_candidate());
        assert_eq!(params.pick.base_pose, BasePose::new(2.0, 0.0, 0.0));
        assert_eq!(params.place.base_pose, BasePose::new(5.5, 4.5, 0.0));
        assert_eq!(params.status, FeasibilityStatus::HasSolution);
    }

    #[test]
    fn test_base_in_collision() {
        let mut world = scene();
        let raw = candidate(BasePose::new(-2.5, 4.0, 0.0), BasePose::new(5.5, 4.5, 0.0));
        let outcome = checker().check_feasibility(&mut world, &action(), &raw);
        assert_eq!(
            outcome,
            FeasibilityOutcome::PickFailed(PickFailure::BaseInCollision)
        );
    }

    #[test]
    fn test_out_of_reach_has_no_ik() {
        let mut world = scene();
        let raw = candidate(BasePose::new(-4.0, -4.0, 0.0), BasePose::new(5.5, 4.5, 0.0));
        let outcome = checker().check_feasibility(&mut world, &action(), &raw);
        assert_eq!(
            outcome,
            FeasibilityOutcome::PickFailed(PickFailure::NoIkSolution)
        );
    }

    #[test]
    fn test_outside_operating_region() {
        let mut world = scene();
        let mut checker = checker().with_operating_region("home_region");
        let outcome = checker.check_feasibility(&mut world, &action(), &good_candidate());
        assert_eq!(
            outcome,
            FeasibilityOutcome::PickFailed(PickFailure::OutsideOperatingRegion)
        );
    }

    #[test]
    fn test_placement_in_collision() {
        let mut world = scene();
        // Base lands inside the wall.
        let raw = candidate(BasePose::new(2.0, 0.0, 0.0), BasePose::new(-2.5, 3.0, 0.0));
        let outcome = checker().check_feasibility(&mut world, &action(), &raw);
        assert_eq!(
            outcome,
            FeasibilityOutcome::PlaceFailed(PlaceFailure::PlacementInCollision)
        );
    }

    #[test]
    fn test_placement_outside_region() {
        let mut world = scene();
        let raw = candidate(BasePose::new(2.0, 0.0, 0.0), BasePose::new(0.0, -5.0, 0.0));
        let outcome = checker().check_feasibility(&mut world, &action(), &raw);
        assert_eq!(
            outcome,
            FeasibilityOutcome::PlaceFailed(PlaceFailure::OutsideTargetRegion)
        );
    }

    #[test]
    fn test_world_unchanged_for_every_outcome() {
        let raws = [
            good_candidate(),
            candidate(BasePose::new(-2.5, 4.0, 0.0), BasePose::new(5.5, 4.5, 0.0)),
            candidate(BasePose::new(-4.0, -4.0, 0.0), BasePose::new(5.5, 4.5, 0.0)),
            candidate(BasePose::new(2.0, 0.0, 0.0), BasePose::new(-2.5, 3.0, 0.0)),
            candidate(BasePose::new(2.0, 0.0, 0.0), BasePose::new(0.0, -5.0, 0.0)),
        ];
        let mut world = scene();
        world.enable_object(&ObjectId::new("wall"), false);
        let before = world.clone();

        let mut checker = checker();
        for raw in &raws {
            checker.check_feasibility(&mut world, &action(), raw);
            assert_eq!(world, before);
        }
    }

    #[test]
    fn test_already_holding_target_is_refused() {
        let mut world = scene();
        let object = ObjectId::new("box");
        let pick = PickParameters {
            grasp: GraspParams::new(0.0, 0.5, 0.5),
            base_pose: BasePose::new(2.0, 0.0, 0.0),
            grasp_config: Configuration::from_row_slice(&[0.0, 0.2, 1.0]),
        };
        world.set_robot_configuration(&pick.goal());
        assert!(world.execute_pick(&object, &pick));
        let before = world.clone();

        let outcome = checker().check_feasibility(&mut world, &action(), &good_candidate());

        assert_eq!(
            outcome,
            FeasibilityOutcome::PickFailed(PickFailure::PickRefused)
        );
        assert_eq!(world, before);
        assert_eq!(world.held_object(), Some(&object));
    }
}
