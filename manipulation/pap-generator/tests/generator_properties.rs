//! Property-based and behavioural tests for the generator pipeline.
//!
//! Capabilities are replaced by scripted stand-ins so each property can be
//! observed directly: which candidates reach motion planning, which budgets
//! the planner sees, and whether the world is left untouched.
//!
//! Run with: cargo test -p pap-generator --test generator_properties

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use pap_generator::{
    FeasibilityChecker, FeasibilityOutcome, Generator, MotionPlanner, PickAndPlaceChecker,
    PlanarWorld, ReachGraspSolver, Sampler, World,
};
use pap_types::{
    Aabb, AbstractAction, AttemptLabel, BasePose, Configuration, FeasibilityStatus,
    GeneratorConfig, GraspParams, InfeasibleReason, IterationSchedule, ObjectId,
    OperatorParameters, PapResult, PickFailure, PickParameters, PlaceFailure, PlaceParameters,
    RawCandidate, RegionId, Trajectory,
};
use proptest::prelude::*;

// =============================================================================
// Scripted capabilities
// =============================================================================

const PICK_FAILS: f64 = 0.0;
const PLACE_FAILS: f64 = 1.0;
const FEASIBLE: f64 = 2.0;

/// A candidate whose grasp angle encodes its scripted outcome and whose
/// pick base x-coordinate identifies it.
fn candidate(code: f64, id: usize) -> RawCandidate {
    #[allow(clippy::cast_precision_loss)]
    let x = id as f64;
    RawCandidate::from_parts(
        GraspParams::new(code, 0.5, 0.5),
        BasePose::new(x, 0.0, 0.0),
        BasePose::new(x, 1.0, 0.0),
    )
}

/// Replays a script cyclically, counting draws.
struct ScriptedSampler {
    script: Vec<RawCandidate>,
    drawn: usize,
}

impl ScriptedSampler {
    fn new(script: Vec<RawCandidate>) -> Self {
        Self { script, drawn: 0 }
    }
}

impl Sampler for ScriptedSampler {
    fn draw(&mut self) -> PapResult<RawCandidate> {
        let raw = self.script[self.drawn % self.script.len()].clone();
        self.drawn += 1;
        Ok(raw)
    }
}

/// Decides feasibility from the grasp angle alone.
struct ScriptedChecker;

impl<W: World + ?Sized> FeasibilityChecker<W> for ScriptedChecker {
    fn check_feasibility(
        &mut self,
        _world: &mut W,
        _action: &AbstractAction,
        raw: &RawCandidate,
    ) -> FeasibilityOutcome {
        let code = raw.grasp().theta;
        if code == PICK_FAILS {
            return FeasibilityOutcome::PickFailed(PickFailure::BaseInCollision);
        }
        if code == PLACE_FAILS {
            return FeasibilityOutcome::PlaceFailed(PlaceFailure::PlacementInCollision);
        }
        FeasibilityOutcome::Feasible(OperatorParameters {
            pick: PickParameters {
                grasp: raw.grasp(),
                base_pose: raw.pick_base_pose(),
                grasp_config: Configuration::zeros(3),
            },
            place: PlaceParameters {
                base_pose: raw.place_base_pose(),
            },
            raw: raw.clone(),
            status: FeasibilityStatus::HasSolution,
        })
    }
}

/// A world with no geometry that only tracks state and whether it holds something.
#[derive(Debug, Clone, PartialEq)]
struct StubWorld {
    robot: Configuration,
    enabled: Vec<(ObjectId, bool)>,
    holding: bool,
}

impl StubWorld {
    fn new() -> Self {
        Self {
            robot: BasePose::new(-1.0, -1.0, 0.0).to_configuration(),
            enabled: vec![(ObjectId::new("box"), true), (ObjectId::new("table"), false)],
            holding: false,
        }
    }
}

impl World for StubWorld {
    fn robot_configuration(&self) -> Configuration {
        self.robot.clone()
    }

    fn set_robot_configuration(&mut self, config: &Configuration) {
        self.robot = config.clone();
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.enabled.iter().map(|(o, _)| o.clone()).collect()
    }

    fn is_object_enabled(&self, object: &ObjectId) -> bool {
        self.enabled.iter().any(|(o, e)| o == object && *e)
    }

    fn enable_object(&mut self, object: &ObjectId, enabled: bool) {
        for (o, e) in &mut self.enabled {
            if o == object {
                *e = enabled;
            }
        }
    }

    fn check_collision(&self) -> bool {
        false
    }

    fn robot_aabb(&self) -> Aabb {
        Aabb::new([0.0; 3].into(), [1.0; 3].into())
    }

    fn object_aabb(&self, _object: &ObjectId) -> Option<Aabb> {
        Some(Aabb::new([0.0; 3].into(), [0.5; 3].into()))
    }

    fn region_contains(&self, _region: &RegionId, _aabb: &Aabb) -> bool {
        true
    }

    fn execute_pick(&mut self, _object: &ObjectId, _pick: &PickParameters) -> bool {
        self.holding = true;
        true
    }

    fn undo_pick(&mut self, _object: &ObjectId, _pick: &PickParameters) {
        self.holding = false;
    }

    fn execute_place(&mut self, _object: &ObjectId, _place: &PlaceParameters) -> bool {
        true
    }

    fn undo_place(&mut self, _object: &ObjectId, _place: &PlaceParameters) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pick,
    Place,
}

#[derive(Debug, Clone, PartialEq)]
struct PlanCall {
    phase: Phase,
    budget: usize,
    goal: Configuration,
}

/// Succeeds once the budget reaches the per-phase threshold; `None` never succeeds.
#[derive(Default)]
struct RecordingPlanner {
    pick_needs: Option<usize>,
    place_needs: Option<usize>,
    calls: Vec<PlanCall>,
}

impl RecordingPlanner {
    fn new(pick_needs: Option<usize>, place_needs: Option<usize>) -> Self {
        Self {
            pick_needs,
            place_needs,
            calls: Vec::new(),
        }
    }

    fn budgets(&self, phase: Phase) -> Vec<usize> {
        self.calls
            .iter()
            .filter(|c| c.phase == phase)
            .map(|c| c.budget)
            .collect()
    }
}

impl MotionPlanner<StubWorld> for RecordingPlanner {
    fn plan_with_budget(
        &mut self,
        world: &mut StubWorld,
        goals: &[Configuration],
        iterations: usize,
    ) -> Option<Trajectory> {
        let phase = if world.holding { Phase::Place } else { Phase::Pick };
        self.calls.push(PlanCall {
            phase,
            budget: iterations,
            goal: goals[0].clone(),
        });
        let needed = match phase {
            Phase::Pick => self.pick_needs,
            Phase::Place => self.place_needs,
        }?;
        if iterations < needed {
            return None;
        }
        Trajectory::new(vec![world.robot_configuration(), goals[0].clone()])
    }
}

type StubGenerator = Generator<ScriptedSampler, ScriptedChecker, RecordingPlanner>;

fn stub_generator(
    script: Vec<RawCandidate>,
    planner: RecordingPlanner,
    config: GeneratorConfig,
) -> StubGenerator {
    Generator::new(
        AbstractAction::pick_and_place("box", "home_region"),
        ScriptedSampler::new(script),
        ScriptedChecker,
        planner,
        config,
    )
    .unwrap()
}

// =============================================================================
// Behavioural Tests
// =============================================================================

#[test]
fn fan_out_zero_returns_immediately() {
    let mut generator = stub_generator(
        vec![candidate(FEASIBLE, 0)],
        RecordingPlanner::new(Some(0), Some(0)),
        GeneratorConfig::default().with_fan_out(0),
    );
    let mut world = StubWorld::new();

    let outcome = generator.sample_next_point(&mut world, false).unwrap();

    assert_eq!(outcome.infeasible_reason(), Some(InfeasibleReason::NoSolution));
    assert_eq!(generator.sampler().drawn, 0);
    assert!(generator.attempts().is_empty());
    assert!(generator.planner().calls.is_empty());
}

#[test]
fn good_first_candidate_plans_once_per_motion() {
    let mut generator = stub_generator(
        vec![candidate(FEASIBLE, 0)],
        RecordingPlanner::new(Some(0), Some(0)),
        GeneratorConfig::default().with_fan_out(1),
    );
    let mut world = StubWorld::new();
    let before = world.clone();

    let outcome = generator.sample_next_point(&mut world, false).unwrap();

    assert!(outcome.is_feasible());
    assert!(outcome.operator().unwrap().has_motions());
    assert_eq!(generator.planner().budgets(Phase::Pick), vec![20]);
    assert_eq!(generator.planner().budgets(Phase::Place), vec![20]);
    assert_eq!(world, before);
}

#[test]
fn escalates_until_budget_suffices() {
    let mut generator = stub_generator(
        vec![candidate(FEASIBLE, 0)],
        RecordingPlanner::new(Some(100), Some(0)),
        GeneratorConfig::default().with_fan_out(1),
    );
    let mut world = StubWorld::new();

    let outcome = generator.sample_next_point(&mut world, false).unwrap();

    assert!(outcome.is_feasible());
    assert_eq!(generator.planner().budgets(Phase::Pick), vec![20, 50, 100]);
    assert_eq!(generator.planner().budgets(Phase::Place), vec![20]);
}

#[test]
fn place_planning_starts_at_pick_goal() {
    let mut generator = stub_generator(
        vec![candidate(FEASIBLE, 3)],
        RecordingPlanner::new(Some(0), Some(0)),
        GeneratorConfig::default().with_fan_out(1),
    );
    let mut world = StubWorld::new();

    let operator = generator
        .sample_next_point(&mut world, false)
        .unwrap()
        .into_operator()
        .unwrap();

    let place_motion = operator.place_motion.unwrap();
    assert_eq!(place_motion.first(), &operator.pick.goal());
    assert_eq!(operator.pick_motion.unwrap().first(), &world.robot_configuration());
}

#[test]
fn skip_motion_check_returns_first_pool_candidate() {
    let script = vec![
        candidate(PICK_FAILS, 0),
        candidate(FEASIBLE, 1),
        candidate(PLACE_FAILS, 2),
        candidate(FEASIBLE, 3),
    ];
    let mut generator = stub_generator(
        script,
        RecordingPlanner::new(Some(0), Some(0)),
        GeneratorConfig::default().with_fan_out(2),
    );
    let mut world = StubWorld::new();

    let operator = generator
        .sample_next_point(&mut world, true)
        .unwrap()
        .into_operator()
        .unwrap();

    assert_eq!(operator.raw, candidate(FEASIBLE, 1));
    assert!(!operator.has_motions());
    assert!(generator.planner().calls.is_empty());
    assert_eq!(
        generator.attempts().final_label(operator.attempt),
        Some(AttemptLabel::PendingMotion)
    );
    assert_eq!(generator.counters().mp_checks, 0);
}

#[test]
fn place_failure_falls_through_and_is_logged() {
    let script = vec![candidate(FEASIBLE, 0), candidate(FEASIBLE, 1)];
    let planner = RecordingPlanner::new(Some(0), None);
    let schedule = IterationSchedule::new(vec![10, 30]).unwrap();
    let mut generator = stub_generator(
        script,
        planner,
        GeneratorConfig::default()
            .with_fan_out(2)
            .with_schedule(schedule),
    );
    let mut world = StubWorld::new();

    let outcome = generator.sample_next_point(&mut world, false).unwrap();

    assert_eq!(
        outcome.infeasible_reason(),
        Some(InfeasibleReason::NoFeasibleMotion {
            pick_failures: 0,
            place_failures: 2,
        })
    );
    assert_eq!(generator.planner().budgets(Phase::Place), vec![10, 30, 10, 30]);
    assert_eq!(
        generator
            .attempts()
            .count_final(AttemptLabel::PlaceMotionInfeasible),
        2
    );
    assert_eq!(generator.counters().mp_checks, 2);
    assert_eq!(generator.counters().mp_infeasible, 2);
}

// =============================================================================
// Property Tests: Phase A
// =============================================================================

fn arb_code() -> impl Strategy<Value = f64> {
    prop_oneof![Just(PICK_FAILS), Just(PLACE_FAILS), Just(FEASIBLE)]
}

proptest! {
    /// An always-failing sampler exhausts exactly the iteration limit.
    #[test]
    fn always_in_collision_spends_the_limit(limit in 1usize..300) {
        let mut generator = stub_generator(
            vec![candidate(PICK_FAILS, 0)],
            RecordingPlanner::new(Some(0), Some(0)),
            GeneratorConfig::default().with_n_iter_limit(limit),
        );
        let mut world = StubWorld::new();

        let outcome = generator.sample_next_point(&mut world, false).unwrap();

        prop_assert_eq!(outcome.infeasible_reason(), Some(InfeasibleReason::NoSolution));
        prop_assert_eq!(generator.sampler().drawn, limit);
        prop_assert_eq!(generator.attempts().attempt_count(), limit);
        prop_assert_eq!(
            generator.attempts().count_final(AttemptLabel::PickInfeasible),
            limit
        );
        prop_assert_eq!(generator.counters().ik_checks, limit);
        prop_assert_eq!(generator.counters().ik_infeasible, limit);
        prop_assert!(generator.planner().calls.is_empty());
    }

    /// The candidates offered to pick planning are exactly the feasible
    /// draws of Phase A, in discovery order.
    #[test]
    fn pool_matches_feasible_draws(
        codes in prop::collection::vec(arb_code(), 1..40),
        fan_out in 1usize..6,
    ) {
        let script: Vec<RawCandidate> = codes
            .iter()
            .enumerate()
            .map(|(i, &c)| candidate(c, i))
            .collect();
        let schedule = IterationSchedule::new(vec![20]).unwrap();
        let mut generator = stub_generator(
            script.clone(),
            RecordingPlanner::new(None, None),
            GeneratorConfig::default()
                .with_n_iter_limit(codes.len())
                .with_fan_out(fan_out)
                .with_schedule(schedule),
        );
        let mut world = StubWorld::new();

        generator.sample_next_point(&mut world, false).unwrap();

        let expected: Vec<Configuration> = script
            .iter()
            .filter(|raw| raw.grasp().theta == FEASIBLE)
            .take(fan_out)
            .map(|raw| raw.pick_base_pose().to_configuration())
            .collect();
        let offered: Vec<Configuration> = generator
            .planner()
            .calls
            .iter()
            .map(|c| c.goal.clone())
            .collect();
        prop_assert_eq!(&offered, &expected);

        let pending: Vec<Configuration> = generator
            .attempts()
            .entries()
            .iter()
            .filter(|e| e.label == AttemptLabel::PendingMotion)
            .map(|e| e.raw.pick_base_pose().to_configuration())
            .collect();
        prop_assert_eq!(&pending, &expected);
        prop_assert_eq!(
            generator.attempts().count_final(AttemptLabel::PickMotionInfeasible),
            expected.len()
        );
        prop_assert_eq!(world, StubWorld::new());
    }

    /// Counters add up to the attempt log after a call.
    #[test]
    fn counters_agree_with_log(codes in prop::collection::vec(arb_code(), 1..40)) {
        let script: Vec<RawCandidate> = codes
            .iter()
            .enumerate()
            .map(|(i, &c)| candidate(c, i))
            .collect();
        let mut generator = stub_generator(
            script,
            RecordingPlanner::new(Some(0), Some(0)),
            GeneratorConfig::default().with_n_iter_limit(codes.len()),
        );
        let mut world = StubWorld::new();

        generator.sample_next_point(&mut world, true).unwrap();

        let log = generator.attempts();
        let rejected = log.count_final(AttemptLabel::PickInfeasible)
            + log.count_final(AttemptLabel::PlaceInfeasible);
        prop_assert_eq!(generator.counters().ik_checks, log.attempt_count());
        prop_assert_eq!(generator.counters().ik_infeasible, rejected);
    }
}

// =============================================================================
// Property Tests: World Restoration
// =============================================================================

fn scene() -> PlanarWorld {
    PlanarWorld::new()
        .with_region(
            "entire_region",
            Aabb::new([-6.0, -6.0, 0.0].into(), [6.0, 6.0, 2.0].into()),
        )
        .with_region(
            "home_region",
            Aabb::new([2.0, 2.0, 0.0].into(), [5.0, 5.0, 2.0].into()),
        )
        .with_object(
            "box",
            Aabb::new([0.8, -0.2, 0.0].into(), [1.2, 0.2, 0.4].into()),
        )
        .with_object(
            "pillar",
            Aabb::new([-1.0, 1.0, 0.0].into(), [0.0, 2.0, 1.5].into()),
        )
}

fn arb_candidate() -> impl Strategy<Value = RawCandidate> {
    prop::collection::vec(-4.0..4.0f64, 9).prop_map(|v| RawCandidate::new(v).unwrap())
}

proptest! {
    /// Checking any candidate leaves the world exactly as it was.
    #[test]
    fn check_feasibility_restores_world(
        raw in arb_candidate(),
        pillar_enabled in any::<bool>(),
        robot in prop::array::uniform3(-3.0..3.0f64),
    ) {
        let mut world = scene().with_robot_pose(BasePose::new(robot[0], robot[1], robot[2]));
        world.enable_object(&ObjectId::new("pillar"), pillar_enabled);
        let before = world.clone();

        let mut checker = PickAndPlaceChecker::new(ReachGraspSolver::default());
        let action = AbstractAction::pick_and_place("box", "home_region");
        let outcome = checker.check_feasibility(&mut world, &action, &raw);

        prop_assert_eq!(&world, &before);
        if let FeasibilityOutcome::Feasible(params) = outcome {
            prop_assert_eq!(params.raw, raw);
        }
    }
}
