//! The sample, verify, plan pipeline.
//!
//! [`Generator::sample_next_point`] runs in two phases:
//!
//! - **Phase A** draws candidates and checks their kinematic feasibility
//!   until `fan_out` verified candidates are pooled or `n_iter_limit` draws
//!   have been spent.
//! - **Phase B** plans a pick motion and then a place motion for each pooled
//!   candidate in discovery order, escalating the planner budget through the
//!   configured schedule, and returns the first candidate with both motions.
//!
//! Every draw is recorded in the call's [`AttemptLog`]; candidates that
//! reach Phase B get a second record once their motions are decided.

use std::time::Instant;

use pap_types::{
    AbstractAction, ActionKind, AttemptId, AttemptLabel, AttemptLog, FeasibleOperator,
    GenerationCounters, GenerationOutcome, GenerationStats, GeneratorConfig, InfeasibleReason,
    OperatorParameters, PapError, PapResult,
};
use tracing::{debug, info};

use crate::feasibility::{FeasibilityChecker, FeasibilityOutcome};
use crate::motion::MotionPlanner;
use crate::sampler::Sampler;
use crate::world::{PickGuard, RestoreGuard, World};

/// Generates feasible pick-and-place operators for one abstract action.
///
/// # Example
///
/// ```
/// use pap_generator::feasibility::PickAndPlaceChecker;
/// use pap_generator::generator::Generator;
/// use pap_generator::planar::{PlanarWorld, ReachGraspSolver};
/// use pap_generator::rrt::{RrtConfig, RrtPlanner};
/// use pap_generator::sampler::UniformSampler;
/// use pap_types::{AbstractAction, Aabb, GeneratorConfig, ParamDomain};
///
/// let mut world = PlanarWorld::new()
///     .with_region("entire_region", Aabb::new([-5.0, -5.0, 0.0].into(), [5.0, 5.0, 2.0].into()))
///     .with_region("home_region", Aabb::new([1.0, 1.0, 0.0].into(), [4.0, 4.0, 2.0].into()))
///     .with_object("box", Aabb::new([1.8, -0.2, 0.0].into(), [2.2, 0.2, 0.4].into()));
///
/// let pick = ParamDomain::new(
///     vec![0.0, 0.0, 0.0, 0.5, -1.0, -0.1],
///     vec![1.0, 1.0, 1.0, 1.5, 1.0, 0.1],
/// )
/// .unwrap();
/// let place = ParamDomain::new(vec![0.5, 1.5, -0.1], vec![2.5, 3.0, 0.1]).unwrap();
/// let bounds = ParamDomain::new(vec![-5.0, -5.0, -3.2], vec![5.0, 5.0, 3.2]).unwrap();
///
/// let mut generator = Generator::new(
///     AbstractAction::pick_and_place("box", "home_region"),
///     UniformSampler::from_domains(&pick, &place).unwrap().with_seed(11),
///     PickAndPlaceChecker::new(ReachGraspSolver::default()),
///     RrtPlanner::new(RrtConfig::new(bounds).with_seed(11)).unwrap(),
///     GeneratorConfig::default(),
/// )
/// .unwrap();
///
/// let outcome = generator.sample_next_point(&mut world, false).unwrap();
/// assert!(outcome.is_feasible());
/// assert!(outcome.operator().unwrap().has_motions());
/// ```
#[derive(Debug)]
pub struct Generator<S, C, P> {
    action: AbstractAction,
    sampler: S,
    checker: C,
    planner: P,
    config: GeneratorConfig,
    counters: GenerationCounters,
    attempts: AttemptLog,
    last_stats: GenerationStats,
}

impl<S: Sampler, C, P> Generator<S, C, P> {
    /// Creates a generator for a pick-and-place `action`.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::InvalidConfig`] if `config` fails validation or
    /// `action` is not a pick-and-place action.
    pub fn new(
        action: AbstractAction,
        sampler: S,
        checker: C,
        planner: P,
        config: GeneratorConfig,
    ) -> PapResult<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(PapError::invalid_config(errors.join("; ")));
        }
        if action.kind() != ActionKind::PickAndPlace {
            return Err(PapError::invalid_config(format!(
                "generator requires a pick-and-place action, got {action}"
            )));
        }
        Ok(Self {
            action,
            sampler,
            checker,
            planner,
            config,
            counters: GenerationCounters::default(),
            attempts: AttemptLog::new(),
            last_stats: GenerationStats::new(),
        })
    }

    /// Produces the next operator for the action, or reports why none was found.
    ///
    /// With `skip_motion_check` the first verified candidate is returned
    /// without motions and the planner is never called.
    ///
    /// The world is left as it was found.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::Sampler`] if the sampler cannot produce a
    /// candidate. Failing to find an operator is not an error.
    pub fn sample_next_point<W>(
        &mut self,
        world: &mut W,
        skip_motion_check: bool,
    ) -> PapResult<GenerationOutcome>
    where
        W: World + ?Sized,
        C: FeasibilityChecker<W>,
        P: MotionPlanner<W>,
    {
        self.attempts = AttemptLog::new();
        self.last_stats = GenerationStats::new();

        let started = Instant::now();
        let (pool, draws) = self.fill_pool(world)?;
        let sampling_elapsed = started.elapsed();
        self.last_stats = GenerationStats::new()
            .with_draws(draws)
            .with_pool_size(pool.len())
            .with_sampling_elapsed(sampling_elapsed);

        info!(
            action = %self.action,
            draws,
            pool = pool.len(),
            elapsed_ms = sampling_elapsed.as_millis(),
            "Feasibility sampling complete"
        );

        let Some((first, attempt)) = pool.first() else {
            return Ok(GenerationOutcome::Infeasible(InfeasibleReason::NoSolution));
        };

        if skip_motion_check {
            return Ok(GenerationOutcome::Feasible(FeasibleOperator {
                pick: first.pick.clone(),
                pick_motion: None,
                place: first.place.clone(),
                place_motion: None,
                raw: first.raw.clone(),
                attempt: *attempt,
            }));
        }

        let started = Instant::now();
        let outcome = self.plan_motions(world, pool);
        let motion_elapsed = started.elapsed();
        self.last_stats.set_motion_elapsed(motion_elapsed);

        info!(
            action = %self.action,
            feasible = outcome.as_ref().is_ok_and(GenerationOutcome::is_feasible),
            tried = self.last_stats.motion_candidates_tried(),
            elapsed_ms = motion_elapsed.as_millis(),
            "Motion planning complete"
        );
        outcome
    }

    /// Phase A: returns verified candidates in discovery order and the draw count.
    fn fill_pool<W>(
        &mut self,
        world: &mut W,
    ) -> PapResult<(Vec<(OperatorParameters, AttemptId)>, usize)>
    where
        W: World + ?Sized,
        C: FeasibilityChecker<W>,
    {
        let target = self.config.fan_out();
        let mut pool = Vec::with_capacity(target);
        let mut draws = 0;
        if target == 0 {
            return Ok((pool, draws));
        }

        while draws < self.config.n_iter_limit() && pool.len() < target {
            draws += 1;
            self.counters.ik_checks += 1;
            let raw = self.sampler.draw()?;
            match self.checker.check_feasibility(world, &self.action, &raw) {
                FeasibilityOutcome::Feasible(params) => {
                    let id = self.attempts.record(raw, AttemptLabel::PendingMotion);
                    debug!(attempt = %id, pool = pool.len() + 1, "Feasible candidate");
                    pool.push((params, id));
                }
                FeasibilityOutcome::PickFailed(_) => {
                    self.attempts.record(raw, AttemptLabel::PickInfeasible);
                    self.counters.ik_infeasible += 1;
                }
                FeasibilityOutcome::PlaceFailed(_) => {
                    self.attempts.record(raw, AttemptLabel::PlaceInfeasible);
                    self.counters.ik_infeasible += 1;
                }
            }
        }
        Ok((pool, draws))
    }

    /// Phase B: plans both motions for each pooled candidate until one succeeds.
    fn plan_motions<W>(
        &mut self,
        world: &mut W,
        pool: Vec<(OperatorParameters, AttemptId)>,
    ) -> PapResult<GenerationOutcome>
    where
        W: World + ?Sized,
        P: MotionPlanner<W>,
    {
        let schedule = self.config.schedule().clone();
        let object = self.action.object().clone();
        let mut pick_failures = 0;
        let mut place_failures = 0;
        let mut tried = 0;

        for (params, attempt) in pool {
            tried += 1;
            self.last_stats.set_motion_candidates_tried(tried);
            self.counters.mp_checks += 1;

            let pick_plan = {
                let mut guard = RestoreGuard::new(&mut *world);
                self.planner
                    .plan(&mut *guard, &[params.pick.goal()], &schedule)
            };
            let Some(pick_plan) = pick_plan else {
                debug!(attempt = %attempt, "No pick motion");
                self.attempts
                    .resolve(attempt, AttemptLabel::PickMotionInfeasible)?;
                self.counters.mp_infeasible += 1;
                pick_failures += 1;
                continue;
            };

            let place_plan = {
                let mut guard = RestoreGuard::new(&mut *world);
                guard.set_robot_configuration(&params.pick.goal());
                let mut held = PickGuard::execute(&mut *guard, &object, &params.pick);
                if held.is_executed() {
                    self.planner
                        .plan(&mut *held, &[params.place.goal()], &schedule)
                } else {
                    None
                }
            };
            let Some(place_plan) = place_plan else {
                debug!(attempt = %attempt, "No place motion");
                self.attempts
                    .resolve(attempt, AttemptLabel::PlaceMotionInfeasible)?;
                self.counters.mp_infeasible += 1;
                place_failures += 1;
                continue;
            };

            self.attempts.resolve(attempt, AttemptLabel::Feasible)?;
            debug!(
                attempt = %attempt,
                pick_budget = pick_plan.budget,
                place_budget = place_plan.budget,
                "Found pick and place motions"
            );
            return Ok(GenerationOutcome::Feasible(FeasibleOperator {
                pick: params.pick,
                pick_motion: Some(pick_plan.trajectory),
                place: params.place,
                place_motion: Some(place_plan.trajectory),
                raw: params.raw,
                attempt,
            }));
        }

        Ok(GenerationOutcome::Infeasible(
            InfeasibleReason::NoFeasibleMotion {
                pick_failures,
                place_failures,
            },
        ))
    }

    /// Returns the running counters.
    #[must_use]
    pub const fn counters(&self) -> &GenerationCounters {
        &self.counters
    }

    /// Resets the running counters.
    pub fn reset_counters(&mut self) {
        self.counters = GenerationCounters::default();
    }

    /// Returns the attempt log of the latest call.
    #[must_use]
    pub const fn attempts(&self) -> &AttemptLog {
        &self.attempts
    }

    /// Returns statistics about the latest call.
    #[must_use]
    pub const fn last_stats(&self) -> &GenerationStats {
        &self.last_stats
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the action operators are generated for.
    #[must_use]
    pub const fn action(&self) -> &AbstractAction {
        &self.action
    }

    /// Returns the sampler.
    #[must_use]
    pub const fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Returns the feasibility checker.
    #[must_use]
    pub const fn checker(&self) -> &C {
        &self.checker
    }

    /// Returns the motion planner.
    #[must_use]
    pub const fn planner(&self) -> &P {
        &self.planner
    }
}
