//! A planar mobile-manipulator world and a reach-based grasp solver.
//!
//! [`PlanarWorld`] models a disc-shaped robot base moving in `(x, y, θ)`
//! among box obstacles. A picked object is rigidly attached to the base at
//! the offset it had when grasped and travels with the robot until it is
//! placed. Named regions are plain boxes.
//!
//! [`ReachGraspSolver`] accepts a grasp when the object lies within an
//! annulus of reach around the base.

use nalgebra::{Point3, Rotation2, Vector2, Vector3};
use pap_types::{
    Aabb, BasePose, Configuration, GraspParams, ObjectId, PickParameters, PlaceParameters,
    RegionId,
};
use tracing::warn;

use crate::feasibility::GraspSolver;
use crate::world::World;

/// Default robot footprint radius (meters).
pub const DEFAULT_ROBOT_RADIUS: f64 = 0.3;

/// Default robot height (meters).
pub const DEFAULT_ROBOT_HEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
struct PlanarObject {
    id: ObjectId,
    aabb: Aabb,
    enabled: bool,
}

/// An object attached to the robot.
#[derive(Debug, Clone, PartialEq)]
struct Grip {
    object: ObjectId,
    /// Object center relative to the base, in the robot frame.
    offset: Vector2<f64>,
    /// Object box before it was picked.
    resting: Aabb,
    arm: Configuration,
}

/// A planar robot among box obstacles.
///
/// # Example
///
/// ```
/// use pap_generator::planar::PlanarWorld;
/// use pap_generator::world::World;
/// use pap_types::{Aabb, BasePose};
///
/// let mut world = PlanarWorld::new()
///     .with_object("box", Aabb::new([1.0, -0.2, 0.0].into(), [1.4, 0.2, 0.4].into()));
///
/// assert!(!world.check_collision());
/// world.set_robot_configuration(&BasePose::new(1.2, 0.0, 0.0).to_configuration());
/// assert!(world.check_collision());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarWorld {
    robot: BasePose,
    robot_radius: f64,
    robot_height: f64,
    objects: Vec<PlanarObject>,
    regions: Vec<(RegionId, Aabb)>,
    held: Option<Grip>,
    released: Option<Grip>,
}

impl Default for PlanarWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanarWorld {
    /// Creates an empty world with the robot at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            robot: BasePose::new(0.0, 0.0, 0.0),
            robot_radius: DEFAULT_ROBOT_RADIUS,
            robot_height: DEFAULT_ROBOT_HEIGHT,
            objects: Vec::new(),
            regions: Vec::new(),
            held: None,
            released: None,
        }
    }

    /// Places the robot base.
    #[must_use]
    pub const fn with_robot_pose(mut self, pose: BasePose) -> Self {
        self.robot = pose;
        self
    }

    /// Sets the robot footprint radius.
    #[must_use]
    pub const fn with_robot_radius(mut self, radius: f64) -> Self {
        self.robot_radius = radius;
        self
    }

    /// Adds an enabled object.
    #[must_use]
    pub fn with_object(mut self, id: impl Into<ObjectId>, aabb: Aabb) -> Self {
        self.objects.push(PlanarObject {
            id: id.into(),
            aabb,
            enabled: true,
        });
        self
    }

    /// Adds a named region.
    #[must_use]
    pub fn with_region(mut self, id: impl Into<RegionId>, aabb: Aabb) -> Self {
        self.regions.push((id.into(), aabb));
        self
    }

    /// Returns the current base pose.
    #[must_use]
    pub const fn robot_pose(&self) -> BasePose {
        self.robot
    }

    /// Returns the object currently held, if any.
    #[must_use]
    pub fn held_object(&self) -> Option<&ObjectId> {
        self.held.as_ref().map(|g| &g.object)
    }

    /// Returns the arm configuration of the current grasp, if any.
    #[must_use]
    pub fn arm_configuration(&self) -> Option<&Configuration> {
        self.held.as_ref().map(|g| &g.arm)
    }

    fn object(&self, id: &ObjectId) -> Option<&PlanarObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    fn object_mut(&mut self, id: &ObjectId) -> Option<&mut PlanarObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    fn is_held(&self, id: &ObjectId) -> bool {
        self.held.as_ref().is_some_and(|g| &g.object == id)
    }

    /// Box of a held object when the base is at `pose`.
    fn carried_aabb(resting: &Aabb, offset: Vector2<f64>, pose: &BasePose) -> Aabb {
        let xy = Vector2::new(pose.x, pose.y) + Rotation2::new(pose.theta) * offset;
        resting.recentered(Point3::new(xy.x, xy.y, resting.center().z))
    }
}

impl World for PlanarWorld {
    fn robot_configuration(&self) -> Configuration {
        self.robot.to_configuration()
    }

    fn set_robot_configuration(&mut self, config: &Configuration) {
        match BasePose::from_configuration(config) {
            Ok(pose) => self.robot = pose,
            Err(e) => warn!(error = %e, "Ignoring robot configuration"),
        }
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id.clone()).collect()
    }

    fn is_object_enabled(&self, object: &ObjectId) -> bool {
        self.object(object).is_some_and(|o| o.enabled)
    }

    fn enable_object(&mut self, object: &ObjectId, enabled: bool) {
        if let Some(o) = self.object_mut(object) {
            o.enabled = enabled;
        }
    }

    fn check_collision(&self) -> bool {
        let robot = self.robot_aabb();
        let carried = self
            .held
            .as_ref()
            .and_then(|g| self.object_aabb(&g.object));

        self.objects
            .iter()
            .filter(|o| o.enabled && !self.is_held(&o.id))
            .any(|o| {
                robot.intersects(&o.aabb) || carried.is_some_and(|c| c.intersects(&o.aabb))
            })
    }

    fn robot_aabb(&self) -> Aabb {
        Aabb::from_center_extents(
            Point3::new(self.robot.x, self.robot.y, self.robot_height * 0.5),
            Vector3::new(self.robot_radius, self.robot_radius, self.robot_height * 0.5),
        )
    }

    fn object_aabb(&self, object: &ObjectId) -> Option<Aabb> {
        let stored = self.object(object)?.aabb;
        match &self.held {
            Some(grip) if &grip.object == object => {
                Some(Self::carried_aabb(&stored, grip.offset, &self.robot))
            }
            _ => Some(stored),
        }
    }

    fn region_contains(&self, region: &RegionId, aabb: &Aabb) -> bool {
        self.regions
            .iter()
            .find(|(id, _)| id == region)
            .is_some_and(|(_, bounds)| bounds.contains_aabb(aabb))
    }

    fn execute_pick(&mut self, object: &ObjectId, pick: &PickParameters) -> bool {
        if self.held.is_some() {
            warn!(object = %object, "Pick ignored: already holding an object");
            return false;
        }
        let Some(stored) = self.object(object) else {
            warn!(object = %object, "Pick ignored: unknown object");
            return false;
        };
        let base = &pick.base_pose;
        let resting = stored.aabb;
        let center = resting.center();
        let offset =
            Rotation2::new(-base.theta) * Vector2::new(center.x - base.x, center.y - base.y);
        self.held = Some(Grip {
            object: object.clone(),
            offset,
            resting,
            arm: pick.grasp_config.clone(),
        });
        true
    }

    fn undo_pick(&mut self, object: &ObjectId, _pick: &PickParameters) {
        if self.is_held(object) {
            self.held = None;
        }
    }

    fn execute_place(&mut self, object: &ObjectId, place: &PlaceParameters) -> bool {
        let Some(grip) = self.held.take_if(|g| &g.object == object) else {
            warn!(object = %object, "Place ignored: object is not held");
            return false;
        };
        if let Some(o) = self.object_mut(object) {
            o.aabb = Self::carried_aabb(&grip.resting, grip.offset, &place.base_pose);
        }
        self.released = Some(grip);
        true
    }

    fn undo_place(&mut self, object: &ObjectId, _place: &PlaceParameters) {
        let Some(grip) = self.released.take_if(|g| &g.object == object) else {
            return;
        };
        if let Some(o) = self.object_mut(object) {
            o.aabb = grip.resting;
        }
        self.held = Some(grip);
    }
}

/// Accepts grasps of objects lying within reach of the base.
///
/// The arm configuration produced is `[θ, grasp height, reach]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachGraspSolver {
    min_reach: f64,
    max_reach: f64,
}

impl Default for ReachGraspSolver {
    fn default() -> Self {
        Self::new(0.4, 1.5)
    }
}

impl ReachGraspSolver {
    /// Creates a solver accepting objects between `min_reach` and `max_reach` of the base.
    #[must_use]
    pub const fn new(min_reach: f64, max_reach: f64) -> Self {
        Self {
            min_reach,
            max_reach,
        }
    }

    /// Returns the minimum reach.
    #[must_use]
    pub const fn min_reach(&self) -> f64 {
        self.min_reach
    }

    /// Returns the maximum reach.
    #[must_use]
    pub const fn max_reach(&self) -> f64 {
        self.max_reach
    }
}

impl<W: World + ?Sized> GraspSolver<W> for ReachGraspSolver {
    fn solve_grasp(
        &mut self,
        world: &mut W,
        object: &ObjectId,
        grasp: &GraspParams,
        base: &BasePose,
    ) -> Option<Configuration> {
        let portions = 0.0..=1.0;
        if !portions.contains(&grasp.height_portion) || !portions.contains(&grasp.depth_portion) {
            return None;
        }
        let aabb = world.object_aabb(object)?;
        let center = aabb.center();
        let reach = Vector2::new(center.x - base.x, center.y - base.y).norm();
        if reach < self.min_reach || reach > self.max_reach {
            return None;
        }
        let height = aabb.min.z + grasp.height_portion * (aabb.max.z - aabb.min.z);
        let depth = reach - aabb.half_extents().x + 2.0 * grasp.depth_portion * aabb.half_extents().x;
        Some(Configuration::from_row_slice(&[grasp.theta, height, depth]))
    }
}
