//! The simulated-world capability and scoped state guards.
//!
//! Feasibility checks and motion probes share one mutable world with the
//! caller. Every probe must leave the robot configuration and the
//! per-object collision flags exactly as it found them, whatever the
//! outcome. The guards in this module make that structural:
//!
//! - [`RestoreGuard`] snapshots the robot configuration and every object's
//!   enable flag on construction and writes them back on drop.
//! - [`PickGuard`] / [`PlaceGuard`] execute a pick or place on
//!   construction and undo it on drop. A pick or place the world refused
//!   is never undone.
//!
//! Guards nest: a `PickGuard` built on top of a `RestoreGuard` is dropped
//! first, so the pick is undone before the snapshot is restored.
//!
//! # Example
//!
//! ```
//! use pap_generator::world::{RestoreGuard, World};
//! use pap_generator::planar::PlanarWorld;
//! use pap_types::BasePose;
//!
//! let mut world = PlanarWorld::new();
//! let before = world.robot_configuration();
//! {
//!     let mut guard = RestoreGuard::new(&mut world);
//!     guard.set_robot_configuration(&BasePose::new(3.0, 1.0, 0.0).to_configuration());
//! }
//! assert_eq!(world.robot_configuration(), before);
//! ```

use std::ops::{Deref, DerefMut};

use pap_types::{Aabb, Configuration, ObjectId, PickParameters, PlaceParameters, RegionId};

/// Mutable simulation state consumed by checkers and planners.
///
/// The robot configuration is the planar base configuration `(x, y, θ)`;
/// arm configurations travel inside [`PickParameters`].
pub trait World {
    /// Returns the current robot base configuration.
    fn robot_configuration(&self) -> Configuration;

    /// Moves the robot base to `config`.
    fn set_robot_configuration(&mut self, config: &Configuration);

    /// Returns every movable object.
    fn objects(&self) -> Vec<ObjectId>;

    /// Returns whether `object` currently participates in collision checks.
    fn is_object_enabled(&self, object: &ObjectId) -> bool;

    /// Enables or disables collision checking for `object`.
    fn enable_object(&mut self, object: &ObjectId, enabled: bool);

    /// Returns `true` if the robot (and anything it holds) is in collision.
    fn check_collision(&self) -> bool;

    /// Returns the robot's current bounding box.
    fn robot_aabb(&self) -> Aabb;

    /// Returns the bounding box of `object`, if it exists.
    fn object_aabb(&self, object: &ObjectId) -> Option<Aabb>;

    /// Returns `true` if `aabb` lies inside `region`. Unknown regions contain nothing.
    fn region_contains(&self, region: &RegionId, aabb: &Aabb) -> bool;

    /// Grasps `object` with the arm configuration in `pick`.
    ///
    /// Returns `false`, leaving the world untouched, if the pick cannot be
    /// executed (unknown object, or something is already held).
    fn execute_pick(&mut self, object: &ObjectId, pick: &PickParameters) -> bool;

    /// Reverts [`World::execute_pick`].
    fn undo_pick(&mut self, object: &ObjectId, pick: &PickParameters);

    /// Releases the held `object` at the current base pose.
    ///
    /// Returns `false`, leaving the world untouched, if `object` is not held.
    fn execute_place(&mut self, object: &ObjectId, place: &PlaceParameters) -> bool;

    /// Reverts [`World::execute_place`].
    fn undo_place(&mut self, object: &ObjectId, place: &PlaceParameters);
}

/// Robot configuration and object enable flags at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    robot: Configuration,
    enabled: Vec<(ObjectId, bool)>,
}

impl WorldSnapshot {
    /// Captures the current state of `world`.
    pub fn capture<W: World + ?Sized>(world: &W) -> Self {
        let enabled = world
            .objects()
            .into_iter()
            .map(|o| {
                let flag = world.is_object_enabled(&o);
                (o, flag)
            })
            .collect();
        Self {
            robot: world.robot_configuration(),
            enabled,
        }
    }

    /// Writes the captured state back into `world`.
    pub fn restore<W: World + ?Sized>(&self, world: &mut W) {
        for (object, enabled) in &self.enabled {
            world.enable_object(object, *enabled);
        }
        world.set_robot_configuration(&self.robot);
    }

    /// Returns the captured robot configuration.
    #[must_use]
    pub const fn robot_configuration(&self) -> &Configuration {
        &self.robot
    }
}

/// Restores robot configuration and enable flags when dropped.
pub struct RestoreGuard<'w, W: World + ?Sized> {
    world: &'w mut W,
    snapshot: WorldSnapshot,
}

impl<'w, W: World + ?Sized> RestoreGuard<'w, W> {
    /// Snapshots `world` and returns a guard that restores it on drop.
    pub fn new(world: &'w mut W) -> Self {
        let snapshot = WorldSnapshot::capture(world);
        Self { world, snapshot }
    }

    /// Returns the snapshot taken on entry.
    #[must_use]
    pub const fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }
}

impl<W: World + ?Sized> Deref for RestoreGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.world
    }
}

impl<W: World + ?Sized> DerefMut for RestoreGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.world
    }
}

impl<W: World + ?Sized> Drop for RestoreGuard<'_, W> {
    fn drop(&mut self) {
        self.snapshot.restore(self.world);
    }
}

/// Holds a pick executed in the world; undoes it when dropped.
pub struct PickGuard<'w, W: World + ?Sized> {
    world: &'w mut W,
    object: ObjectId,
    pick: PickParameters,
    executed: bool,
}

impl<'w, W: World + ?Sized> PickGuard<'w, W> {
    /// Executes `pick` on `object` and returns the guard.
    pub fn execute(world: &'w mut W, object: &ObjectId, pick: &PickParameters) -> Self {
        let executed = world.execute_pick(object, pick);
        Self {
            world,
            object: object.clone(),
            pick: pick.clone(),
            executed,
        }
    }

    /// Returns `true` if the world accepted the pick.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        self.executed
    }
}

impl<W: World + ?Sized> Deref for PickGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.world
    }
}

impl<W: World + ?Sized> DerefMut for PickGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.world
    }
}

impl<W: World + ?Sized> Drop for PickGuard<'_, W> {
    fn drop(&mut self) {
        if self.executed {
            self.world.undo_pick(&self.object, &self.pick);
        }
    }
}

/// Holds a place executed in the world; undoes it when dropped.
pub struct PlaceGuard<'w, W: World + ?Sized> {
    world: &'w mut W,
    object: ObjectId,
    place: PlaceParameters,
    executed: bool,
}

impl<'w, W: World + ?Sized> PlaceGuard<'w, W> {
    /// Executes `place` for the held `object` and returns the guard.
    pub fn execute(world: &'w mut W, object: &ObjectId, place: &PlaceParameters) -> Self {
        let executed = world.execute_place(object, place);
        Self {
            world,
            object: object.clone(),
            place: place.clone(),
            executed,
        }
    }

    /// Returns `true` if the world accepted the place.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        self.executed
    }
}

impl<W: World + ?Sized> Deref for PlaceGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.world
    }
}

impl<W: World + ?Sized> DerefMut for PlaceGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.world
    }
}

impl<W: World + ?Sized> Drop for PlaceGuard<'_, W> {
    fn drop(&mut self) {
        if self.executed {
            self.world.undo_place(&self.object, &self.place);
        }
    }
}
