//! Abstract (symbolic) actions.
//!
//! An [`AbstractAction`] names *what* to manipulate and *where* to put it,
//! without any continuous parameters. The generator turns it into concrete
//! grasp and base poses.

use std::fmt;

/// Identifier of a movable object in the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates an object identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identifier of a region of the world (placement target or operating area).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(String);

impl RegionId {
    /// Creates a region identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The kind of symbolic manipulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Grasp the object only.
    Pick,
    /// Put down an already-held object.
    Place,
    /// Grasp the object and put it into the target region.
    #[default]
    PickAndPlace,
}

/// A discrete action descriptor: object, target region and action kind.
///
/// # Example
///
/// ```
/// use pap_types::{AbstractAction, ActionKind};
///
/// let action = AbstractAction::pick_and_place("square_packing_box1", "home_region");
/// assert_eq!(action.kind(), ActionKind::PickAndPlace);
/// assert_eq!(action.object().as_str(), "square_packing_box1");
/// assert_eq!(action.region().as_str(), "home_region");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbstractAction {
    kind: ActionKind,
    object: ObjectId,
    region: RegionId,
}

impl AbstractAction {
    /// Creates an abstract action.
    #[must_use]
    pub fn new(kind: ActionKind, object: impl Into<ObjectId>, region: impl Into<RegionId>) -> Self {
        Self {
            kind,
            object: object.into(),
            region: region.into(),
        }
    }

    /// Creates a pick-and-place action.
    #[must_use]
    pub fn pick_and_place(object: impl Into<ObjectId>, region: impl Into<RegionId>) -> Self {
        Self::new(ActionKind::PickAndPlace, object, region)
    }

    /// Returns the action kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Returns the target object.
    #[must_use]
    pub const fn object(&self) -> &ObjectId {
        &self.object
    }

    /// Returns the target region.
    #[must_use]
    pub const fn region(&self) -> &RegionId {
        &self.region
    }
}

impl fmt::Display for AbstractAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({} -> {})", self.kind, self.object, self.region)
    }
}
