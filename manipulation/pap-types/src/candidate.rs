//! Raw candidates and the domains they are drawn from.
//!
//! A [`RawCandidate`] is the unverified parameter vector a sampler proposes.
//! Its layout is fixed:
//!
//! | index | meaning                          |
//! |-------|----------------------------------|
//! | 0..3  | grasp `(θ, height, depth)`       |
//! | 3..6  | pick base pose `(x, y, θ)`       |
//! | 6..9  | place base pose `(x, y, θ)`      |

use nalgebra::DVector;

use crate::error::{PapError, PapResult};

/// A robot configuration (base `(x, y, θ)` or arm joint values).
pub type Configuration = DVector<f64>;

/// Number of grasp parameters.
pub const GRASP_DIM: usize = 3;
/// Number of values in a planar base pose.
pub const BASE_POSE_DIM: usize = 3;
/// Number of pick values (grasp + pick base pose).
pub const PICK_DIM: usize = GRASP_DIM + BASE_POSE_DIM;
/// Number of place values (place base pose).
pub const PLACE_DIM: usize = BASE_POSE_DIM;
/// Total candidate length.
pub const CANDIDATE_DIM: usize = PICK_DIM + PLACE_DIM;

/// Grasp parameters relative to the target object.
///
/// `height_portion` and `depth_portion` are fractions of the object's
/// extent along which the gripper closes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraspParams {
    /// Approach angle around the object's vertical axis.
    pub theta: f64,
    /// Grasp height as a fraction of object height.
    pub height_portion: f64,
    /// Grasp depth as a fraction of object depth.
    pub depth_portion: f64,
}

impl GraspParams {
    /// Creates grasp parameters.
    #[must_use]
    pub const fn new(theta: f64, height_portion: f64, depth_portion: f64) -> Self {
        Self {
            theta,
            height_portion,
            depth_portion,
        }
    }

    /// Returns the parameters in candidate order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; GRASP_DIM] {
        [self.theta, self.height_portion, self.depth_portion]
    }
}

/// Planar robot base pose.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasePose {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Heading.
    pub theta: f64,
}

impl BasePose {
    /// Creates a base pose.
    #[must_use]
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Returns the pose as a base configuration `(x, y, θ)`.
    #[must_use]
    pub fn to_configuration(&self) -> Configuration {
        DVector::from_row_slice(&self.to_array())
    }

    /// Reads a pose from a base configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::DimensionMismatch`] if the configuration does not
    /// have exactly three values.
    pub fn from_configuration(config: &Configuration) -> PapResult<Self> {
        if config.len() != BASE_POSE_DIM {
            return Err(PapError::DimensionMismatch {
                expected: BASE_POSE_DIM,
                actual: config.len(),
            });
        }
        Ok(Self::new(config[0], config[1], config[2]))
    }

    /// Returns the pose in candidate order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; BASE_POSE_DIM] {
        [self.x, self.y, self.theta]
    }
}

/// An unverified parameter vector proposed by a sampler.
///
/// # Example
///
/// ```
/// use pap_types::{BasePose, GraspParams, RawCandidate};
///
/// let raw = RawCandidate::from_parts(
///     GraspParams::new(0.0, 0.5, 0.5),
///     BasePose::new(1.0, 0.0, 0.0),
///     BasePose::new(4.0, 2.0, 1.57),
/// );
/// assert_eq!(raw.len(), 9);
/// assert_eq!(raw.place_base_pose().x, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct RawCandidate {
    values: Vec<f64>,
}

impl RawCandidate {
    /// Creates a candidate from its raw values.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::DimensionMismatch`] if `values` does not have
    /// [`CANDIDATE_DIM`] entries.
    pub fn new(values: Vec<f64>) -> PapResult<Self> {
        if values.len() != CANDIDATE_DIM {
            return Err(PapError::DimensionMismatch {
                expected: CANDIDATE_DIM,
                actual: values.len(),
            });
        }
        Ok(Self { values })
    }

    /// Creates a candidate from typed parts.
    #[must_use]
    pub fn from_parts(grasp: GraspParams, pick_base: BasePose, place_base: BasePose) -> Self {
        let mut values = Vec::with_capacity(CANDIDATE_DIM);
        values.extend_from_slice(&grasp.to_array());
        values.extend_from_slice(&pick_base.to_array());
        values.extend_from_slice(&place_base.to_array());
        Self { values }
    }

    /// Returns the raw values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of values (always [`CANDIDATE_DIM`]).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; candidates have a fixed, non-zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the pick portion (grasp + pick base pose).
    #[must_use]
    pub fn pick_values(&self) -> &[f64] {
        &self.values[..PICK_DIM]
    }

    /// Returns the place portion (place base pose).
    #[must_use]
    pub fn place_values(&self) -> &[f64] {
        &self.values[PICK_DIM..]
    }

    /// Returns the grasp parameters.
    #[must_use]
    pub fn grasp(&self) -> GraspParams {
        GraspParams::new(self.values[0], self.values[1], self.values[2])
    }

    /// Returns the pick base pose.
    #[must_use]
    pub fn pick_base_pose(&self) -> BasePose {
        BasePose::new(self.values[3], self.values[4], self.values[5])
    }

    /// Returns the place base pose.
    #[must_use]
    pub fn place_base_pose(&self) -> BasePose {
        BasePose::new(self.values[6], self.values[7], self.values[8])
    }
}

impl TryFrom<Vec<f64>> for RawCandidate {
    type Error = PapError;

    fn try_from(values: Vec<f64>) -> PapResult<Self> {
        Self::new(values)
    }
}

impl From<RawCandidate> for Vec<f64> {
    fn from(raw: RawCandidate) -> Self {
        raw.values
    }
}

/// A hyper-rectangle of admissible parameter values.
///
/// # Example
///
/// ```
/// use pap_types::ParamDomain;
///
/// let pick = ParamDomain::new(vec![0.0; 6], vec![1.0; 6]).unwrap();
/// let place = ParamDomain::new(vec![-5.0, -5.0, -3.14], vec![5.0, 5.0, 3.14]).unwrap();
/// let full = pick.concat(&place);
/// assert_eq!(full.dim(), 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "DomainBounds"))]
pub struct ParamDomain {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

/// Unchecked wire form of a [`ParamDomain`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct DomainBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<DomainBounds> for ParamDomain {
    type Error = PapError;

    fn try_from(bounds: DomainBounds) -> PapResult<Self> {
        Self::new(bounds.lower, bounds.upper)
    }
}

impl ParamDomain {
    /// Creates a domain from per-dimension bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::InvalidDomain`] if the bounds differ in length,
    /// are empty, are not finite, or if any lower bound exceeds its upper bound.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> PapResult<Self> {
        if lower.len() != upper.len() {
            return Err(PapError::invalid_domain(format!(
                "{} lower bounds but {} upper bounds",
                lower.len(),
                upper.len()
            )));
        }
        if lower.is_empty() {
            return Err(PapError::invalid_domain("domain has no dimensions"));
        }
        for (i, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(PapError::invalid_domain(format!(
                    "dimension {i} has a non-finite bound"
                )));
            }
            if lo > hi {
                return Err(PapError::invalid_domain(format!(
                    "dimension {i}: lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Concatenates two domains (`self` first).
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut lower = self.lower.clone();
        lower.extend_from_slice(&other.lower);
        let mut upper = self.upper.clone();
        upper.extend_from_slice(&other.upper);
        Self { lower, upper }
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Returns the lower bounds.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Returns the upper bounds.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Checks whether every value lies within its bounds.
    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.dim()
            && values
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }
}
