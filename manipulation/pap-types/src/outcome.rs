//! Feasibility statuses, attempt labels and the append-only attempt log.
//!
//! Every raw candidate a generator draws is recorded in an [`AttemptLog`]
//! together with an [`AttemptLabel`] describing how far it got through the
//! pipeline. Labels form a closed set so they can be used directly as a
//! training signal for learned samplers.
//!
//! A candidate that passes the feasibility check is first recorded as
//! [`AttemptLabel::PendingMotion`]. Once motion planning has decided its
//! fate, the log *appends* a resolution record carrying the same sequence
//! number; it never rewrites an existing record.
//!
//! # Example
//!
//! ```
//! use pap_types::{AttemptLabel, AttemptLog, RawCandidate};
//!
//! let mut log = AttemptLog::new();
//! let raw = RawCandidate::new(vec![0.0; 9]).unwrap();
//!
//! log.record(raw.clone(), AttemptLabel::PickInfeasible);
//! let pending = log.record(raw, AttemptLabel::PendingMotion);
//! log.resolve(pending, AttemptLabel::Feasible).unwrap();
//!
//! assert_eq!(log.entries().len(), 3);
//! assert_eq!(log.attempt_count(), 2);
//! assert_eq!(log.final_label(pending), Some(AttemptLabel::Feasible));
//! ```

use std::fmt;

use crate::candidate::RawCandidate;
use crate::error::{PapError, PapResult};

/// Status returned by a feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeasibilityStatus {
    /// Both pick and place are kinematically feasible.
    HasSolution,
    /// The pick stage failed.
    PickFailed,
    /// The pick stage succeeded but the place stage failed.
    PlaceFailed,
    /// No feasible candidate was found at all.
    NoSolution,
}

/// Why the pick stage rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PickFailure {
    /// The robot base is in collision at the pick base pose.
    BaseInCollision,
    /// No inverse-kinematics solution exists for the grasp.
    NoIkSolution,
    /// The robot is in collision in the grasp configuration.
    GraspInCollision,
    /// The robot leaves the operating region in the grasp configuration.
    OutsideOperatingRegion,
    /// The world refused the pick, e.g. because an object is already held.
    PickRefused,
}

/// Why the place stage rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaceFailure {
    /// The robot or the held object is in collision at the place pose.
    PlacementInCollision,
    /// The held object would not lie inside the target region.
    OutsideTargetRegion,
    /// The world refused to execute the pick or the release.
    PlaceRefused,
}

/// Outcome label of one sampled candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttemptLabel {
    /// Rejected by the pick stage of the feasibility check.
    PickInfeasible,
    /// Rejected by the place stage of the feasibility check.
    PlaceInfeasible,
    /// Passed the feasibility check; motion not yet decided.
    PendingMotion,
    /// No pick motion found within the iteration schedule.
    PickMotionInfeasible,
    /// Pick motion found but no place motion.
    PlaceMotionInfeasible,
    /// Both motions found.
    Feasible,
}

impl AttemptLabel {
    /// Returns the integer code used as a training target.
    ///
    /// `-3` pick infeasible, `-2` place infeasible, `-1` pick motion
    /// infeasible, `0` place motion infeasible, `1` feasible. Pending
    /// attempts have no code.
    ///
    /// ```
    /// use pap_types::AttemptLabel;
    ///
    /// assert_eq!(AttemptLabel::PickInfeasible.training_code(), Some(-3));
    /// assert_eq!(AttemptLabel::Feasible.training_code(), Some(1));
    /// assert_eq!(AttemptLabel::PendingMotion.training_code(), None);
    /// ```
    #[must_use]
    pub const fn training_code(self) -> Option<i8> {
        match self {
            Self::PickInfeasible => Some(-3),
            Self::PlaceInfeasible => Some(-2),
            Self::PickMotionInfeasible => Some(-1),
            Self::PlaceMotionInfeasible => Some(0),
            Self::Feasible => Some(1),
            Self::PendingMotion => None,
        }
    }

    /// Returns `true` for the pending label.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::PendingMotion)
    }

    /// Returns the label recorded for a feasibility status.
    ///
    /// `NoSolution` is a call-level status and maps to `None`.
    #[must_use]
    pub const fn from_status(status: FeasibilityStatus) -> Option<Self> {
        match status {
            FeasibilityStatus::HasSolution => Some(Self::PendingMotion),
            FeasibilityStatus::PickFailed => Some(Self::PickInfeasible),
            FeasibilityStatus::PlaceFailed => Some(Self::PlaceInfeasible),
            FeasibilityStatus::NoSolution => None,
        }
    }
}

/// Sequence number of an attempt within one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttemptId(usize);

impl AttemptId {
    /// Returns the zero-based sequence number.
    #[must_use]
    pub const fn sequence(self) -> usize {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry in the attempt log.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttemptRecord {
    /// Attempt this entry belongs to.
    pub id: AttemptId,
    /// The raw candidate that was drawn.
    pub raw: RawCandidate,
    /// Outcome label.
    pub label: AttemptLabel,
}

/// Append-only log of attempts for one generation call.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttemptLog {
    entries: Vec<AttemptRecord>,
    attempts: usize,
}

impl AttemptLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new attempt and returns its id.
    pub fn record(&mut self, raw: RawCandidate, label: AttemptLabel) -> AttemptId {
        let id = AttemptId(self.attempts);
        self.attempts += 1;
        self.entries.push(AttemptRecord { id, raw, label });
        id
    }

    /// Appends the resolved label for an existing attempt.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::UnknownAttempt`] if `id` was not issued by this log.
    pub fn resolve(&mut self, id: AttemptId, label: AttemptLabel) -> PapResult<()> {
        let raw = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.raw.clone())
            .ok_or(PapError::UnknownAttempt(id.0))?;
        self.entries.push(AttemptRecord { id, raw, label });
        Ok(())
    }

    /// Returns every entry in append order, resolution entries included.
    #[must_use]
    pub fn entries(&self) -> &[AttemptRecord] {
        &self.entries
    }

    /// Returns the number of distinct attempts.
    #[must_use]
    pub const fn attempt_count(&self) -> usize {
        self.attempts
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attempts == 0
    }

    /// Returns the latest label recorded for `id`.
    #[must_use]
    pub fn final_label(&self, id: AttemptId) -> Option<AttemptLabel> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.id == id)
            .map(|e| e.label)
    }

    /// Returns one record per attempt, in sequence order, carrying its final label.
    #[must_use]
    pub fn final_records(&self) -> Vec<AttemptRecord> {
        let mut finals: Vec<Option<AttemptRecord>> = vec![None; self.attempts];
        for entry in &self.entries {
            finals[entry.id.0] = Some(entry.clone());
        }
        finals.into_iter().flatten().collect()
    }

    /// Counts attempts whose final label equals `label`.
    #[must_use]
    pub fn count_final(&self, label: AttemptLabel) -> usize {
        self.final_records()
            .iter()
            .filter(|r| r.label == label)
            .count()
    }
}
