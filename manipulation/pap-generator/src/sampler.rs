//! Candidate samplers.
//!
//! A [`Sampler`] proposes raw candidates one at a time. Two variants are
//! provided and are interchangeable wherever a `Sampler` is expected:
//!
//! - [`UniformSampler`]: independent uniform draws from a [`ParamDomain`]
//! - [`LearnedSampler`]: draws from an opaque [`GenerativeModel`] through a
//!   look-ahead buffer that is refilled in batches
//!
//! # Example
//!
//! ```
//! use pap_generator::sampler::{Sampler, UniformSampler};
//! use pap_types::ParamDomain;
//!
//! let pick = ParamDomain::new(vec![0.0; 6], vec![1.0; 6]).unwrap();
//! let place = ParamDomain::new(vec![-2.0; 3], vec![2.0; 3]).unwrap();
//! let mut sampler = UniformSampler::from_domains(&pick, &place)
//!     .unwrap()
//!     .with_seed(7);
//!
//! let candidate = sampler.draw().unwrap();
//! assert_eq!(candidate.len(), 9);
//! ```

use std::collections::VecDeque;

use pap_types::{CANDIDATE_DIM, PapError, PapResult, ParamDomain, RawCandidate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Default number of candidates generated per refill of a [`LearnedSampler`].
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Source of raw candidates.
///
/// Drawing must have no side effect on the world; it may be called an
/// unbounded number of times.
pub trait Sampler {
    /// Draws the next candidate.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::Sampler`] if no candidate can be produced.
    fn draw(&mut self) -> PapResult<RawCandidate>;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn draw(&mut self) -> PapResult<RawCandidate> {
        (**self).draw()
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn draw(&mut self) -> PapResult<RawCandidate> {
        (**self).draw()
    }
}

/// Draws each dimension independently and uniformly from a domain.
#[derive(Debug, Clone)]
pub struct UniformSampler {
    domain: ParamDomain,
    rng: StdRng,
}

impl UniformSampler {
    /// Creates a sampler over a full candidate domain, seeded from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::DimensionMismatch`] if the domain does not have
    /// one dimension per candidate value.
    pub fn new(domain: ParamDomain) -> PapResult<Self> {
        if domain.dim() != CANDIDATE_DIM {
            return Err(PapError::DimensionMismatch {
                expected: CANDIDATE_DIM,
                actual: domain.dim(),
            });
        }
        Ok(Self {
            domain,
            rng: StdRng::from_entropy(),
        })
    }

    /// Creates a sampler over the pick domain followed by the place domain.
    ///
    /// # Errors
    ///
    /// Returns [`PapError::DimensionMismatch`] if the concatenated domain
    /// does not match the candidate layout.
    pub fn from_domains(pick: &ParamDomain, place: &ParamDomain) -> PapResult<Self> {
        Self::new(pick.concat(place))
    }

    /// Reseeds the sampler for reproducible draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Returns the sampling domain.
    #[must_use]
    pub const fn domain(&self) -> &ParamDomain {
        &self.domain
    }
}

impl Sampler for UniformSampler {
    fn draw(&mut self) -> PapResult<RawCandidate> {
        let values = self
            .domain
            .lower()
            .iter()
            .zip(self.domain.upper())
            .map(|(&lo, &hi)| {
                if lo < hi {
                    self.rng.gen_range(lo..hi)
                } else {
                    lo
                }
            })
            .collect();
        RawCandidate::new(values)
    }
}

/// A generative model producing candidates conditioned on its own state.
///
/// The conditioning (abstract state, object, region, key configurations)
/// is fixed when the model is constructed; the sampler only asks for
/// batches.
pub trait GenerativeModel {
    /// Generates up to `n` candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot run.
    fn generate(&mut self, n: usize) -> PapResult<Vec<RawCandidate>>;
}

impl<M: GenerativeModel + ?Sized> GenerativeModel for Box<M> {
    fn generate(&mut self, n: usize) -> PapResult<Vec<RawCandidate>> {
        (**self).generate(n)
    }
}

/// Draws from a generative model through a look-ahead buffer.
///
/// # Example
///
/// ```
/// use pap_generator::sampler::{GenerativeModel, LearnedSampler, Sampler};
/// use pap_types::{PapResult, RawCandidate};
///
/// struct Constant;
///
/// impl GenerativeModel for Constant {
///     fn generate(&mut self, n: usize) -> PapResult<Vec<RawCandidate>> {
///         Ok(vec![RawCandidate::new(vec![0.5; 9])?; n])
///     }
/// }
///
/// let mut sampler = LearnedSampler::new(Constant).with_batch_size(4);
/// for _ in 0..10 {
///     sampler.draw().unwrap();
/// }
/// assert_eq!(sampler.refills(), 3);
/// ```
#[derive(Debug)]
pub struct LearnedSampler<M> {
    model: M,
    buffer: VecDeque<RawCandidate>,
    batch_size: usize,
    drawn: usize,
    refills: usize,
}

impl<M: GenerativeModel> LearnedSampler<M> {
    /// Creates a sampler around `model` with the default batch size.
    ///
    /// The buffer is filled lazily on the first draw.
    #[must_use]
    pub const fn new(model: M) -> Self {
        Self {
            model,
            buffer: VecDeque::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            drawn: 0,
            refills: 0,
        }
    }

    /// Sets the refill batch size (at least one).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Returns the number of candidates handed out.
    #[must_use]
    pub const fn drawn(&self) -> usize {
        self.drawn
    }

    /// Returns how many times the buffer was refilled.
    #[must_use]
    pub const fn refills(&self) -> usize {
        self.refills
    }

    /// Returns the number of candidates waiting in the buffer.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the wrapped model.
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    fn refill(&mut self) -> PapResult<()> {
        let batch = self.model.generate(self.batch_size)?;
        if batch.is_empty() {
            return Err(PapError::sampler("generative model returned an empty batch"));
        }
        debug!(
            batch = batch.len(),
            refills = self.refills + 1,
            "Refilled learned sampler buffer"
        );
        self.buffer.extend(batch);
        self.refills += 1;
        Ok(())
    }
}

impl<M: GenerativeModel> Sampler for LearnedSampler<M> {
    fn draw(&mut self) -> PapResult<RawCandidate> {
        if self.buffer.is_empty() {
            self.refill()?;
        }
        let candidate = self
            .buffer
            .pop_front()
            .ok_or_else(|| PapError::sampler("look-ahead buffer is empty after refill"))?;
        self.drawn += 1;
        Ok(candidate)
    }
}
