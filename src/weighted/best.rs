//! Benchmark-driven strategy selection.
//!
//! The fastest strategy depends on the population size and on how the weights
//! are distributed, neither of which is known before `initialize`. So
//! [`WeightedBest`] initializes every candidate against the real weights, runs
//! a fixed batch of lookups on each, and keeps the one that finished first.
//!
//! The lookup values come from a private `ChaCha8Rng` with a fixed seed: the
//! measurement never draws from the caller's generator, and the values are the
//! same on every run. Time is read through the [`Timer`] trait so tests can
//! script the outcome.

use std::fmt;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    checked_total, Strategy, StrategyKind, Weighted, WeightedArray, WeightedHeap, WeightedUniform,
    DEFAULT_UNIFORM_MAX_WEIGHT,
};
use crate::error::{Result, SamplerError};

/// A monotonic clock read by the selector.
pub trait Timer {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&mut self) -> Duration;
}

/// [`Timer`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct InstantTimer {
    origin: Instant,
}

impl Default for InstantTimer {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Timer for InstantTimer {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Tuning for [`WeightedBest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestConfig {
    /// Lookups timed per candidate.
    pub benchmark_iterations: usize,
    /// Seed of the private benchmark generator.
    pub benchmark_seed: u64,
    /// Ceiling handed to the default `WeightedUniform` candidate.
    pub uniform_max_weight: u64,
}

impl Default for BestConfig {
    fn default() -> Self {
        Self {
            benchmark_iterations: 30,
            benchmark_seed: 0x5eed_5a3b_1e5e_1ec7,
            uniform_max_weight: DEFAULT_UNIFORM_MAX_WEIGHT,
        }
    }
}

impl BestConfig {
    /// Set the number of timed lookups per candidate.
    pub fn with_benchmark_iterations(mut self, iterations: usize) -> Self {
        self.benchmark_iterations = iterations;
        self
    }

    /// Set the seed of the benchmark generator.
    pub fn with_benchmark_seed(mut self, seed: u64) -> Self {
        self.benchmark_seed = seed;
        self
    }

    /// Set the ceiling of the default uniform-table candidate.
    pub fn with_uniform_max_weight(mut self, max_weight: u64) -> Self {
        self.uniform_max_weight = max_weight;
        self
    }
}

/// A [`Weighted`] strategy that delegates to the fastest of its candidates.
pub struct WeightedBest {
    config: BestConfig,
    candidates: Vec<Strategy>,
    selected: Option<usize>,
    timer: Box<dyn Timer + Send>,
}

impl Default for WeightedBest {
    fn default() -> Self {
        Self::new(BestConfig::default())
    }
}

impl fmt::Debug for WeightedBest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedBest")
            .field("config", &self.config)
            .field("candidates", &self.candidates)
            .field("selected", &self.selected())
            .finish_non_exhaustive()
    }
}

impl WeightedBest {
    /// Array, heap and uniform-table candidates, timed with [`InstantTimer`].
    pub fn new(config: BestConfig) -> Self {
        let candidates = vec![
            WeightedArray::new().into(),
            WeightedHeap::new().into(),
            WeightedUniform::new(config.uniform_max_weight).into(),
        ];
        Self::with_candidates(config, candidates)
    }

    /// Choose among an explicit candidate list.
    ///
    /// Earlier candidates win ties.
    pub fn with_candidates(config: BestConfig, candidates: Vec<Strategy>) -> Self {
        Self {
            config,
            candidates,
            selected: None,
            timer: Box::new(InstantTimer::default()),
        }
    }

    /// Replace the clock used for measurements.
    pub fn with_timer(mut self, timer: impl Timer + Send + 'static) -> Self {
        self.timer = Box::new(timer);
        self
    }

    /// The configuration this selector was built with.
    pub fn config(&self) -> &BestConfig {
        &self.config
    }

    /// The strategy chosen by the last successful `initialize`.
    pub fn selected(&self) -> Option<StrategyKind> {
        self.chosen().map(Weighted::kind)
    }

    fn chosen(&self) -> Option<&Strategy> {
        self.selected.and_then(|i| self.candidates.get(i))
    }

    fn chosen_mut(&mut self) -> Option<&mut Strategy> {
        self.selected.and_then(|i| self.candidates.get_mut(i))
    }

    fn benchmark_values(&self, total: u64) -> Vec<u64> {
        if total == 0 {
            return Vec::new();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.benchmark_seed);
        (0..self.config.benchmark_iterations)
            .map(|_| rng.random_range(0..total))
            .collect()
    }
}

/// The first of `values` that `candidate` maps to no slot.
fn first_unanswered(candidate: &Strategy, values: &[u64]) -> Option<u64> {
    values
        .iter()
        .copied()
        .find(|&value| candidate.sample(value).is_none())
}

impl Weighted for WeightedBest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Best
    }

    fn initialize(&mut self, weights: &[u64]) -> Result<()> {
        self.selected = None;
        let total = checked_total(weights)?;
        if self.candidates.is_empty() {
            return Err(SamplerError::NoCandidates);
        }
        let values = self.benchmark_values(total);

        let mut first_error = None;
        let mut fastest: Option<(usize, Duration)> = None;
        for (i, candidate) in self.candidates.iter_mut().enumerate() {
            let start = self.timer.now();
            if let Err(err) = candidate.initialize(weights) {
                log::debug!(
                    "{:?} candidate rejected {} weights: {err}",
                    candidate.kind(),
                    weights.len()
                );
                first_error.get_or_insert(err);
                continue;
            }
            if let Some(value) = first_unanswered(candidate, &values) {
                log::debug!(
                    "{:?} candidate could not place benchmark value {value}",
                    candidate.kind()
                );
                continue;
            }
            let elapsed = self.timer.now().saturating_sub(start);
            log::trace!("{:?} candidate took {elapsed:?}", candidate.kind());
            if fastest.map_or(true, |(_, best)| elapsed < best) {
                fastest = Some((i, elapsed));
            }
        }

        match fastest {
            Some((i, elapsed)) => {
                self.selected = Some(i);
                log::debug!(
                    "selected {:?} strategy for {} weights (total {total}) in {elapsed:?}",
                    self.candidates[i].kind(),
                    weights.len(),
                );
                Ok(())
            }
            None => {
                log::warn!("no candidate strategy accepted {} weights", weights.len());
                Err(first_error.unwrap_or(SamplerError::NoCandidates))
            }
        }
    }

    fn len(&self) -> usize {
        self.chosen().map_or(0, Weighted::len)
    }

    fn total_weight(&self) -> u64 {
        self.chosen().map_or(0, Weighted::total_weight)
    }

    fn sample(&self, value: u64) -> Option<usize> {
        self.chosen()?.sample(value)
    }

    fn swap_remove(&mut self, slot: usize) -> u64 {
        match self.chosen_mut() {
            Some(chosen) => chosen.swap_remove(slot),
            None => panic!("swap_remove index (is {slot}) should be < len (is 0)"),
        }
    }

    fn reset(&mut self) {
        if let Some(chosen) = self.chosen_mut() {
            chosen.reset();
        }
    }
}
