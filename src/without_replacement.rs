//! Weighted sampling of distinct indices.
//!
//! [`WeightedWithoutReplacement`] combines a [`Weighted`] strategy with a
//! [`UniformPermutation`]. Each draw picks a value uniformly over the weight
//! that is still live, maps it to a slot, and swap-removes that slot from both
//! the strategy and a slot → index table, so the chosen index cannot recur and
//! the remaining weights stay consistent without a rebuild. This is successive
//! sampling: every draw is proportional to the weights not yet drawn.
//!
//! Once only zero weights remain, the rest of the request is filled uniformly
//! from the permutation generator, so any `k <= len` can be served.
//!
//! Notes:
//! - The caller's generator is the only source of randomness for a sample; with
//!   a seeded generator, results are reproducible.
//! - `k` is bounded by the number of weights, not by their sum.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SamplerError};
use crate::permutation::UniformPermutation;
use crate::weighted::{checked_total, Weighted, WeightedBest};

/// Draws distinct weight-biased indices from a fixed list of weights.
#[derive(Debug)]
pub struct WeightedWithoutReplacement<W, R> {
    weighted: W,
    permutation: UniformPermutation,
    rng: R,
    population: usize,
    total: u64,
    /// Live slot → original index; mirrors every swap in `weighted`.
    slots: Vec<usize>,
}

impl WeightedWithoutReplacement<WeightedBest, ChaCha8Rng> {
    /// Adaptive strategy selection with a deterministic `ChaCha8Rng` source.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(WeightedBest::default(), ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<W: Weighted, R: Rng> WeightedWithoutReplacement<W, R> {
    /// Compose `weighted` with the random source `rng`.
    ///
    /// The sampler starts with an empty population.
    pub fn new(weighted: W, rng: R) -> Self {
        Self {
            weighted,
            permutation: UniformPermutation::default(),
            rng,
            population: 0,
            total: 0,
            slots: Vec::new(),
        }
    }

    /// Replace the population with `weights`.
    ///
    /// On failure the sampler is left with an empty population.
    ///
    /// # Errors
    ///
    /// [`SamplerError::Overflow`] if the weights do not sum into a `u64`, or
    /// whatever the strategy reports for weights it cannot hold.
    pub fn initialize(&mut self, weights: &[u64]) -> Result<()> {
        self.population = 0;
        self.total = 0;
        self.slots.clear();

        let total = checked_total(weights)?;
        self.weighted.initialize(weights)?;
        // Sized to the full population; `sample` narrows it to the live slots
        // before the zero-weight fallback draws from it.
        self.permutation.initialize(weights.len());

        self.population = weights.len();
        self.total = total;
        Ok(())
    }

    /// Draw `k` distinct indices into the weights.
    ///
    /// Indices are returned in draw order. `k == 0` always succeeds.
    ///
    /// # Errors
    ///
    /// [`SamplerError::OutOfRange`] if `k` exceeds the number of weights.
    pub fn sample(&mut self, k: usize) -> Result<Vec<usize>> {
        if k > self.population {
            return Err(SamplerError::OutOfRange {
                requested: k,
                population: self.population,
            });
        }
        let mut indices = Vec::with_capacity(k);
        if k == 0 {
            return Ok(indices);
        }

        self.weighted.reset();
        self.slots.clear();
        self.slots.extend(0..self.population);
        debug_assert_eq!(self.weighted.len(), self.slots.len());

        while indices.len() < k {
            let live = self.weighted.total_weight();
            if live == 0 {
                break;
            }
            let value = self.rng.random_range(0..live);
            let Some(slot) = self.weighted.sample(value) else {
                break;
            };
            self.weighted.swap_remove(slot);
            indices.push(self.slots.swap_remove(slot));
        }

        if indices.len() < k {
            log::trace!(
                "weights exhausted after {} draws, filling {} uniformly",
                indices.len(),
                k - indices.len()
            );
            self.permutation.initialize(self.slots.len());
            while indices.len() < k {
                match self.permutation.next(&mut self.rng) {
                    Some(position) => indices.push(self.slots[position]),
                    None => break,
                }
            }
        }
        Ok(indices)
    }

    /// Number of weights given to the last successful `initialize`.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Sum of the weights given to the last successful `initialize`.
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// The underlying strategy, e.g. to inspect `WeightedBest::selected`.
    pub fn sampler(&self) -> &W {
        &self.weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighted::{StrategyKind, WeightedArray, WeightedHeap, WeightedUniform};
    use std::collections::HashSet;

    fn seeded<W: Weighted>(weighted: W, seed: u64) -> WeightedWithoutReplacement<W, ChaCha8Rng> {
        WeightedWithoutReplacement::new(weighted, ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn zero_weight_loses_to_any_positive_weight() {
        let mut s = WeightedWithoutReplacement::from_seed(1);
        s.initialize(&[0, 1]).expect("init");
        for _ in 0..50 {
            assert_eq!(s.sample(1).expect("k <= len"), vec![1]);
        }
        // The zero weight can only come second.
        assert_eq!(s.sample(2).expect("k == len"), vec![1, 0]);
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let mut s = seeded(WeightedHeap::new(), 2);
        s.initialize(&[0; 6]).expect("init");
        assert_eq!(s.total_weight(), 0);
        for k in 0..=6 {
            let indices = s.sample(k).expect("k <= len");
            assert_eq!(indices.len(), k);
            let unique: HashSet<_> = indices.iter().collect();
            assert_eq!(unique.len(), k);
            assert!(indices.iter().all(|&i| i < 6));
        }
    }

    #[test]
    fn all_zero_fallback_covers_every_index() {
        let mut s = seeded(WeightedArray::new(), 3);
        s.initialize(&[0, 0, 0, 0]).expect("init");
        let mut firsts = HashSet::new();
        for _ in 0..200 {
            firsts.insert(s.sample(1).expect("k <= len")[0]);
        }
        assert_eq!(firsts.len(), 4);
    }

    #[test]
    fn positive_weights_come_before_zero_weights() {
        let weights = [0, 3, 0, 1, 0, 2];
        let mut s = seeded(WeightedUniform::default(), 4);
        s.initialize(&weights).expect("init");
        for _ in 0..100 {
            let indices = s.sample(weights.len()).expect("k == len");
            let mut head = indices[..3].to_vec();
            head.sort_unstable();
            assert_eq!(head, vec![1, 3, 5]);
            let mut tail = indices[3..].to_vec();
            tail.sort_unstable();
            assert_eq!(tail, vec![0, 2, 4]);
        }
    }

    #[test]
    fn out_of_range_checks_len_not_weight_sum() {
        let mut s = WeightedWithoutReplacement::from_seed(5);
        s.initialize(&[1, 1, 2]).expect("init");
        assert_eq!(
            s.sample(4),
            Err(SamplerError::OutOfRange {
                requested: 4,
                population: 3
            })
        );
        let mut all = s.sample(3).expect("k == len");
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2]);
        // Still bounded by the original population after earlier calls.
        assert!(s.sample(4).is_err());
    }

    #[test]
    fn uninitialized_sampler_has_empty_population() {
        let mut s = seeded(WeightedArray::new(), 6);
        assert_eq!(s.sample(0), Ok(Vec::new()));
        assert!(matches!(
            s.sample(1),
            Err(SamplerError::OutOfRange { population: 0, .. })
        ));
    }

    #[test]
    fn failed_initialize_discards_previous_population() {
        let mut s = WeightedWithoutReplacement::from_seed(7);
        s.initialize(&[1, 2, 3]).expect("init");
        assert_eq!(s.initialize(&[2, u64::MAX]), Err(SamplerError::Overflow));
        assert_eq!(s.population(), 0);
        assert!(s.sample(1).is_err());
        assert_eq!(s.sample(0), Ok(Vec::new()));
    }

    #[test]
    fn lone_uniform_strategy_surfaces_its_ceiling() {
        let mut s = seeded(WeightedUniform::new(3), 8);
        assert_eq!(
            s.initialize(&[2, 2]),
            Err(SamplerError::WeightsTooLarge { total: 4, max: 3 })
        );
        assert_eq!(s.population(), 0);
    }

    #[test]
    fn reinitialize_reflects_only_latest_weights() {
        let mut s = WeightedWithoutReplacement::from_seed(9);
        s.initialize(&[5, 5, 5, 5]).expect("init");
        s.sample(3).expect("k <= len");
        s.initialize(&[0, 0, 9]).expect("re-init");
        assert_eq!(s.population(), 3);
        assert_eq!(s.total_weight(), 9);
        for _ in 0..20 {
            assert_eq!(s.sample(1).expect("k <= len"), vec![2]);
        }
    }

    #[test]
    fn same_seed_same_samples() {
        let weights: Vec<u64> = (1..=40).collect();
        let mut a = WeightedWithoutReplacement::from_seed(10);
        let mut b = seeded(WeightedHeap::new(), 10);
        a.initialize(&weights).expect("init");
        b.initialize(&weights).expect("init");
        // Strategies agree on every lookup and the benchmark has its own
        // generator, so the streams match whichever strategy was selected.
        for k in [1, 5, 17, 40] {
            assert_eq!(a.sample(k), b.sample(k));
        }
    }

    #[test]
    fn initialize_sizes_permutation_to_population() {
        let mut s = seeded(WeightedArray::new(), 13);
        s.initialize(&[0, 0, 4, 0, 1]).expect("init");
        assert_eq!(s.permutation.len(), 5);
        assert_eq!(s.permutation.remaining(), 5);
        // Two positive weights drawn, three zero-weight slots left for the
        // fallback.
        s.sample(5).expect("k == len");
        assert_eq!(s.permutation.len(), 3);
        assert_eq!(s.permutation.remaining(), 0);
    }

    #[test]
    fn shared_across_threads_behind_a_lock() {
        use std::sync::{Arc, Mutex};

        fn assert_send<T: Send>() {}
        assert_send::<WeightedWithoutReplacement<WeightedBest, ChaCha8Rng>>();

        let shared = Arc::new(Mutex::new(WeightedWithoutReplacement::from_seed(14)));
        shared.lock().expect("lock").initialize(&[1, 2, 3, 4]).expect("init");
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let mut sampler = shared.lock().expect("lock");
                    sampler.sample(2)
                })
            })
            .collect();
        for handle in handles {
            let pair = handle.join().expect("thread").expect("k <= len");
            assert_eq!(pair.len(), 2);
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn best_selection_is_inspectable() {
        let mut s = WeightedWithoutReplacement::from_seed(11);
        assert_eq!(s.sampler().selected(), None);
        s.initialize(&[1, 2, 3]).expect("init");
        let selected = s.sampler().selected().expect("selected");
        assert_ne!(selected, StrategyKind::Best);
    }

    #[test]
    fn second_draw_follows_successive_sampling() {
        // weights [1, 1, 2]: P(second = 2 | first = 0) = 2/3.
        let mut s = seeded(WeightedArray::new(), 12);
        s.initialize(&[1, 1, 2]).expect("init");
        let (mut after_zero, mut then_two) = (0u32, 0u32);
        for _ in 0..20_000 {
            let pair = s.sample(2).expect("k <= len");
            if pair[0] == 0 {
                after_zero += 1;
                if pair[1] == 2 {
                    then_two += 1;
                }
            }
        }
        let ratio = f64::from(then_two) / f64::from(after_zero);
        assert!((ratio - 2.0 / 3.0).abs() < 0.03, "ratio was {ratio:.3}");
    }
}
