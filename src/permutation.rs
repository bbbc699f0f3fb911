//! Uniform permutations, drawn lazily.
//!
//! [`UniformPermutation`] hands out the indices of `[0, n)` one at a time in
//! uniformly random order, never repeating one until it is reset. It runs a
//! Fisher–Yates shuffle over a *virtual* identity array: only positions whose
//! content has been displaced are stored, so drawing `k` indices costs
//! O(k) time and memory regardless of `n`.

use std::collections::HashMap;

use rand::Rng;

use crate::error::{Result, SamplerError};

/// Lazily shuffled permutation of `[0, len)`.
#[derive(Debug, Clone, Default)]
pub struct UniformPermutation {
    len: usize,
    drawn: usize,
    displaced: HashMap<usize, usize>,
}

impl UniformPermutation {
    /// A permutation of `[0, len)`.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            drawn: 0,
            displaced: HashMap::new(),
        }
    }

    /// Start over with a permutation of `[0, len)`.
    pub fn initialize(&mut self, len: usize) {
        self.len = len;
        self.reset();
    }

    /// Start over with the same population.
    pub fn reset(&mut self) {
        self.drawn = 0;
        self.displaced.clear();
    }

    /// Size of the population.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the population has no indices at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices not yet returned.
    pub fn remaining(&self) -> usize {
        self.len - self.drawn
    }

    /// Next index, uniform among those not yet returned.
    ///
    /// Returns `None` once all `len` indices have been produced.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.drawn >= self.len {
            return None;
        }
        let pick = rng.random_range(self.drawn..self.len);
        let value = self.at(pick);
        // Position `drawn` leaves the live range; its content takes the
        // picked position.
        let head = self.at(self.drawn);
        self.displaced.insert(pick, head);
        self.displaced.remove(&self.drawn);
        self.drawn += 1;
        Some(value)
    }

    /// Draw `count` distinct indices at once.
    ///
    /// # Errors
    ///
    /// [`SamplerError::OutOfRange`] if fewer than `count` indices remain; no
    /// index is consumed in that case.
    pub fn sample<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<Vec<usize>> {
        if count > self.remaining() {
            return Err(SamplerError::OutOfRange {
                requested: count,
                population: self.remaining(),
            });
        }
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            match self.next(rng) {
                Some(index) => out.push(index),
                None => break,
            }
        }
        Ok(out)
    }

    fn at(&self, position: usize) -> usize {
        self.displaced.get(&position).copied().unwrap_or(position)
    }
}
