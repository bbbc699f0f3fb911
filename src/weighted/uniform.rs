use std::iter;

use super::{checked_total, StrategyKind, Weighted};
use crate::error::{Result, SamplerError};

/// Default ceiling on the total weight accepted by [`WeightedUniform`].
pub const DEFAULT_UNIFORM_MAX_WEIGHT: u64 = 1024;

/// Direct lookup-table strategy.
///
/// Expands the weights into a table with one entry per weight unit, so a
/// value indexes its slot directly. Only usable when the total weight is at
/// most `max_weight`; trades O(total) memory for O(1) lookups, which pays off
/// for small unit-like weights.
///
/// The table is laid out in slot order. Removing a slot rebuilds the table from
/// that slot's block onward.
#[derive(Debug, Clone)]
pub struct WeightedUniform {
    max_weight: u64,
    initial: Vec<u64>,
    weights: Vec<u64>,
    /// `offsets[i]` is where slot `i`'s block starts in `table`.
    offsets: Vec<u64>,
    table: Vec<usize>,
}

impl Default for WeightedUniform {
    fn default() -> Self {
        Self::new(DEFAULT_UNIFORM_MAX_WEIGHT)
    }
}

impl WeightedUniform {
    /// Create a strategy accepting total weights up to `max_weight`.
    pub fn new(max_weight: u64) -> Self {
        Self {
            max_weight,
            initial: Vec::new(),
            weights: Vec::new(),
            offsets: Vec::new(),
            table: Vec::new(),
        }
    }

    /// The configured ceiling on the total weight.
    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    fn rebuild_from(&mut self, first: usize) {
        self.offsets.truncate(first);
        let mut offset = match first.checked_sub(1) {
            Some(prev) => self.offsets[prev] + self.weights[prev],
            None => 0,
        };
        // Offsets never exceed the total, which was checked to fit in usize.
        self.table.truncate(offset as usize);
        for (slot, &weight) in self.weights.iter().enumerate().skip(first) {
            self.offsets.push(offset);
            self.table.extend(iter::repeat(slot).take(weight as usize));
            offset += weight;
        }
    }
}

impl Weighted for WeightedUniform {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Uniform
    }

    fn initialize(&mut self, weights: &[u64]) -> Result<()> {
        let total = checked_total(weights)?;
        if total > self.max_weight || usize::try_from(total).is_err() {
            return Err(SamplerError::WeightsTooLarge {
                total,
                max: self.max_weight,
            });
        }
        self.initial.clear();
        self.initial.extend_from_slice(weights);
        self.weights.clone_from(&self.initial);
        self.table.reserve(total as usize);
        self.rebuild_from(0);
        Ok(())
    }

    fn len(&self) -> usize {
        self.weights.len()
    }

    fn total_weight(&self) -> u64 {
        self.table.len() as u64
    }

    #[inline]
    fn sample(&self, value: u64) -> Option<usize> {
        let value = usize::try_from(value).ok()?;
        self.table.get(value).copied()
    }

    fn swap_remove(&mut self, slot: usize) -> u64 {
        let removed = self.weights.swap_remove(slot);
        self.rebuild_from(slot);
        removed
    }

    fn reset(&mut self) {
        if self.weights != self.initial {
            self.weights.clone_from(&self.initial);
            self.rebuild_from(0);
        }
    }
}
