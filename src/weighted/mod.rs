//! With-replacement weighted lookup strategies.
//!
//! Every strategy answers one question: given a value `v` in `[0, total)`,
//! which slot `i` satisfies
//!
//! \[
//! \sum_{j < i} w_j \le v < \sum_{j \le i} w_j
//! \]
//!
//! Zero-weight slots own an empty interval, so they are never returned while
//! still occupying a position. Because the interval is defined over slot order,
//! all strategies return the same slot for the same value; they only differ in
//! cost:
//!
//! | strategy | lookup | removal | memory |
//! |---|---|---|---|
//! | [`WeightedArray`] | O(n) | O(1) | O(n) |
//! | [`WeightedHeap`] | O(log n) | O(log n) | O(n) |
//! | [`WeightedUniform`] | O(1) | O(total) | O(total) |
//!
//! [`WeightedBest`] measures the candidates against the real weights once and
//! delegates to the fastest.
//!
//! Besides lookups, strategies keep a *live range* that the without-replacement
//! composer shrinks with [`Weighted::swap_remove`]: the last live slot moves
//! into the removed one, mirroring [`Vec::swap_remove`]. [`Weighted::reset`]
//! restores the weights passed to the last `initialize`.

use rand::Rng;

use crate::error::{Result, SamplerError};

mod array;
mod best;
mod heap;
mod uniform;

pub use array::WeightedArray;
pub use best::{BestConfig, InstantTimer, Timer, WeightedBest};
pub use heap::WeightedHeap;
pub use uniform::{WeightedUniform, DEFAULT_UNIFORM_MAX_WEIGHT};

/// Identifies a strategy implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Array,
    Heap,
    Uniform,
    Best,
}

/// A weighted lookup over a fixed list of integer weights.
pub trait Weighted {
    /// Which implementation this is.
    fn kind(&self) -> StrategyKind;

    /// Replace all state with `weights`.
    ///
    /// # Errors
    ///
    /// [`SamplerError::Overflow`] if the weights do not sum into a `u64`, or a
    /// strategy-specific error if the strategy cannot represent them.
    fn initialize(&mut self, weights: &[u64]) -> Result<()>;

    /// Number of live slots.
    fn len(&self) -> usize;

    /// Whether there are no live slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the live weights.
    fn total_weight(&self) -> u64;

    /// Map `value` to the slot whose cumulative interval contains it.
    ///
    /// Returns `None` when `value >= total_weight()`.
    fn sample(&self, value: u64) -> Option<usize>;

    /// Remove `slot` from the live range, moving the last live slot into its
    /// place. Returns the removed weight.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len()`.
    fn swap_remove(&mut self, slot: usize) -> u64;

    /// Undo every `swap_remove` since the last `initialize`.
    fn reset(&mut self);

    /// A single with-replacement draw over the live weights.
    ///
    /// Returns `None` when the live total weight is zero.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        self.sample(rng.random_range(0..total))
    }
}

/// Sum `weights`, reporting overflow instead of wrapping.
pub fn checked_total(weights: &[u64]) -> Result<u64> {
    weights.iter().try_fold(0u64, |total, &weight| {
        total.checked_add(weight).ok_or(SamplerError::Overflow)
    })
}

/// The closed set of strategies, usable wherever a single concrete
/// [`Weighted`] type is needed (e.g. as `WeightedBest` candidates).
#[derive(Debug)]
pub enum Strategy {
    Array(WeightedArray),
    Heap(WeightedHeap),
    Uniform(WeightedUniform),
    Best(Box<WeightedBest>),
}

macro_rules! dispatch {
    ($strategy:expr, $inner:ident => $body:expr) => {
        match $strategy {
            Strategy::Array($inner) => $body,
            Strategy::Heap($inner) => $body,
            Strategy::Uniform($inner) => $body,
            Strategy::Best($inner) => $body,
        }
    };
}

impl Weighted for Strategy {
    fn kind(&self) -> StrategyKind {
        dispatch!(self, s => s.kind())
    }

    fn initialize(&mut self, weights: &[u64]) -> Result<()> {
        dispatch!(self, s => s.initialize(weights))
    }

    fn len(&self) -> usize {
        dispatch!(self, s => s.len())
    }

    fn total_weight(&self) -> u64 {
        dispatch!(self, s => s.total_weight())
    }

    fn sample(&self, value: u64) -> Option<usize> {
        dispatch!(self, s => s.sample(value))
    }

    fn swap_remove(&mut self, slot: usize) -> u64 {
        dispatch!(self, s => s.swap_remove(slot))
    }

    fn reset(&mut self) {
        dispatch!(self, s => s.reset())
    }
}

impl From<WeightedArray> for Strategy {
    fn from(s: WeightedArray) -> Self {
        Strategy::Array(s)
    }
}

impl From<WeightedHeap> for Strategy {
    fn from(s: WeightedHeap) -> Self {
        Strategy::Heap(s)
    }
}

impl From<WeightedUniform> for Strategy {
    fn from(s: WeightedUniform) -> Self {
        Strategy::Uniform(s)
    }
}

impl From<WeightedBest> for Strategy {
    fn from(s: WeightedBest) -> Self {
        Strategy::Best(Box::new(s))
    }
}
