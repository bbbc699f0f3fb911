//! `chusen`: weighted sampling of distinct indices over integer weights.
//!
//! Hand the sampler a list of non-negative integer weights once, then ask for
//! any number of samples of `k` distinct indices, each draw biased by weight.
//! Typical callers pick validators, peers or shards for a round.
//!
//! Exposed modules:
//! - `weighted`: with-replacement lookup strategies (array scan, binary tree of
//!   subtree sums, direct lookup table) and a benchmark-driven selector.
//! - `permutation`: lazily shuffled uniform permutations.
//! - `without_replacement`: the composer drawing distinct indices.
//!
//! Every API that draws takes a caller-supplied `rand::Rng`, so results are
//! reproducible under a seeded generator.

#![forbid(unsafe_code)]

pub mod error;
pub mod permutation;
pub mod weighted;
pub mod without_replacement;

pub use error::{Result, SamplerError};
pub use permutation::UniformPermutation;
pub use weighted::{
    checked_total, BestConfig, InstantTimer, Strategy, StrategyKind, Timer, Weighted,
    WeightedArray, WeightedBest, WeightedHeap, WeightedUniform, DEFAULT_UNIFORM_MAX_WEIGHT,
};
pub use without_replacement::WeightedWithoutReplacement;
