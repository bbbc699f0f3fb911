//! Errors shared by every sampler in the crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = SamplerError> = std::result::Result<T, E>;

/// Errors returned by weighted strategies, the permutation generator and the
/// without-replacement composer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    /// The sum of the weights does not fit in a `u64`.
    #[error("sum of weights overflows u64")]
    Overflow,

    /// More distinct indices were requested than the population holds.
    #[error("requested {requested} distinct indices from a population of {population}")]
    OutOfRange { requested: usize, population: usize },

    /// The total weight exceeds the lookup-table ceiling of `WeightedUniform`.
    #[error("total weight {total} exceeds the uniform table ceiling {max}")]
    WeightsTooLarge { total: u64, max: u64 },

    /// `WeightedBest` has no candidate strategies to choose from.
    #[error("no candidate strategies configured")]
    NoCandidates,
}
