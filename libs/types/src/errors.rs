//! Error types for oracle queries, preparation and the underlying math
//!
//! Every variant aborts the call that produced it. Variants carry the
//! tier, pool and period context that caused the failure so callers never
//! have to guess which input was rejected.

use crate::{Address, FeeTier, Period};
use thiserror::Error;

/// Result alias used across the oracle workspace
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors raised by the oracle and its collaborators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The factory reports zero tick spacing for this fee
    #[error("Invalid fee tier {fee}: factory reports no tick spacing")]
    InvalidFeeTier { fee: FeeTier },

    /// The fee tier is already part of the registry
    #[error("Fee tier {fee} is already supported")]
    TierAlreadySupported { fee: FeeTier },

    /// A request scoped to specific tiers or pools produced no usable pool
    ///
    /// `period` is `None` when the request was sized by cardinality rather
    /// than by a time window.
    #[error("Given tiers {tiers:?} have no usable pool (period: {period:?})")]
    TierHasNoPool {
        tiers: Vec<FeeTier>,
        period: Option<Period>,
    },

    /// Aggregate weight of a non-empty pool set summed to zero
    #[error("Aggregate weight of {pools} pool(s) is zero")]
    DivideByZeroGuard { pools: usize },

    /// Pool reports an observation buffer of length zero
    #[error("Pool {pool:?} has zero observation cardinality")]
    ZeroCardinality { pool: Address },

    /// No pool is deployed at the given address
    #[error("No pool deployed at {pool:?}")]
    PoolNotFound { pool: Address },

    /// Target time predates the pool's oldest retained observation
    #[error("Pool {pool:?} cannot observe timestamp {target}: oldest observation is {oldest}")]
    ObservationTooOld {
        pool: Address,
        target: u32,
        oldest: u32,
    },

    /// A reservation target does not fit the pool's 16-bit cardinality
    #[error("Requested cardinality {requested} exceeds the maximum of {max}", max = u16::MAX)]
    CardinalityTooLarge { requested: u64 },

    /// Tick outside [MIN_TICK, MAX_TICK]
    #[error("Tick {tick} is out of range")]
    TickOutOfRange { tick: i64 },

    /// Fixed-width arithmetic overflowed or divided by zero
    #[error("Arithmetic overflow: {context}")]
    ArithmeticOverflow { context: &'static str },

    /// Configuration failed to load or validate
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
