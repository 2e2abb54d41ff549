//! Pool state records read by the oracle
//!
//! These mirror the read interface of a Uniswap V3 style pool: the packed
//! `slot0`, one entry of the observation ring buffer, and the per-pool
//! result of a consult over a time window.

use crate::U256;

/// Current pool state relevant to oracle reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slot0 {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: U256,
    /// Current tick
    pub tick: i32,
    /// Index of the most recently written observation
    pub observation_index: u16,
    /// Number of populated-or-active slots in the observation buffer
    pub observation_cardinality: u16,
    /// Reserved capacity that becomes active once the buffer wraps
    pub observation_cardinality_next: u16,
}

/// One sample in a pool's observation ring buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    /// Block timestamp (seconds, mod 2^32) the observation was written at
    pub block_timestamp: u32,
    /// Tick multiplied by seconds elapsed, accumulated since pool creation
    pub tick_cumulative: i64,
    /// Seconds per in-range liquidity as Q128.128, truncated to 160 bits
    pub seconds_per_liquidity_cumulative_x128: U256,
    /// Whether the slot holds a real observation
    pub initialized: bool,
}

/// Mean tick and mean liquidity of one pool over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTwap {
    pub arithmetic_mean_tick: i32,
    pub harmonic_mean_liquidity: u128,
}

/// Tick paired with the weight it carries in an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedTick {
    pub tick: i32,
    pub weight: u128,
}

impl From<PoolTwap> for WeightedTick {
    fn from(twap: PoolTwap) -> Self {
        Self {
            tick: twap.arithmetic_mean_tick,
            weight: twap.harmonic_mean_liquidity,
        }
    }
}
