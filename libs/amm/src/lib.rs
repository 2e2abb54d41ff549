//! # TWAP AMM Math - Exact Oracle Arithmetic
//!
//! ## Purpose
//!
//! Integer-exact math behind concentrated-liquidity price oracles: tick to
//! sqrt-price conversion, 512-bit multiply-divide, tick to quote conversion,
//! per-pool consult over a window and multi-pool tick aggregation. Also the
//! observation ring buffer a pool keeps its price history in.
//!
//! ## Integration Points
//!
//! - **Input Sources**: cumulative tick / seconds-per-liquidity readings from pools
//! - **Output Destinations**: the static oracle's quote aggregator and simulated pools
//! - **Precision**: no floating point; rounding matches the on-chain reference
//!   (floor toward negative infinity for mean ticks, round-up for sqrt ratios)

pub mod full_math;
pub mod observations;
pub mod oracle_math;
pub mod tick_math;

pub use full_math::mul_div;
pub use observations::{oldest_observation_index, Cumulatives, ObservationBuffer};
pub use oracle_math::{
    consult_from_cumulatives, quote_at_tick, weighted_arithmetic_mean_tick, MAX_U160,
};
pub use tick_math::{get_sqrt_ratio_at_tick, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
