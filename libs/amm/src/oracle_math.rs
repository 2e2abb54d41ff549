//! Oracle math: per-pool consult, multi-pool tick aggregation and tick-to-quote conversion
//!
//! All functions are pure and operate on values already read from pools, so
//! they can be exercised without any pool or factory behind them.

use crate::full_math::mul_div;
use crate::tick_math::{get_sqrt_ratio_at_tick, MAX_TICK, MIN_TICK};
use ethereum_types::U256;
use ethnum::I256;
use twap_types::{Address, OracleError, OracleResult, PoolTwap, WeightedTick};

/// 2^160 - 1, the width of seconds-per-liquidity cumulatives
pub const MAX_U160: U256 = U256([u64::MAX, u64::MAX, 0xffff_ffff, 0]);

/// Derive mean tick and mean liquidity from two cumulative readings `period` seconds apart
///
/// `tick_cumulatives` and `seconds_per_liquidity_x128s` are ordered oldest first.
/// The arithmetic mean tick rounds toward negative infinity; the harmonic mean
/// liquidity is `period * (2^160 - 1) / (delta_seconds_per_liquidity << 32)`.
pub fn consult_from_cumulatives(
    period: u32,
    tick_cumulatives: [i64; 2],
    seconds_per_liquidity_x128s: [U256; 2],
) -> OracleResult<PoolTwap> {
    if period == 0 {
        return Err(OracleError::ArithmeticOverflow {
            context: "consult period is zero",
        });
    }

    let tick_cumulative_delta = tick_cumulatives[1].wrapping_sub(tick_cumulatives[0]);
    let period_i64 = i64::from(period);
    let mut mean_tick = tick_cumulative_delta / period_i64;
    if tick_cumulative_delta < 0 && tick_cumulative_delta % period_i64 != 0 {
        mean_tick -= 1;
    }
    if mean_tick < MIN_TICK as i64 || mean_tick > MAX_TICK as i64 {
        return Err(OracleError::TickOutOfRange { tick: mean_tick });
    }

    let seconds_per_liquidity_delta = seconds_per_liquidity_x128s[1]
        .overflowing_sub(seconds_per_liquidity_x128s[0])
        .0
        & MAX_U160;
    let denominator = seconds_per_liquidity_delta << 32;
    if denominator.is_zero() {
        return Err(OracleError::ArithmeticOverflow {
            context: "seconds-per-liquidity did not advance over the period",
        });
    }
    let harmonic = (U256::from(period) * MAX_U160) / denominator;
    if harmonic > U256::from(u128::MAX) {
        return Err(OracleError::ArithmeticOverflow {
            context: "harmonic mean liquidity exceeds 128 bits",
        });
    }

    Ok(PoolTwap {
        arithmetic_mean_tick: mean_tick as i32,
        harmonic_mean_liquidity: harmonic.low_u128(),
    })
}

/// Weighted arithmetic mean of ticks, rounded toward negative infinity
///
/// # Errors
/// [`OracleError::DivideByZeroGuard`] if the weights sum to zero (including an
/// empty slice).
pub fn weighted_arithmetic_mean_tick(weighted_ticks: &[WeightedTick]) -> OracleResult<i32> {
    let mut numerator = I256::ZERO;
    let mut denominator = I256::ZERO;
    for weighted in weighted_ticks {
        let weight = I256::from(weighted.weight);
        numerator += I256::from(weighted.tick) * weight;
        denominator += weight;
    }

    if denominator == I256::ZERO {
        return Err(OracleError::DivideByZeroGuard {
            pools: weighted_ticks.len(),
        });
    }

    let mut mean = numerator / denominator;
    if numerator < I256::ZERO && numerator % denominator != I256::ZERO {
        mean -= I256::ONE;
    }

    let mean = mean.as_i128();
    if mean < MIN_TICK as i128 || mean > MAX_TICK as i128 {
        return Err(OracleError::TickOutOfRange { tick: mean as i64 });
    }
    Ok(mean as i32)
}

/// Convert `base_amount` of `base_token` into `quote_token` at the price implied by `tick`
///
/// Price at a tick is `token1 / token0` where token0 is the lower address, so
/// the ratio is inverted when the base token sorts after the quote token.
pub fn quote_at_tick(
    tick: i32,
    base_amount: u128,
    base_token: Address,
    quote_token: Address,
) -> OracleResult<U256> {
    let sqrt_ratio_x96 = get_sqrt_ratio_at_tick(tick)?;
    let base_amount = U256::from(base_amount);
    let base_is_token0 = base_token < quote_token;

    if sqrt_ratio_x96 <= U256::from(u128::MAX) {
        let ratio_x192 = sqrt_ratio_x96 * sqrt_ratio_x96;
        let q192 = U256::one() << 192;
        if base_is_token0 {
            mul_div(ratio_x192, base_amount, q192)
        } else {
            mul_div(q192, base_amount, ratio_x192)
        }
    } else {
        let ratio_x128 = mul_div(sqrt_ratio_x96, sqrt_ratio_x96, U256::one() << 64)?;
        let q128 = U256::one() << 128;
        if base_is_token0 {
            mul_div(ratio_x128, base_amount, q128)
        } else {
            mul_div(q128, base_amount, ratio_x128)
        }
    }
}
