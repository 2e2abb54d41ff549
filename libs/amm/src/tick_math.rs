//! Tick to sqrt-price conversion
//!
//! Exact integer port of the concentrated-liquidity `getSqrtRatioAtTick`:
//! `sqrt(1.0001^tick) * 2^96`, composed from precomputed Q128.128 factors
//! for each bit of `|tick|` and rounded up to Q64.96.

use ethereum_types::U256;
use twap_types::{OracleError, OracleResult};

/// V3 tick math constants
pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

/// sqrt ratio at [`MIN_TICK`]
pub const MIN_SQRT_RATIO: U256 = U256([4295128739, 0, 0, 0]);
/// sqrt ratio at [`MAX_TICK`] (1461446703485210103287273052203988822378723970342)
pub const MAX_SQRT_RATIO: U256 = U256([0x5d951d5263988d26, 0xefd1fc6a50648849, 0xfffd8963, 0]);

/// sqrt(1.0001^(-2^i)) as Q128.128 for bit `i` of the absolute tick
const BIT_FACTORS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// Calculate sqrt(1.0001^tick) * 2^96
///
/// # Errors
/// [`OracleError::TickOutOfRange`] when `|tick| > MAX_TICK`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> OracleResult<U256> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK as u32 {
        return Err(OracleError::TickOutOfRange { tick: tick as i64 });
    }

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(BIT_FACTORS[0])
    } else {
        U256::one() << 128
    };

    for (bit, factor) in BIT_FACTORS.iter().enumerate().skip(1) {
        if abs_tick & (1 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so the result is never below the true ratio
    let remainder = ratio.low_u64() & 0xffff_ffff;
    let sqrt_price_x96 = (ratio >> 32) + if remainder == 0 { U256::zero() } else { U256::one() };

    Ok(sqrt_price_x96)
}
