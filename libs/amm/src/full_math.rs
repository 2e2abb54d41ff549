//! 512-bit intermediate multiply-divide

use ethereum_types::{U256, U512};
use twap_types::{OracleError, OracleResult};

/// Calculate `floor(a * b / denominator)` without losing the high bits of the product
///
/// # Errors
/// [`OracleError::ArithmeticOverflow`] when `denominator` is zero or the
/// quotient does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> OracleResult<U256> {
    if denominator.is_zero() {
        return Err(OracleError::ArithmeticOverflow {
            context: "mul_div denominator is zero",
        });
    }

    let quotient: U512 = a.full_mul(b) / U512::from(denominator);
    narrow(quotient)
}

fn narrow(value: U512) -> OracleResult<U256> {
    let U512(limbs) = value;
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return Err(OracleError::ArithmeticOverflow {
            context: "mul_div result exceeds 256 bits",
        });
    }
    Ok(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}
