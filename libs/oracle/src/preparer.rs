//! Cardinality preparation
//!
//! Reserving observation slots is a forward-looking request: the pool only
//! starts filling the new slots as real time passes and observations are
//! written, so a freshly prepared pool is not immediately queryable for the
//! period it was prepared for.

use crate::collaborators::PoolHost;
use tracing::{info, warn};
use twap_types::{Address, OracleError, OracleResult, Period};

/// Slots needed to cover `period` at `cardinality_per_minute` observations per minute
///
/// `floor(period * cardinality_per_minute / 60) + 1`; always at least one.
pub fn cardinality_for_period(period: Period, cardinality_per_minute: u32) -> u64 {
    u64::from(period) * u64::from(cardinality_per_minute) / 60 + 1
}

/// Ask every pool in `pools` to reserve at least `cardinality` observation slots
///
/// Every pool is checked before any reservation is made, so a rejected call
/// leaves all pools untouched.
///
/// # Errors
/// - [`OracleError::CardinalityTooLarge`] if `cardinality` exceeds `u16::MAX`
/// - [`OracleError::ZeroCardinality`] if any pool was never initialized
pub fn prepare<H: PoolHost + ?Sized>(
    host: &H,
    pools: &[Address],
    cardinality: u64,
) -> OracleResult<()> {
    let target = u16::try_from(cardinality).map_err(|_| {
        warn!(cardinality, "Cardinality target exceeds pool limit");
        OracleError::CardinalityTooLarge {
            requested: cardinality,
        }
    })?;

    for pool in pools {
        if host.slot0(*pool)?.observation_cardinality == 0 {
            warn!(?pool, "Cannot reserve cardinality on uninitialized pool");
            return Err(OracleError::ZeroCardinality { pool: *pool });
        }
    }

    for pool in pools {
        host.increase_observation_cardinality_next(*pool, target)?;
    }
    info!(cardinality = target, pools = pools.len(), "Requested observation cardinality");
    Ok(())
}
