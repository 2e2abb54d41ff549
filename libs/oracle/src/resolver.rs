//! Pool resolution
//!
//! Turns a list of fee tiers into deployed pool addresses for a token pair.
//! Tiers without a pool are dropped; the surviving pools keep the order of
//! the tiers they came from.

use crate::collaborators::PoolFactory;
use crate::registry::FeeTierRegistry;
use tracing::{debug, warn};
use twap_types::{Address, FeeTier, OracleError, OracleResult, Period};

/// Pools for `tiers`, skipping tiers the factory has no pool for
pub fn resolve_pools_for_tiers<F: PoolFactory + ?Sized>(
    factory: &F,
    token_a: Address,
    token_b: Address,
    tiers: &[FeeTier],
) -> OracleResult<Vec<Address>> {
    let mut pools = Vec::with_capacity(tiers.len());
    for tier in tiers {
        match factory.get_pool(token_a, token_b, *tier)? {
            Some(pool) if !pool.is_zero() => {
                debug!(fee = %tier, ?pool, "Resolved pool");
                pools.push(pool);
            }
            _ => debug!(fee = %tier, ?token_a, ?token_b, "No pool for tier"),
        }
    }
    Ok(pools)
}

/// Pools for every tier in `registry`, in registry order
pub fn resolve_pools_for_all_tiers<F: PoolFactory + ?Sized>(
    factory: &F,
    token_a: Address,
    token_b: Address,
    registry: &FeeTierRegistry,
) -> OracleResult<Vec<Address>> {
    resolve_pools_for_tiers(factory, token_a, token_b, registry.known())
}

/// Pools for a caller-chosen subset of tiers; fails if none of them has a pool
///
/// `period` is only carried into the error for context.
pub fn resolve_pools_for_specific_tiers<F: PoolFactory + ?Sized>(
    factory: &F,
    token_a: Address,
    token_b: Address,
    tiers: &[FeeTier],
    period: Option<Period>,
) -> OracleResult<Vec<Address>> {
    let pools = resolve_pools_for_tiers(factory, token_a, token_b, tiers)?;
    if pools.is_empty() {
        warn!(?tiers, ?token_a, ?token_b, "Requested tiers have no pool");
        return Err(OracleError::TierHasNoPool {
            tiers: tiers.to_vec(),
            period,
        });
    }
    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct PoolTable(HashMap<FeeTier, Address>);

    impl PoolFactory for PoolTable {
        fn get_pool(&self, _: Address, _: Address, fee: FeeTier) -> OracleResult<Option<Address>> {
            Ok(self.0.get(&fee).copied())
        }

        fn fee_amount_tick_spacing(&self, _: FeeTier) -> OracleResult<i32> {
            Ok(1)
        }
    }

    fn pool(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn table() -> PoolTable {
        PoolTable(HashMap::from([
            (FeeTier::LOW, pool(5)),
            (FeeTier::HIGH, pool(10)),
            // A zero address is the factory's "no pool" sentinel
            (FeeTier::LOWEST, Address::zero()),
        ]))
    }

    #[test]
    fn test_missing_tiers_dropped_order_kept() {
        let pools = resolve_pools_for_tiers(
            &table(),
            pool(1),
            pool(2),
            &[FeeTier::HIGH, FeeTier::MEDIUM, FeeTier::LOW, FeeTier::LOWEST],
        )
        .unwrap();
        assert_eq!(pools, vec![pool(10), pool(5)]);
    }

    #[test]
    fn test_all_tiers_follow_registry_order() {
        let mut registry = FeeTierRegistry::new();
        registry.add(&table(), FeeTier::LOWEST).unwrap();
        let pools = resolve_pools_for_all_tiers(&table(), pool(1), pool(2), &registry).unwrap();
        assert_eq!(pools, vec![pool(5), pool(10)]);
    }

    #[test]
    fn test_specific_tiers_without_pool_fail() {
        let result = resolve_pools_for_specific_tiers(
            &table(),
            pool(1),
            pool(2),
            &[FeeTier::MEDIUM],
            Some(60),
        );
        assert_eq!(
            result,
            Err(OracleError::TierHasNoPool {
                tiers: vec![FeeTier::MEDIUM],
                period: Some(60),
            })
        );
    }

    #[test]
    fn test_specific_tiers_partial_match_succeeds() {
        let pools = resolve_pools_for_specific_tiers(
            &table(),
            pool(1),
            pool(2),
            &[FeeTier::MEDIUM, FeeTier::HIGH],
            None,
        )
        .unwrap();
        assert_eq!(pools, vec![pool(10)]);
    }
}
