//! Observation-depth filter
//!
//! A pool can answer a TWAP over `period` only if the oldest observation it
//! still retains is at least `period` seconds old. The oldest observation
//! sits in the slot after the most recent write; until the buffer first
//! wraps that slot is uninitialized and the oldest sample is slot 0.

use crate::collaborators::PoolHost;
use tracing::debug;
use twap_amm::oldest_observation_index;
use twap_types::{Address, OracleResult, Period};

/// Whether `pool` retains at least `period` seconds of history
///
/// Period zero needs no history. A pool whose buffer was never initialized
/// (cardinality zero) is never queryable for a positive period.
pub fn has_history_for_period<H: PoolHost + ?Sized>(
    host: &H,
    pool: Address,
    period: Period,
) -> OracleResult<bool> {
    if period == 0 {
        return Ok(true);
    }

    let slot0 = host.slot0(pool)?;
    let Some(oldest_index) =
        oldest_observation_index(slot0.observation_index, slot0.observation_cardinality)
    else {
        debug!(?pool, "Pool has no observation buffer");
        return Ok(false);
    };

    let mut oldest = host.observation(pool, oldest_index)?;
    if !oldest.initialized {
        oldest = host.observation(pool, 0)?;
    }

    let now = host.block_timestamp();
    let age = now.checked_sub(oldest.block_timestamp);
    let queryable = age.is_some_and(|age| age >= period);
    debug!(
        ?pool,
        oldest_timestamp = oldest.block_timestamp,
        ?age,
        period,
        queryable,
        "Checked observation depth"
    );
    Ok(queryable)
}

/// Stable filter of `candidates` down to pools with enough history for `period`
pub fn filter_queryable_pools<H: PoolHost + ?Sized>(
    host: &H,
    mut candidates: Vec<Address>,
    period: Period,
) -> OracleResult<Vec<Address>> {
    if period == 0 {
        return Ok(candidates);
    }

    let mut valid_count = 0;
    for index in 0..candidates.len() {
        if has_history_for_period(host, candidates[index], period)? {
            candidates.swap(valid_count, index);
            valid_count += 1;
        }
    }

    Ok(copy_valid_elements_into_new_array(&candidates, valid_count))
}

/// First `valid_count` elements of `array`, in order
///
/// Counts past the end of the array are clamped to its length.
pub fn copy_valid_elements_into_new_array<T: Clone>(array: &[T], valid_count: usize) -> Vec<T> {
    array[..valid_count.min(array.len())].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_copy_valid_elements() {
        let array = [10, 20, 30, 40];
        assert_eq!(copy_valid_elements_into_new_array(&array, 1), vec![10]);
        assert_eq!(copy_valid_elements_into_new_array(&array, 3), vec![10, 20, 30]);
        assert_eq!(
            copy_valid_elements_into_new_array(&array, 4),
            vec![10, 20, 30, 40]
        );
        assert!(copy_valid_elements_into_new_array(&array, 0).is_empty());
        assert_eq!(copy_valid_elements_into_new_array(&array, 9).len(), 4);
    }

    proptest! {
        #[test]
        fn prop_copy_valid_elements_is_prefix(
            array in proptest::collection::vec(any::<u32>(), 0..32),
            valid_count in 0usize..40,
        ) {
            let copied = copy_valid_elements_into_new_array(&array, valid_count);
            prop_assert_eq!(copied.len(), valid_count.min(array.len()));
            prop_assert!(array.starts_with(&copied));
        }
    }
}
