//! Observation ring buffer
//!
//! Fixed-capacity history of cumulative tick and seconds-per-liquidity
//! samples as kept by a concentrated-liquidity pool. The buffer is written
//! at most once per block timestamp, wraps at `cardinality`, and only grows
//! to a reserved `cardinality_next` when the write index reaches the end of
//! the currently active slots.

use crate::oracle_math::MAX_U160;
use ethereum_types::U256;
use tracing::debug;
use twap_types::{Address, Observation, OracleError, OracleResult};

/// Index of the oldest slot given the most recent write index
///
/// Returns `None` for a buffer that was never initialized.
pub fn oldest_observation_index(index: u16, cardinality: u16) -> Option<u16> {
    if cardinality == 0 {
        return None;
    }
    Some(((u32::from(index) + 1) % u32::from(cardinality)) as u16)
}

/// Cumulatives at a point in time: (tick cumulative, seconds per liquidity X128)
pub type Cumulatives = (i64, U256);

/// Observation storage for one pool
#[derive(Debug, Clone)]
pub struct ObservationBuffer {
    pool: Address,
    slots: Vec<Observation>,
}

impl ObservationBuffer {
    pub fn new(pool: Address) -> Self {
        Self {
            pool,
            slots: Vec::new(),
        }
    }

    /// Observation stored at `index`; unreserved slots read as empty
    pub fn get(&self, index: u16) -> Observation {
        self.slots
            .get(usize::from(index))
            .copied()
            .unwrap_or_default()
    }

    /// Number of slots ever reserved
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Write the first observation; returns `(cardinality, cardinality_next)`
    pub fn initialize(&mut self, time: u32) -> (u16, u16) {
        let first = Observation {
            block_timestamp: time,
            tick_cumulative: 0,
            seconds_per_liquidity_cumulative_x128: U256::zero(),
            initialized: true,
        };
        match self.slots.first_mut() {
            Some(slot) => *slot = first,
            None => self.slots.push(first),
        }
        (1, 1)
    }

    /// Record the state that held since the last write; returns `(index, cardinality)`
    ///
    /// Writing twice in the same block is a no-op. Reserved capacity becomes
    /// active only when the write would wrap past the last active slot.
    pub fn write(
        &mut self,
        index: u16,
        block_timestamp: u32,
        tick: i32,
        liquidity: u128,
        cardinality: u16,
        cardinality_next: u16,
    ) -> (u16, u16) {
        let last = self.get(index);
        if cardinality == 0 || last.block_timestamp == block_timestamp {
            return (index, cardinality);
        }

        let cardinality_updated = if cardinality_next > cardinality && index == cardinality - 1 {
            cardinality_next
        } else {
            cardinality
        };

        let index_updated = ((u32::from(index) + 1) % u32::from(cardinality_updated)) as u16;
        let observation = transform(&last, block_timestamp, tick, liquidity);
        self.store(index_updated, observation);

        (index_updated, cardinality_updated)
    }

    /// Reserve slots up to `next`; returns the resulting reserved cardinality
    pub fn grow(&mut self, current: u16, next: u16) -> OracleResult<u16> {
        if current == 0 {
            return Err(OracleError::ZeroCardinality { pool: self.pool });
        }
        if next <= current {
            return Ok(current);
        }
        // Non-zero timestamps mark the slots as paid for without initializing them
        for index in current..next {
            self.store(
                index,
                Observation {
                    block_timestamp: 1,
                    ..Observation::default()
                },
            );
        }
        debug!(pool = ?self.pool, current, next, "Reserved observation slots");
        Ok(next)
    }

    /// Cumulatives as of each `seconds_ago` before `time`
    pub fn observe(
        &self,
        time: u32,
        seconds_agos: &[u32],
        tick: i32,
        index: u16,
        liquidity: u128,
        cardinality: u16,
    ) -> OracleResult<Vec<Cumulatives>> {
        if cardinality == 0 {
            return Err(OracleError::ZeroCardinality { pool: self.pool });
        }
        seconds_agos
            .iter()
            .map(|seconds_ago| {
                self.observe_single(time, *seconds_ago, tick, index, liquidity, cardinality)
            })
            .collect()
    }

    fn observe_single(
        &self,
        time: u32,
        seconds_ago: u32,
        tick: i32,
        index: u16,
        liquidity: u128,
        cardinality: u16,
    ) -> OracleResult<Cumulatives> {
        if seconds_ago == 0 {
            let mut last = self.get(index);
            if last.block_timestamp != time {
                last = transform(&last, time, tick, liquidity);
            }
            return Ok((last.tick_cumulative, last.seconds_per_liquidity_cumulative_x128));
        }

        let target = time.wrapping_sub(seconds_ago);
        let (before, after) =
            self.surrounding_observations(time, target, tick, index, liquidity, cardinality)?;

        if target == before.block_timestamp {
            Ok((before.tick_cumulative, before.seconds_per_liquidity_cumulative_x128))
        } else if target == after.block_timestamp {
            Ok((after.tick_cumulative, after.seconds_per_liquidity_cumulative_x128))
        } else {
            // Linear interpolation between the surrounding samples
            let observation_delta = after.block_timestamp.wrapping_sub(before.block_timestamp);
            let target_delta = target.wrapping_sub(before.block_timestamp);
            let tick_slope = after.tick_cumulative.wrapping_sub(before.tick_cumulative)
                / i64::from(observation_delta);
            let tick_cumulative = before
                .tick_cumulative
                .wrapping_add(tick_slope.wrapping_mul(i64::from(target_delta)));

            let spl_delta = after
                .seconds_per_liquidity_cumulative_x128
                .overflowing_sub(before.seconds_per_liquidity_cumulative_x128)
                .0
                & MAX_U160;
            let spl = before
                .seconds_per_liquidity_cumulative_x128
                .overflowing_add(
                    (spl_delta * U256::from(target_delta)) / U256::from(observation_delta),
                )
                .0
                & MAX_U160;

            Ok((tick_cumulative, spl))
        }
    }

    fn surrounding_observations(
        &self,
        time: u32,
        target: u32,
        tick: i32,
        index: u16,
        liquidity: u128,
        cardinality: u16,
    ) -> OracleResult<(Observation, Observation)> {
        let newest = self.get(index);
        if lte(time, newest.block_timestamp, target) {
            if newest.block_timestamp == target {
                return Ok((newest, Observation::default()));
            }
            return Ok((newest, transform(&newest, target, tick, liquidity)));
        }

        let oldest = self.oldest(index, cardinality);
        if !lte(time, oldest.block_timestamp, target) {
            return Err(OracleError::ObservationTooOld {
                pool: self.pool,
                target,
                oldest: oldest.block_timestamp,
            });
        }

        self.binary_search(time, target, index, cardinality, oldest.block_timestamp)
    }

    /// Oldest initialized observation; slot 0 until the buffer first wraps
    pub fn oldest(&self, index: u16, cardinality: u16) -> Observation {
        match oldest_observation_index(index, cardinality) {
            Some(oldest_index) => {
                let oldest = self.get(oldest_index);
                if oldest.initialized {
                    oldest
                } else {
                    self.get(0)
                }
            }
            None => Observation::default(),
        }
    }

    fn binary_search(
        &self,
        time: u32,
        target: u32,
        index: u16,
        cardinality: u16,
        oldest_timestamp: u32,
    ) -> OracleResult<(Observation, Observation)> {
        let cardinality = usize::from(cardinality);
        let mut left = (usize::from(index) + 1) % cardinality;
        let mut right = left + cardinality - 1;

        while left <= right {
            let i = (left + right) / 2;
            let before = self.get((i % cardinality) as u16);
            if !before.initialized {
                left = i + 1;
                continue;
            }
            let after = self.get(((i + 1) % cardinality) as u16);

            let target_at_or_after = lte(time, before.block_timestamp, target);
            if target_at_or_after && lte(time, target, after.block_timestamp) {
                return Ok((before, after));
            }

            if target_at_or_after {
                left = i + 1;
            } else if i == 0 {
                break;
            } else {
                right = i - 1;
            }
        }

        Err(OracleError::ObservationTooOld {
            pool: self.pool,
            target,
            oldest: oldest_timestamp,
        })
    }

    fn store(&mut self, index: u16, observation: Observation) {
        let index = usize::from(index);
        if self.slots.len() <= index {
            self.slots.resize(index + 1, Observation::default());
        }
        self.slots[index] = observation;
    }
}

/// Advance `last` to `block_timestamp` assuming `tick` and `liquidity` held throughout
fn transform(last: &Observation, block_timestamp: u32, tick: i32, liquidity: u128) -> Observation {
    let delta = block_timestamp.wrapping_sub(last.block_timestamp);
    let spl_increment = (U256::from(delta) << 128) / U256::from(liquidity.max(1));
    Observation {
        block_timestamp,
        tick_cumulative: last
            .tick_cumulative
            .wrapping_add(i64::from(tick) * i64::from(delta)),
        seconds_per_liquidity_cumulative_x128: last
            .seconds_per_liquidity_cumulative_x128
            .overflowing_add(spl_increment)
            .0
            & MAX_U160,
        initialized: true,
    }
}

/// Chronological `a <= b` for 32-bit timestamps that may have wrapped, relative to `time`
fn lte(time: u32, a: u32, b: u32) -> bool {
    if a <= time && b <= time {
        return a <= b;
    }
    let adjust = |t: u32| {
        if t > time {
            u64::from(t)
        } else {
            u64::from(t) + (1u64 << 32)
        }
    };
    adjust(a) <= adjust(b)
}
