//! Simulated concentrated-liquidity pool
//!
//! Tracks only what the oracle reads: current tick and in-range liquidity,
//! slot0 observation bookkeeping and the observation ring buffer. Every state
//! change first records an observation for the state that held up to now,
//! the way a real pool writes on swaps and liquidity changes.

use twap_amm::{consult_from_cumulatives, get_sqrt_ratio_at_tick, ObservationBuffer};
use twap_types::{
    Address, FeeTier, Observation, OracleError, OracleResult, Period, PoolTwap, Slot0, U256,
};

#[derive(Debug, Clone)]
pub struct SimulatedPool {
    address: Address,
    token0: Address,
    token1: Address,
    fee: FeeTier,
    sqrt_price_x96: U256,
    tick: i32,
    liquidity: u128,
    observation_index: u16,
    observation_cardinality: u16,
    observation_cardinality_next: u16,
    observations: ObservationBuffer,
    /// Timestamp, tick and liquidity the latest block opened with
    block_open: (u32, i32, u128),
}

impl SimulatedPool {
    /// Deployed but not yet initialized: no price, no observation buffer
    pub fn new(address: Address, token0: Address, token1: Address, fee: FeeTier) -> Self {
        Self {
            address,
            token0,
            token1,
            fee,
            sqrt_price_x96: U256::zero(),
            tick: 0,
            liquidity: 0,
            observation_index: 0,
            observation_cardinality: 0,
            observation_cardinality_next: 0,
            observations: ObservationBuffer::new(address),
            block_open: (0, 0, 0),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn tokens(&self) -> (Address, Address) {
        (self.token0, self.token1)
    }

    pub fn fee(&self) -> FeeTier {
        self.fee
    }

    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    pub fn is_initialized(&self) -> bool {
        self.observation_cardinality > 0
    }

    /// Set the starting price and write the first observation at `time`
    pub fn initialize(&mut self, time: u32, tick: i32, liquidity: u128) -> OracleResult<()> {
        if self.is_initialized() {
            return Err(OracleError::InvalidConfig {
                reason: format!("pool {:?} is already initialized", self.address),
            });
        }
        self.sqrt_price_x96 = get_sqrt_ratio_at_tick(tick)?;
        self.tick = tick;
        self.liquidity = liquidity;
        let (cardinality, cardinality_next) = self.observations.initialize(time);
        self.observation_index = 0;
        self.observation_cardinality = cardinality;
        self.observation_cardinality_next = cardinality_next;
        self.block_open = (time, tick, liquidity);
        Ok(())
    }

    pub fn slot0(&self) -> Slot0 {
        Slot0 {
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick,
            observation_index: self.observation_index,
            observation_cardinality: self.observation_cardinality,
            observation_cardinality_next: self.observation_cardinality_next,
        }
    }

    pub fn observation(&self, index: u16) -> Observation {
        self.observations.get(index)
    }

    /// Reserve observation slots; smaller requests leave the reservation unchanged
    pub fn increase_observation_cardinality_next(
        &mut self,
        cardinality_next: u16,
    ) -> OracleResult<()> {
        if !self.is_initialized() {
            return Err(OracleError::ZeroCardinality { pool: self.address });
        }
        self.observation_cardinality_next = self
            .observations
            .grow(self.observation_cardinality_next, cardinality_next)?;
        Ok(())
    }

    /// Move the price to `tick` at `time`
    pub fn swap_to_tick(&mut self, time: u32, tick: i32) -> OracleResult<()> {
        let sqrt_price_x96 = get_sqrt_ratio_at_tick(tick)?;
        self.write_observation(time)?;
        self.open_block(time);
        self.tick = tick;
        self.sqrt_price_x96 = sqrt_price_x96;
        Ok(())
    }

    /// Change in-range liquidity at `time`
    pub fn set_liquidity(&mut self, time: u32, liquidity: u128) -> OracleResult<()> {
        self.write_observation(time)?;
        self.open_block(time);
        self.liquidity = liquidity;
        Ok(())
    }

    /// Cumulatives for each `seconds_ago` before `time`
    pub fn observe(&self, time: u32, seconds_agos: &[u32]) -> OracleResult<Vec<(i64, U256)>> {
        self.observations.observe(
            time,
            seconds_agos,
            self.tick,
            self.observation_index,
            self.liquidity,
            self.observation_cardinality,
        )
    }

    /// Mean tick and liquidity over the `period` seconds before `time`
    ///
    /// Period zero reports the tick and in-range liquidity the block at `time`
    /// opened with, so trades inside that block do not move the spot reading.
    pub fn consult(&self, time: u32, period: Period) -> OracleResult<PoolTwap> {
        if !self.is_initialized() {
            return Err(OracleError::ZeroCardinality { pool: self.address });
        }
        if period == 0 {
            let (tick, liquidity) = match self.block_open {
                (opened, tick, liquidity) if opened == time => (tick, liquidity),
                _ => (self.tick, self.liquidity),
            };
            return Ok(PoolTwap {
                arithmetic_mean_tick: tick,
                harmonic_mean_liquidity: liquidity,
            });
        }

        let cumulatives = self.observe(time, &[period, 0])?;
        consult_from_cumulatives(
            period,
            [cumulatives[0].0, cumulatives[1].0],
            [cumulatives[0].1, cumulatives[1].1],
        )
    }

    /// First change in a new block snapshots the state the block opened with
    fn open_block(&mut self, time: u32) {
        if self.block_open.0 != time {
            self.block_open = (time, self.tick, self.liquidity);
        }
    }

    fn write_observation(&mut self, time: u32) -> OracleResult<()> {
        if !self.is_initialized() {
            return Err(OracleError::ZeroCardinality { pool: self.address });
        }
        let (index, cardinality) = self.observations.write(
            self.observation_index,
            time,
            self.tick,
            self.liquidity,
            self.observation_cardinality,
            self.observation_cardinality_next,
        );
        self.observation_index = index;
        self.observation_cardinality = cardinality;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> SimulatedPool {
        SimulatedPool::new(
            Address::repeat_byte(0xee),
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            FeeTier::MEDIUM,
        )
    }

    #[test]
    fn test_uninitialized_pool_has_zero_cardinality() {
        let mut pool = pool();
        assert_eq!(pool.slot0().observation_cardinality, 0);
        assert!(matches!(pool.consult(100, 60), Err(OracleError::ZeroCardinality { .. })));
        assert!(pool.increase_observation_cardinality_next(10).is_err());
        assert!(pool.swap_to_tick(100, 5).is_err());
    }

    #[test]
    fn test_consult_averages_ticks_over_period() {
        let mut pool = pool();
        pool.initialize(1_000, 100, 1_000_000).unwrap();
        pool.increase_observation_cardinality_next(10).unwrap();
        pool.swap_to_tick(1_060, 200).unwrap();

        // 60s at 100, then 60s at 200
        let twap = pool.consult(1_120, 120).unwrap();
        assert_eq!(twap.arithmetic_mean_tick, 150);
        assert!(twap.harmonic_mean_liquidity.abs_diff(1_000_000) <= 1);

        let spot = pool.consult(1_120, 0).unwrap();
        assert_eq!(spot.arithmetic_mean_tick, 200);
        assert_eq!(spot.harmonic_mean_liquidity, 1_000_000);
    }

    #[test]
    fn test_spot_reads_block_opening_state() {
        let mut pool = pool();
        pool.initialize(1_000, 100, 1_000).unwrap();
        pool.increase_observation_cardinality_next(10).unwrap();

        pool.swap_to_tick(1_060, 200).unwrap();
        pool.set_liquidity(1_060, 5_000).unwrap();
        pool.swap_to_tick(1_060, 300).unwrap();
        let spot = pool.consult(1_060, 0).unwrap();
        assert_eq!(spot.arithmetic_mean_tick, 100);
        assert_eq!(spot.harmonic_mean_liquidity, 1_000);
        assert_eq!(pool.slot0().tick, 300);

        // The next block opens at the last traded state
        let spot = pool.consult(1_061, 0).unwrap();
        assert_eq!(spot.arithmetic_mean_tick, 300);
        assert_eq!(spot.harmonic_mean_liquidity, 5_000);
    }

    #[test]
    fn test_consult_beyond_history_fails() {
        let mut pool = pool();
        pool.initialize(1_000, 0, 1).unwrap();
        assert!(matches!(
            pool.consult(1_050, 100),
            Err(OracleError::ObservationTooOld { target: 950, oldest: 1_000, .. })
        ));
    }

    #[test]
    fn test_reservation_never_shrinks() {
        let mut pool = pool();
        pool.initialize(1_000, 0, 1).unwrap();
        pool.increase_observation_cardinality_next(50).unwrap();
        pool.increase_observation_cardinality_next(20).unwrap();
        assert_eq!(pool.slot0().observation_cardinality_next, 50);
        // Active cardinality grows only once an observation is written
        assert_eq!(pool.slot0().observation_cardinality, 1);
        pool.swap_to_tick(1_010, 1).unwrap();
        assert_eq!(pool.slot0().observation_cardinality, 50);
    }
}
