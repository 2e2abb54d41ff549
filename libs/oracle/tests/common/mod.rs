//! Shared fixtures for the oracle integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use twap_oracle::{PoolFactory, PoolHost};
use twap_types::{
    Address, FeeTier, Observation, OracleError, OracleResult, Period, PoolTwap, Slot0,
};

pub fn factory() -> Address {
    Address::repeat_byte(0xfa)
}

pub fn token(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn weth() -> Address {
    token(0x01)
}

pub fn usdc() -> Address {
    token(0x02)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Debug, Default)]
struct Script {
    now: u32,
    tick_spacings: HashMap<FeeTier, i32>,
    pools: HashMap<(Address, Address, FeeTier), Address>,
    slot0: HashMap<Address, Slot0>,
    observations: HashMap<(Address, u16), Observation>,
    readings: HashMap<Address, PoolTwap>,
    cardinality_requests: Vec<(Address, u16)>,
    consults: Vec<(Address, Period)>,
}

/// Factory and pool host whose every answer is set up front by the test
///
/// Pools carry no real buffer: depth is scripted through the oldest
/// observation timestamp and quotes through fixed consult readings.
#[derive(Debug, Default)]
pub struct ScriptedChain {
    script: Mutex<Script>,
}

impl ScriptedChain {
    pub fn new(now: u32) -> Self {
        let chain = Self::default();
        {
            let mut script = chain.script.lock();
            script.now = now;
            script.tick_spacings = HashMap::from([
                (FeeTier::LOWEST, 1),
                (FeeTier::LOW, 10),
                (FeeTier::MEDIUM, 60),
                (FeeTier::HIGH, 200),
            ]);
        }
        chain
    }

    pub fn set_now(&self, now: u32) {
        self.script.lock().now = now;
    }

    /// Register `pool` for the pair at `fee` with no observation buffer
    pub fn with_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
        pool: Address,
    ) -> Address {
        let mut script = self.script.lock();
        let key = if token_a < token_b {
            (token_a, token_b, fee)
        } else {
            (token_b, token_a, fee)
        };
        script.pools.insert(key, pool);
        script.slot0.insert(pool, Slot0::default());
        pool
    }

    /// Register `pool` with one observation written at the current time
    pub fn with_live_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
        pool: Address,
    ) -> Address {
        self.with_pool(token_a, token_b, fee, pool);
        let now = self.script.lock().now;
        self.with_history(pool, now);
        pool
    }

    /// Give `pool` a single retained observation written at `oldest_timestamp`
    pub fn with_history(&self, pool: Address, oldest_timestamp: u32) {
        let mut script = self.script.lock();
        script.slot0.insert(
            pool,
            Slot0 {
                observation_index: 0,
                observation_cardinality: 1,
                observation_cardinality_next: 1,
                ..Slot0::default()
            },
        );
        script.observations.insert(
            (pool, 0),
            Observation {
                block_timestamp: oldest_timestamp,
                initialized: true,
                ..Observation::default()
            },
        );
    }

    /// Fixed consult answer for `pool`, whatever the period
    pub fn with_reading(&self, pool: Address, tick: i32, liquidity: u128) {
        self.script.lock().readings.insert(
            pool,
            PoolTwap {
                arithmetic_mean_tick: tick,
                harmonic_mean_liquidity: liquidity,
            },
        );
    }

    pub fn cardinality_requests(&self) -> Vec<(Address, u16)> {
        self.script.lock().cardinality_requests.clone()
    }

    pub fn consults(&self) -> Vec<(Address, Period)> {
        self.script.lock().consults.clone()
    }
}

impl PoolFactory for ScriptedChain {
    fn get_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> OracleResult<Option<Address>> {
        let key = if token_a < token_b {
            (token_a, token_b, fee)
        } else {
            (token_b, token_a, fee)
        };
        Ok(self.script.lock().pools.get(&key).copied())
    }

    fn fee_amount_tick_spacing(&self, fee: FeeTier) -> OracleResult<i32> {
        Ok(self.script.lock().tick_spacings.get(&fee).copied().unwrap_or(0))
    }
}

impl PoolHost for ScriptedChain {
    fn block_timestamp(&self) -> u32 {
        self.script.lock().now
    }

    fn slot0(&self, pool: Address) -> OracleResult<Slot0> {
        self.script
            .lock()
            .slot0
            .get(&pool)
            .copied()
            .ok_or(OracleError::PoolNotFound { pool })
    }

    fn observation(&self, pool: Address, index: u16) -> OracleResult<Observation> {
        Ok(self
            .script
            .lock()
            .observations
            .get(&(pool, index))
            .copied()
            .unwrap_or_default())
    }

    fn increase_observation_cardinality_next(
        &self,
        pool: Address,
        cardinality_next: u16,
    ) -> OracleResult<()> {
        let mut script = self.script.lock();
        if !script.slot0.contains_key(&pool) {
            return Err(OracleError::PoolNotFound { pool });
        }
        script.cardinality_requests.push((pool, cardinality_next));
        Ok(())
    }

    fn consult(&self, pool: Address, period: Period) -> OracleResult<PoolTwap> {
        let mut script = self.script.lock();
        script.consults.push((pool, period));
        script
            .readings
            .get(&pool)
            .copied()
            .ok_or(OracleError::PoolNotFound { pool })
    }
}
