//! In-memory chain host
//!
//! A single shared state standing in for the factory, its pools and the
//! block clock. Both collaborator traits read and write through one lock, so
//! a test can hold an `Arc<InMemoryChain>`, hand clones to the oracle and keep
//! driving time and swaps from outside.

use super::simulated_pool::SimulatedPool;
use crate::collaborators::{PoolFactory, PoolHost};
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use tracing::debug;
use twap_types::{
    Address, FeeTier, Observation, OracleError, OracleResult, Period, PoolTwap, Slot0,
};

/// Tick spacings enabled on a fresh factory
pub const DEFAULT_TICK_SPACINGS: [(FeeTier, i32); 4] = [
    (FeeTier::LOWEST, 1),
    (FeeTier::LOW, 10),
    (FeeTier::MEDIUM, 60),
    (FeeTier::HIGH, 200),
];

#[derive(Debug, Default)]
struct ChainState {
    factory_address: Option<Address>,
    block_timestamp: u32,
    tick_spacings: HashMap<FeeTier, i32>,
    pool_index: HashMap<(Address, Address, FeeTier), Address>,
    pools: HashMap<Address, SimulatedPool>,
    cardinality_requests: Vec<(Address, u16)>,
}

impl ChainState {
    fn pool(&self, pool: Address) -> OracleResult<&SimulatedPool> {
        self.pools.get(&pool).ok_or(OracleError::PoolNotFound { pool })
    }

    fn pool_mut(&mut self, pool: Address) -> OracleResult<&mut SimulatedPool> {
        self.pools.get_mut(&pool).ok_or(OracleError::PoolNotFound { pool })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryChain {
    state: RwLock<ChainState>,
}

impl InMemoryChain {
    /// Chain at `block_timestamp` with the default fee tiers enabled
    pub fn new(block_timestamp: u32) -> Self {
        let state = ChainState {
            block_timestamp,
            tick_spacings: DEFAULT_TICK_SPACINGS.into_iter().collect(),
            ..ChainState::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Report `address` as the factory's deployment address
    pub fn with_factory_address(self, address: Address) -> Self {
        self.state.write().factory_address = Some(address);
        self
    }

    /// Sanction `fee` with the given tick spacing
    pub fn enable_fee_amount(&self, fee: FeeTier, tick_spacing: i32) {
        self.state.write().tick_spacings.insert(fee, tick_spacing);
    }

    pub fn set_block_timestamp(&self, block_timestamp: u32) {
        self.state.write().block_timestamp = block_timestamp;
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: u32) {
        let mut state = self.state.write();
        state.block_timestamp = state.block_timestamp.wrapping_add(seconds);
    }

    /// Deploy an uninitialized pool for the pair at `fee`
    pub fn create_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> OracleResult<Address> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let mut state = self.state.write();

        if state.tick_spacings.get(&fee).copied().unwrap_or(0) == 0 {
            return Err(OracleError::InvalidFeeTier { fee });
        }
        if let Some(existing) = state.pool_index.get(&(token0, token1, fee)) {
            return Ok(*existing);
        }

        let address = pool_address(token0, token1, fee);
        state.pool_index.insert((token0, token1, fee), address);
        state
            .pools
            .insert(address, SimulatedPool::new(address, token0, token1, fee));
        debug!(?address, ?token0, ?token1, %fee, "Created pool");
        Ok(address)
    }

    /// Initialize `pool` at the current block with a starting tick and liquidity
    pub fn initialize_pool(&self, pool: Address, tick: i32, liquidity: u128) -> OracleResult<()> {
        let mut state = self.state.write();
        let now = state.block_timestamp;
        state.pool_mut(pool)?.initialize(now, tick, liquidity)?;
        debug!(?pool, tick, liquidity, block_timestamp = now, "Initialized pool");
        Ok(())
    }

    /// Create and initialize a pool in one step
    pub fn deploy_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
        tick: i32,
        liquidity: u128,
    ) -> OracleResult<Address> {
        let pool = self.create_pool(token_a, token_b, fee)?;
        self.initialize_pool(pool, tick, liquidity)?;
        Ok(pool)
    }

    /// Trade `pool` to `tick` in the current block
    pub fn swap_to_tick(&self, pool: Address, tick: i32) -> OracleResult<()> {
        let mut state = self.state.write();
        let now = state.block_timestamp;
        state.pool_mut(pool)?.swap_to_tick(now, tick)
    }

    /// Change in-range liquidity of `pool` in the current block
    pub fn set_liquidity(&self, pool: Address, liquidity: u128) -> OracleResult<()> {
        let mut state = self.state.write();
        let now = state.block_timestamp;
        state.pool_mut(pool)?.set_liquidity(now, liquidity)
    }

    /// Every cardinality reservation requested so far, in call order
    pub fn cardinality_requests(&self) -> Vec<(Address, u16)> {
        self.state.read().cardinality_requests.clone()
    }

    pub fn pool_snapshot(&self, pool: Address) -> OracleResult<SimulatedPool> {
        self.state.read().pool(pool).cloned()
    }
}

impl PoolFactory for InMemoryChain {
    fn get_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> OracleResult<Option<Address>> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        Ok(self.state.read().pool_index.get(&(token0, token1, fee)).copied())
    }

    fn fee_amount_tick_spacing(&self, fee: FeeTier) -> OracleResult<i32> {
        Ok(self.state.read().tick_spacings.get(&fee).copied().unwrap_or(0))
    }

    fn factory_address(&self) -> Option<Address> {
        self.state.read().factory_address
    }
}

impl PoolHost for InMemoryChain {
    fn block_timestamp(&self) -> u32 {
        self.state.read().block_timestamp
    }

    fn slot0(&self, pool: Address) -> OracleResult<Slot0> {
        Ok(self.state.read().pool(pool)?.slot0())
    }

    fn observation(&self, pool: Address, index: u16) -> OracleResult<Observation> {
        Ok(self.state.read().pool(pool)?.observation(index))
    }

    fn increase_observation_cardinality_next(
        &self,
        pool: Address,
        cardinality_next: u16,
    ) -> OracleResult<()> {
        let mut state = self.state.write();
        state.pool_mut(pool)?.increase_observation_cardinality_next(cardinality_next)?;
        state.cardinality_requests.push((pool, cardinality_next));
        Ok(())
    }

    fn consult(&self, pool: Address, period: Period) -> OracleResult<PoolTwap> {
        let state = self.state.read();
        state.pool(pool)?.consult(state.block_timestamp, period)
    }
}

fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Deterministic pool address: last 20 bytes of keccak256(token0 ++ token1 ++ fee)
fn pool_address(token0: Address, token1: Address, fee: FeeTier) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(token0.as_bytes());
    hasher.update(token1.as_bytes());
    hasher.update(fee.pips().to_be_bytes());
    let digest = hasher.finalize();
    Address::from_slice(&digest[12..])
}
