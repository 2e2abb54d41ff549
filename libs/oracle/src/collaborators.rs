//! Read/reserve interfaces the oracle consumes
//!
//! The oracle owns no pool or factory state. Everything it knows about pools
//! comes through these two traits, so the same aggregation logic runs against
//! a live node, the [`InMemoryChain`](crate::chain::InMemoryChain) simulation
//! or a scripted double in tests.

use std::sync::Arc;
use twap_types::{Address, FeeTier, Observation, OracleResult, Period, PoolTwap, Slot0};

/// Registry of deployed pools keyed by unordered token pair and fee
pub trait PoolFactory {
    /// Pool for `(token_a, token_b, fee)`; token order does not matter
    fn get_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> OracleResult<Option<Address>>;

    /// Tick spacing enabled for `fee`; zero when the fee is not sanctioned
    fn fee_amount_tick_spacing(&self, fee: FeeTier) -> OracleResult<i32>;

    /// Address the factory is deployed at, when the backend knows it
    fn factory_address(&self) -> Option<Address> {
        None
    }
}

/// Pool state reads plus the one forward reservation the oracle may request
pub trait PoolHost {
    /// Timestamp of the block the reads are served from
    fn block_timestamp(&self) -> u32;

    fn slot0(&self, pool: Address) -> OracleResult<Slot0>;

    fn observation(&self, pool: Address, index: u16) -> OracleResult<Observation>;

    /// Reserve at least `cardinality_next` observation slots; never shrinks
    fn increase_observation_cardinality_next(
        &self,
        pool: Address,
        cardinality_next: u16,
    ) -> OracleResult<()>;

    /// Mean tick and harmonic mean liquidity over the last `period` seconds
    fn consult(&self, pool: Address, period: Period) -> OracleResult<PoolTwap>;
}

impl<T: PoolFactory + ?Sized> PoolFactory for &T {
    fn get_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> OracleResult<Option<Address>> {
        (**self).get_pool(token_a, token_b, fee)
    }

    fn fee_amount_tick_spacing(&self, fee: FeeTier) -> OracleResult<i32> {
        (**self).fee_amount_tick_spacing(fee)
    }

    fn factory_address(&self) -> Option<Address> {
        (**self).factory_address()
    }
}

impl<T: PoolFactory + ?Sized> PoolFactory for Arc<T> {
    fn get_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> OracleResult<Option<Address>> {
        (**self).get_pool(token_a, token_b, fee)
    }

    fn fee_amount_tick_spacing(&self, fee: FeeTier) -> OracleResult<i32> {
        (**self).fee_amount_tick_spacing(fee)
    }

    fn factory_address(&self) -> Option<Address> {
        (**self).factory_address()
    }
}

impl<T: PoolHost + ?Sized> PoolHost for &T {
    fn block_timestamp(&self) -> u32 {
        (**self).block_timestamp()
    }

    fn slot0(&self, pool: Address) -> OracleResult<Slot0> {
        (**self).slot0(pool)
    }

    fn observation(&self, pool: Address, index: u16) -> OracleResult<Observation> {
        (**self).observation(pool, index)
    }

    fn increase_observation_cardinality_next(
        &self,
        pool: Address,
        cardinality_next: u16,
    ) -> OracleResult<()> {
        (**self).increase_observation_cardinality_next(pool, cardinality_next)
    }

    fn consult(&self, pool: Address, period: Period) -> OracleResult<PoolTwap> {
        (**self).consult(pool, period)
    }
}

impl<T: PoolHost + ?Sized> PoolHost for Arc<T> {
    fn block_timestamp(&self) -> u32 {
        (**self).block_timestamp()
    }

    fn slot0(&self, pool: Address) -> OracleResult<Slot0> {
        (**self).slot0(pool)
    }

    fn observation(&self, pool: Address, index: u16) -> OracleResult<Observation> {
        (**self).observation(pool, index)
    }

    fn increase_observation_cardinality_next(
        &self,
        pool: Address,
        cardinality_next: u16,
    ) -> OracleResult<()> {
        (**self).increase_observation_cardinality_next(pool, cardinality_next)
    }

    fn consult(&self, pool: Address, period: Period) -> OracleResult<PoolTwap> {
        (**self).consult(pool, period)
    }
}
