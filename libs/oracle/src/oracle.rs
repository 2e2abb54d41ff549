//! Static oracle facade
//!
//! Wires the fee tier registry, pool resolution, depth filtering,
//! cardinality preparation and quote aggregation behind one public surface.
//! Every call re-reads current pool state; nothing is cached between calls.

use crate::aggregator::{quote_pools, TickAggregator};
use crate::collaborators::{PoolFactory, PoolHost};
use crate::depth_filter::filter_queryable_pools;
use crate::preparer::{cardinality_for_period, prepare};
use crate::registry::FeeTierRegistry;
use crate::resolver::{
    resolve_pools_for_all_tiers, resolve_pools_for_specific_tiers, resolve_pools_for_tiers,
};
use tracing::{debug, warn};
use twap_config::OracleConfig;
use twap_types::{Address, FeeTier, OracleError, OracleResult, Period, U256};

/// Multi-tier static TWAP oracle over a factory `F` and pool host `H`
pub struct StaticOracle<F, H> {
    factory: F,
    host: H,
    config: OracleConfig,
    registry: FeeTierRegistry,
    aggregator: Box<dyn TickAggregator>,
}

impl<F: PoolFactory, H: PoolHost> StaticOracle<F, H> {
    /// Build an oracle over the injected collaborators
    ///
    /// # Errors
    /// [`OracleError::InvalidConfig`] if the config fails validation or names a
    /// different factory than the one `factory` reports being deployed at.
    pub fn new(config: OracleConfig, factory: F, host: H) -> OracleResult<Self> {
        config.validate()?;
        if let Some(deployed) = factory.factory_address() {
            if deployed != config.factory {
                warn!(configured = ?config.factory, ?deployed, "Factory address mismatch");
                return Err(OracleError::InvalidConfig {
                    reason: format!(
                        "configured factory {:?} does not match injected factory {:?}",
                        config.factory, deployed
                    ),
                });
            }
        }
        let aggregator = config.aggregation.into();
        debug!(?config, "Created static oracle");
        Ok(Self {
            factory,
            host,
            config,
            registry: FeeTierRegistry::new(),
            aggregator,
        })
    }

    /// Replace the tick combination strategy chosen by the config
    pub fn with_aggregator(mut self, aggregator: Box<dyn TickAggregator>) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Configured factory address
    pub fn factory_address(&self) -> Address {
        self.config.factory
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // ---- Fee tier registry ----

    /// Known fee tiers in the order they were added
    pub fn known_fee_tiers(&self) -> &[FeeTier] {
        self.registry.known()
    }

    /// Alias of [`known_fee_tiers`](Self::known_fee_tiers)
    pub fn supported_fee_tiers(&self) -> &[FeeTier] {
        self.known_fee_tiers()
    }

    pub fn add_new_fee_tier(&mut self, tier: FeeTier) -> OracleResult<()> {
        self.registry.add(&self.factory, tier)
    }

    // ---- Pair discovery ----

    /// Every deployed pool for the pair across known tiers
    pub fn get_all_pools_for_pair(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> OracleResult<Vec<Address>> {
        resolve_pools_for_all_tiers(&self.factory, token_a, token_b, &self.registry)
    }

    pub fn is_pair_supported(&self, token_a: Address, token_b: Address) -> OracleResult<bool> {
        Ok(!self.get_all_pools_for_pair(token_a, token_b)?.is_empty())
    }

    /// Pools across all known tiers with at least `period` seconds of history
    pub fn queryable_pools_for_tiers(
        &self,
        token_a: Address,
        token_b: Address,
        period: Period,
    ) -> OracleResult<Vec<Address>> {
        let candidates = self.get_all_pools_for_pair(token_a, token_b)?;
        filter_queryable_pools(&self.host, candidates, period)
    }

    // ---- Quotes ----

    /// Quote `base_amount` across the queryable pools of the given tiers
    ///
    /// # Errors
    /// [`OracleError::TierHasNoPool`] when none of `tiers` has a pool with
    /// enough history for `period`.
    pub fn quote(
        &self,
        base_amount: u128,
        base_token: Address,
        quote_token: Address,
        tiers: &[FeeTier],
        period: Period,
    ) -> OracleResult<U256> {
        self.quote_specific_fee_tiers_with_time_period(
            base_amount,
            base_token,
            quote_token,
            tiers,
            period,
        )
        .map(|(amount, _)| amount)
    }

    /// Like [`quote`](Self::quote), also returning the pools that were queried
    pub fn quote_specific_fee_tiers_with_time_period(
        &self,
        base_amount: u128,
        base_token: Address,
        quote_token: Address,
        tiers: &[FeeTier],
        period: Period,
    ) -> OracleResult<(U256, Vec<Address>)> {
        let candidates = resolve_pools_for_tiers(&self.factory, base_token, quote_token, tiers)?;
        let pools = filter_queryable_pools(&self.host, candidates, period)?;
        if pools.is_empty() {
            warn!(?tiers, period, ?base_token, ?quote_token, "No queryable pool for tiers");
            return Err(OracleError::TierHasNoPool {
                tiers: tiers.to_vec(),
                period: Some(period),
            });
        }
        self.quote_pools(base_amount, base_token, quote_token, pools, period)
    }

    /// Quote across every queryable pool of every known tier
    pub fn quote_all_available_pools_with_time_period(
        &self,
        base_amount: u128,
        base_token: Address,
        quote_token: Address,
        period: Period,
    ) -> OracleResult<(U256, Vec<Address>)> {
        let tiers = self.registry.known().to_vec();
        self.quote_specific_fee_tiers_with_time_period(
            base_amount,
            base_token,
            quote_token,
            &tiers,
            period,
        )
    }

    /// Quote across caller-chosen pools without resolution or depth filtering
    pub fn quote_specific_pools_with_time_period(
        &self,
        base_amount: u128,
        base_token: Address,
        quote_token: Address,
        pools: &[Address],
        period: Period,
    ) -> OracleResult<(U256, Vec<Address>)> {
        if pools.is_empty() {
            warn!(period, "Quote requested over an empty pool list");
            return Err(OracleError::TierHasNoPool {
                tiers: Vec::new(),
                period: Some(period),
            });
        }
        self.quote_pools(base_amount, base_token, quote_token, pools.to_vec(), period)
    }

    fn quote_pools(
        &self,
        base_amount: u128,
        base_token: Address,
        quote_token: Address,
        pools: Vec<Address>,
        period: Period,
    ) -> OracleResult<(U256, Vec<Address>)> {
        let amount = quote_pools(
            &self.host,
            self.aggregator.as_ref(),
            base_amount,
            base_token,
            quote_token,
            &pools,
            period,
        )?;
        Ok((amount, pools))
    }

    // ---- Cardinality preparation ----

    /// Observation slots needed to cover `period` with the configured rate
    pub fn cardinality_for_period(&self, period: Period) -> u64 {
        cardinality_for_period(period, self.config.cardinality_per_minute)
    }

    /// Reserve cardinality for `period` on every deployed pool of the pair
    pub fn prepare_all_available_pools_with_time_period(
        &self,
        token_a: Address,
        token_b: Address,
        period: Period,
    ) -> OracleResult<Vec<Address>> {
        let cardinality = self.cardinality_for_period(period);
        self.prepare_all_available_pools_with_cardinality(token_a, token_b, cardinality)
    }

    /// Reserve cardinality for `period` on the pools of the given tiers
    pub fn prepare_specific_fee_tiers_with_time_period(
        &self,
        token_a: Address,
        token_b: Address,
        tiers: &[FeeTier],
        period: Period,
    ) -> OracleResult<Vec<Address>> {
        let pools =
            resolve_pools_for_specific_tiers(&self.factory, token_a, token_b, tiers, Some(period))?;
        prepare(&self.host, &pools, self.cardinality_for_period(period))?;
        Ok(pools)
    }

    /// Reserve cardinality for `period` on explicit pools
    pub fn prepare_specific_pools_with_time_period(
        &self,
        pools: &[Address],
        period: Period,
    ) -> OracleResult<()> {
        self.prepare_specific_pools_with_cardinality(pools, self.cardinality_for_period(period))
    }

    pub fn prepare_all_available_pools_with_cardinality(
        &self,
        token_a: Address,
        token_b: Address,
        cardinality: u64,
    ) -> OracleResult<Vec<Address>> {
        let pools = self.get_all_pools_for_pair(token_a, token_b)?;
        prepare(&self.host, &pools, cardinality)?;
        Ok(pools)
    }

    pub fn prepare_specific_fee_tiers_with_cardinality(
        &self,
        token_a: Address,
        token_b: Address,
        tiers: &[FeeTier],
        cardinality: u64,
    ) -> OracleResult<Vec<Address>> {
        let pools = resolve_pools_for_specific_tiers(&self.factory, token_a, token_b, tiers, None)?;
        prepare(&self.host, &pools, cardinality)?;
        Ok(pools)
    }

    pub fn prepare_specific_pools_with_cardinality(
        &self,
        pools: &[Address],
        cardinality: u64,
    ) -> OracleResult<()> {
        prepare(&self.host, pools, cardinality)
    }
}
