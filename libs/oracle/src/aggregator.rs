//! Quote aggregation
//!
//! Each selected pool is consulted for its mean tick and harmonic mean
//! liquidity over the period. A [`TickAggregator`] folds those readings into
//! one tick, which is then converted to an output amount.

use crate::collaborators::PoolHost;
use std::fmt;
use tracing::{debug, warn};
use twap_amm::{quote_at_tick, weighted_arithmetic_mean_tick};
use twap_config::AggregationStrategy;
use twap_types::{Address, OracleResult, Period, WeightedTick, U256};

/// Strategy for combining per-pool ticks into one aggregate tick
pub trait TickAggregator: fmt::Debug + Send + Sync {
    /// Aggregate tick for `readings`; fails rather than inventing a value
    fn aggregate(&self, readings: &[WeightedTick]) -> OracleResult<i32>;
}

/// Weight each pool by its harmonic mean liquidity
///
/// Pools with zero liquidity contribute nothing; if every weight is zero the
/// aggregate fails with `DivideByZeroGuard`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiquidityWeighted;

impl TickAggregator for LiquidityWeighted {
    fn aggregate(&self, readings: &[WeightedTick]) -> OracleResult<i32> {
        weighted_arithmetic_mean_tick(readings)
    }
}

/// Every pool counts once regardless of liquidity
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticMean;

impl TickAggregator for ArithmeticMean {
    fn aggregate(&self, readings: &[WeightedTick]) -> OracleResult<i32> {
        let unweighted: Vec<WeightedTick> = readings
            .iter()
            .map(|reading| WeightedTick {
                tick: reading.tick,
                weight: 1,
            })
            .collect();
        weighted_arithmetic_mean_tick(&unweighted)
    }
}

impl From<AggregationStrategy> for Box<dyn TickAggregator> {
    fn from(strategy: AggregationStrategy) -> Self {
        match strategy {
            AggregationStrategy::LiquidityWeighted => Box::new(LiquidityWeighted),
            AggregationStrategy::ArithmeticMean => Box::new(ArithmeticMean),
        }
    }
}

/// Consult every pool in `pools` over `period`
pub fn read_pools<H: PoolHost + ?Sized>(
    host: &H,
    pools: &[Address],
    period: Period,
) -> OracleResult<Vec<WeightedTick>> {
    pools
        .iter()
        .map(|pool| {
            let twap = host.consult(*pool, period)?;
            debug!(
                ?pool,
                period,
                tick = twap.arithmetic_mean_tick,
                liquidity = twap.harmonic_mean_liquidity,
                "Consulted pool"
            );
            Ok(WeightedTick::from(twap))
        })
        .collect()
}

/// Single pool quotes at its own tick; the strategy only combines two or more
pub fn aggregate_tick(
    aggregator: &dyn TickAggregator,
    readings: &[WeightedTick],
) -> OracleResult<i32> {
    match readings {
        [only] => Ok(only.tick),
        _ => aggregator.aggregate(readings),
    }
}

/// Amount of `quote_token` worth `base_amount` of `base_token` across `pools`
pub fn quote_pools<H: PoolHost + ?Sized>(
    host: &H,
    aggregator: &dyn TickAggregator,
    base_amount: u128,
    base_token: Address,
    quote_token: Address,
    pools: &[Address],
    period: Period,
) -> OracleResult<U256> {
    let readings = read_pools(host, pools, period)?;
    let tick = aggregate_tick(aggregator, &readings).inspect_err(|err| {
        warn!(?aggregator, pools = pools.len(), period, %err, "Failed to aggregate pool ticks");
    })?;
    let amount = quote_at_tick(tick, base_amount, base_token, quote_token)?;
    debug!(
        ?aggregator,
        tick,
        pools = pools.len(),
        base_amount,
        %amount,
        "Aggregated quote"
    );
    Ok(amount)
}
