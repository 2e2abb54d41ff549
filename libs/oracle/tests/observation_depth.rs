//! Which pools count as queryable for a period

mod common;

use common::{factory, init_tracing, token, usdc, weth, ScriptedChain};
use std::sync::Arc;
use twap_config::OracleConfig;
use twap_oracle::chain::InMemoryChain;
use twap_oracle::{filter_queryable_pools, has_history_for_period, StaticOracle};
use twap_types::FeeTier;

const PERIOD: u32 = 600;

#[test]
fn test_period_zero_keeps_every_candidate() {
    let chain = ScriptedChain::new(1_000);
    let fresh = chain.with_pool(weth(), usdc(), FeeTier::LOW, token(0xa1));
    let bare = chain.with_pool(weth(), usdc(), FeeTier::MEDIUM, token(0xa2));
    chain.with_history(fresh, 1_000);

    let pools = filter_queryable_pools(&chain, vec![fresh, bare], 0).unwrap();
    assert_eq!(pools, vec![fresh, bare]);
}

#[test]
fn test_zero_cardinality_pool_never_queryable() {
    let chain = ScriptedChain::new(1_000_000);
    let bare = chain.with_pool(weth(), usdc(), FeeTier::LOW, token(0xa1));

    assert!(!has_history_for_period(&chain, bare, 1).unwrap());
    assert!(!has_history_for_period(&chain, bare, PERIOD).unwrap());
    assert!(filter_queryable_pools(&chain, vec![bare], PERIOD)
        .unwrap()
        .is_empty());
}

#[test]
fn test_filter_is_stable() {
    let chain = ScriptedChain::new(10_000);
    let a = chain.with_pool(weth(), usdc(), FeeTier::LOWEST, token(0xa0));
    let b = chain.with_pool(weth(), usdc(), FeeTier::LOW, token(0xa1));
    let c = chain.with_pool(weth(), usdc(), FeeTier::MEDIUM, token(0xa2));
    let d = chain.with_pool(weth(), usdc(), FeeTier::HIGH, token(0xa3));
    chain.with_history(a, 10_000 - PERIOD);
    chain.with_history(b, 10_000 - PERIOD + 1);
    chain.with_history(c, 0);
    chain.with_history(d, 10_000 - 2 * PERIOD);

    let pools = filter_queryable_pools(&chain, vec![a, b, c, d], PERIOD).unwrap();
    assert_eq!(pools, vec![a, c, d]);
}

#[test]
fn test_only_old_enough_pool_is_queryable() {
    init_tracing();
    let chain = Arc::new(InMemoryChain::new(1_000_000));
    let old = chain
        .deploy_pool(weth(), usdc(), FeeTier::LOW, 100, 1_000_000)
        .unwrap();
    chain.advance(PERIOD);
    let young = chain
        .deploy_pool(weth(), usdc(), FeeTier::MEDIUM, 100, 1_000_000)
        .unwrap();
    chain.advance(PERIOD / 2);

    // `old` has 1.5 periods of history, `young` half a period
    let oracle =
        StaticOracle::new(OracleConfig::new(factory(), 10), chain.clone(), chain.clone()).unwrap();
    assert_eq!(
        oracle.queryable_pools_for_tiers(weth(), usdc(), PERIOD).unwrap(),
        vec![old]
    );
    assert_eq!(
        oracle.queryable_pools_for_tiers(weth(), usdc(), PERIOD / 2).unwrap(),
        vec![old, young]
    );
    assert_eq!(
        oracle.queryable_pools_for_tiers(weth(), usdc(), 0).unwrap(),
        vec![old, young]
    );
}

#[test]
fn test_uninitialized_pool_is_skipped() {
    let chain = Arc::new(InMemoryChain::new(1_000_000));
    let live = chain
        .deploy_pool(weth(), usdc(), FeeTier::LOW, 0, 1_000)
        .unwrap();
    chain.create_pool(weth(), usdc(), FeeTier::HIGH).unwrap();
    chain.advance(PERIOD);

    let oracle =
        StaticOracle::new(OracleConfig::new(factory(), 10), chain.clone(), chain.clone()).unwrap();
    assert_eq!(oracle.get_all_pools_for_pair(weth(), usdc()).unwrap().len(), 2);
    assert_eq!(
        oracle.queryable_pools_for_tiers(weth(), usdc(), PERIOD).unwrap(),
        vec![live]
    );
}

#[test]
fn test_history_is_lost_without_reserved_cardinality() {
    let chain = InMemoryChain::new(1_000_000);
    let pool = chain
        .deploy_pool(weth(), usdc(), FeeTier::LOW, 0, 1_000)
        .unwrap();
    chain.advance(PERIOD);
    assert!(has_history_for_period(&chain, pool, PERIOD).unwrap());

    // A single slot is overwritten by the next trade
    chain.swap_to_tick(pool, 10).unwrap();
    chain.advance(PERIOD / 2);
    assert!(!has_history_for_period(&chain, pool, PERIOD).unwrap());
}

#[test]
fn test_reserved_cardinality_retains_history() {
    let chain = InMemoryChain::new(1_000_000);
    let pool = chain
        .deploy_pool(weth(), usdc(), FeeTier::LOW, 0, 1_000)
        .unwrap();
    twap_oracle::prepare(&chain, &[pool], 8).unwrap();

    for step in 1..=4 {
        chain.advance(PERIOD / 4);
        chain.swap_to_tick(pool, step * 10).unwrap();
    }
    chain.advance(1);

    assert!(has_history_for_period(&chain, pool, PERIOD).unwrap());
    assert!(!has_history_for_period(&chain, pool, PERIOD + 2).unwrap());
}
