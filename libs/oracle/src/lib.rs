//! # Static TWAP Oracle
//!
//! ## Purpose
//!
//! Time-weighted average price quotes for a token pair aggregated across
//! every fee tier the pair is deployed at. Each quote asks each qualifying
//! pool for its mean tick and harmonic mean liquidity over a period, combines
//! the ticks (liquidity-weighted by default) and converts the result into an
//! output amount.
//!
//! ## Architecture
//!
//! ```text
//! FeeTierRegistry ──► resolver ──► depth_filter ──► aggregator ──► amount
//!                         │
//!                         └──────► preparer (reserve observation slots)
//! ```
//!
//! - **registry**: ordered set of fee tiers the oracle considers
//! - **resolver**: (pair, tiers) to deployed pool addresses
//! - **depth_filter**: drops pools whose retained history is shorter than the period
//! - **preparer**: asks pools to grow their observation buffers ahead of use
//! - **aggregator**: consults pools and folds their ticks into one quote
//!
//! The oracle holds no pool state. Reads and the single reservation call go
//! through [`PoolFactory`] and [`PoolHost`]; [`chain::InMemoryChain`]
//! implements both for simulation and tests.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use twap_config::OracleConfig;
//! use twap_oracle::{chain::InMemoryChain, StaticOracle};
//! use twap_types::{Address, FeeTier};
//!
//! let chain = Arc::new(InMemoryChain::new(1_000));
//! let (weth, usdc) = (Address::repeat_byte(1), Address::repeat_byte(2));
//! chain.deploy_pool(weth, usdc, FeeTier::MEDIUM, 0, 1_000_000).unwrap();
//! chain.advance(600);
//!
//! let config = OracleConfig::new(Address::repeat_byte(0xfa), 10);
//! let oracle = StaticOracle::new(config, chain.clone(), chain.clone()).unwrap();
//! let amount = oracle.quote(1_000, weth, usdc, &[FeeTier::MEDIUM], 600).unwrap();
//! assert_eq!(amount.as_u128(), 1_000);
//! ```

pub mod aggregator;
pub mod chain;
pub mod collaborators;
pub mod depth_filter;
pub mod oracle;
pub mod preparer;
pub mod registry;
pub mod resolver;

pub use aggregator::{
    aggregate_tick, quote_pools, read_pools, ArithmeticMean, LiquidityWeighted, TickAggregator,
};
pub use collaborators::{PoolFactory, PoolHost};
pub use depth_filter::{
    copy_valid_elements_into_new_array, filter_queryable_pools, has_history_for_period,
};
pub use oracle::StaticOracle;
pub use preparer::{cardinality_for_period, prepare};
pub use registry::FeeTierRegistry;
pub use resolver::{
    resolve_pools_for_all_tiers, resolve_pools_for_specific_tiers, resolve_pools_for_tiers,
};
