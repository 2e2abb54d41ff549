//! # TWAP Oracle Types
//!
//! Shared vocabulary for the multi-tier static TWAP oracle.
//!
//! ## Design Philosophy
//!
//! - **Integers only**: ticks, cumulatives and amounts stay in the exact integer widths
//!   the pools use (`i32` ticks, `i64` tick cumulatives, 160-bit seconds-per-liquidity
//!   held in a `U256`)
//! - **Addresses as references**: pools and tokens are never owned here, only referenced
//!   by their 20-byte address
//! - **One error enum**: every fallible operation in the workspace returns [`OracleError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use twap_types::{FeeTier, DEFAULT_FEE_TIERS};
//!
//! assert_eq!(DEFAULT_FEE_TIERS, [FeeTier::LOW, FeeTier::MEDIUM, FeeTier::HIGH]);
//! assert_eq!(FeeTier::new(3000).pips(), 3000);
//! ```

pub mod errors;
pub mod fee_tier;
pub mod pool;

pub use errors::{OracleError, OracleResult};
pub use fee_tier::{FeeTier, DEFAULT_FEE_TIERS};
pub use pool::{Observation, PoolTwap, Slot0, WeightedTick};

/// 20-byte account address used for tokens, pools and the factory
pub use ethereum_types::Address;
/// 256-bit unsigned integer used for Q64.96 prices and 160-bit cumulatives
pub use ethereum_types::U256;

/// Seconds of history a TWAP query covers; zero means "current state only"
pub type Period = u32;
