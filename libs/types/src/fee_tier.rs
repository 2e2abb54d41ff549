//! Pool fee tiers
//!
//! A fee tier is the fee charged by a pool in hundredths of a basis point
//! (pips): `3000` is 0.30%. Several pools for the same pair can coexist, one
//! per tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee tier of a concentrated-liquidity pool, in pips
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(u32);

impl FeeTier {
    /// 0.01%
    pub const LOWEST: FeeTier = FeeTier(100);
    /// 0.05%
    pub const LOW: FeeTier = FeeTier(500);
    /// 0.30%
    pub const MEDIUM: FeeTier = FeeTier(3000);
    /// 1.00%
    pub const HIGH: FeeTier = FeeTier(10_000);

    pub const fn new(pips: u32) -> Self {
        Self(pips)
    }

    pub const fn pips(self) -> u32 {
        self.0
    }
}

impl From<u32> for FeeTier {
    fn from(pips: u32) -> Self {
        Self(pips)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tiers every oracle knows about from construction, in registry order
pub const DEFAULT_FEE_TIERS: [FeeTier; 3] = [FeeTier::LOW, FeeTier::MEDIUM, FeeTier::HIGH];
