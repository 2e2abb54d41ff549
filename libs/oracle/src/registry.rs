//! Fee tier registry
//!
//! Ordered, append-only set of fee tiers the oracle scans when resolving
//! pools. Starts with [`DEFAULT_FEE_TIERS`]; further tiers are accepted only
//! once the factory reports a tick spacing for them.

use crate::collaborators::PoolFactory;
use tracing::{info, warn};
use twap_types::{FeeTier, OracleError, OracleResult, DEFAULT_FEE_TIERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeTierRegistry {
    tiers: Vec<FeeTier>,
}

impl Default for FeeTierRegistry {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_FEE_TIERS.to_vec(),
        }
    }
}

impl FeeTierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known tiers in append order
    pub fn known(&self) -> &[FeeTier] {
        &self.tiers
    }

    pub fn contains(&self, tier: FeeTier) -> bool {
        self.tiers.contains(&tier)
    }

    /// Append `tier` after validating it against `factory`
    ///
    /// # Errors
    /// - [`OracleError::InvalidFeeTier`] if the factory reports zero tick spacing
    /// - [`OracleError::TierAlreadySupported`] if the tier is already registered
    pub fn add<F: PoolFactory + ?Sized>(&mut self, factory: &F, tier: FeeTier) -> OracleResult<()> {
        if factory.fee_amount_tick_spacing(tier)? == 0 {
            warn!(fee = %tier, "Rejected fee tier without tick spacing");
            return Err(OracleError::InvalidFeeTier { fee: tier });
        }
        if self.contains(tier) {
            warn!(fee = %tier, "Rejected duplicate fee tier");
            return Err(OracleError::TierAlreadySupported { fee: tier });
        }

        self.tiers.push(tier);
        info!(fee = %tier, known = self.tiers.len(), "Added fee tier");
        Ok(())
    }
}
