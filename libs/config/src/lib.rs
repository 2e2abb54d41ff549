//! # Static Oracle Configuration
//!
//! Construction-time settings for the static oracle: the factory it resolves
//! pools through, how many observation slots to reserve per minute of desired
//! history, and how per-pool ticks are combined.
//!
//! ## Usage
//!
//! ```rust
//! use twap_config::{AggregationStrategy, OracleConfig};
//!
//! let config = OracleConfig::from_toml_str(r#"
//! factory = "0x1f98431c8ad98523631ae4a59f267346ea31f984"
//! cardinality_per_minute = 12
//! "#).unwrap();
//!
//! assert_eq!(config.cardinality_per_minute, 12);
//! assert_eq!(config.aggregation, AggregationStrategy::LiquidityWeighted);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use twap_types::{Address, OracleError, OracleResult};

/// Observation slots reserved per minute of target history when unset
pub const DEFAULT_CARDINALITY_PER_MINUTE: u32 = 10;

/// How per-pool mean ticks are combined into one aggregate tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Weight each pool by its harmonic mean liquidity over the period
    #[default]
    LiquidityWeighted,
    /// Every pool counts equally
    ArithmeticMean,
}

/// Static oracle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Deployment address of the factory that maps (token pair, fee) to pools
    ///
    /// Lookups go through the injected factory collaborator; when that
    /// collaborator reports its own address the two must agree.
    pub factory: Address,
    /// Observation slots reserved per minute of desired coverage
    pub cardinality_per_minute: u32,
    /// Per-pool tick combination
    pub aggregation: AggregationStrategy,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            factory: Address::zero(),
            cardinality_per_minute: DEFAULT_CARDINALITY_PER_MINUTE,
            aggregation: AggregationStrategy::default(),
        }
    }
}

impl OracleConfig {
    pub fn new(factory: Address, cardinality_per_minute: u32) -> Self {
        Self {
            factory,
            cardinality_per_minute,
            ..Self::default()
        }
    }

    pub fn with_aggregation(mut self, aggregation: AggregationStrategy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> OracleResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| OracleError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        debug!(?config, "Parsed oracle configuration");
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> OracleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| OracleError::InvalidConfig {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), factory = ?config.factory, "Loaded oracle configuration");
        Ok(config)
    }

    pub fn validate(&self) -> OracleResult<()> {
        if self.cardinality_per_minute == 0 {
            return Err(OracleError::InvalidConfig {
                reason: "cardinality_per_minute must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
