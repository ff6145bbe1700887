//! Clustering thresholds.
//!
//! The configuration is an immutable value handed to
//! [`TauClusterer::new`](crate::clusterer::TauClusterer::new). The clusterer
//! trusts it as given; whoever loads it from disk is expected to call
//! [`ClustererConfig::validate`] first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How fragments around a seed are looked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Rescan the full track collection for every seed: O(seeds × tracks).
    #[default]
    Linear,
    /// Bucket tracks in an η–φ grid and scan only the cells around the seed.
    Grid,
}

/// Seed acceptance and cone sizes for [`TauClusterer`](crate::clusterer::TauClusterer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClustererConfig {
    /// Minimum seed transverse momentum (GeV)
    #[serde(alias = "MinTauSeedPT")]
    pub min_seed_pt: f64,
    /// Maximum seed |η|
    #[serde(alias = "MaxTauSeedEta")]
    pub max_seed_eta: f64,
    /// Outer cone: veto and isolation sum (ΔR)
    #[serde(alias = "MaxTauIsolDeltaR")]
    pub isolation_radius: f64,
    /// Inner cone: tracks merged into the candidate (ΔR)
    #[serde(alias = "MaxTauCoreDeltaR")]
    pub core_radius: f64,
    /// Neighbor lookup strategy; does not affect results
    pub search: NeighborSearch,
}

impl Default for ClustererConfig {
    fn default() -> Self {
        Self {
            min_seed_pt: 5.0,
            max_seed_eta: 2.5,
            isolation_radius: 0.5,
            core_radius: 0.3,
            search: NeighborSearch::Linear,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidValue { name: &'static str, value: f64 },
    #[error("core radius {core} exceeds isolation radius {isolation}")]
    CoreOutsideIsolation { core: f64, isolation: f64 },
}

impl ClustererConfig {
    /// Check that every threshold is finite and non-negative and that the
    /// core cone sits inside the isolation cone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("min_seed_pt", self.min_seed_pt),
            ("max_seed_eta", self.max_seed_eta),
            ("isolation_radius", self.isolation_radius),
            ("core_radius", self.core_radius),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        if self.core_radius > self.isolation_radius {
            return Err(ConfigError::CoreOutsideIsolation {
                core: self.core_radius,
                isolation: self.isolation_radius,
            });
        }
        Ok(())
    }
}
