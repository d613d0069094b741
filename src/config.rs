//! Scoring configuration knobs, defaults, validation and JSON loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constraints::{AttributeBound, DEFAULT_TIME_THRESHOLD};
use crate::criteria::CriterionSpec;
use crate::error::{DecisionError, Result};
use crate::simulation::{DEFAULT_NOISE_SIGMA, DEFAULT_RISK_LAMBDA, DEFAULT_SAMPLE_COUNT};

/// Configuration for a scoring engine.
///
/// Every field has a default so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Monte Carlo draws per option. Higher values reduce variance in the
    /// expected-utility term at proportional cost.
    pub sample_count: usize,
    /// Risk aversion: weight of the sample variance penalty.
    pub risk_lambda: f64,
    /// Feasibility cutoff on `time_taken`.
    pub time_threshold: f64,
    /// Standard deviation of the fulfilment sampling noise.
    pub noise_sigma: f64,
    /// Seed for reproducible runs. `None` draws a fresh seed from the OS.
    pub rng_seed: Option<u64>,
    /// Extra bounds, checked after the time threshold.
    pub constraints: Vec<AttributeBound>,
    /// Extra criteria, appended after the standard registry.
    pub criteria: Vec<CriterionSpec>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            risk_lambda: DEFAULT_RISK_LAMBDA,
            time_threshold: DEFAULT_TIME_THRESHOLD,
            noise_sigma: DEFAULT_NOISE_SIGMA,
            rng_seed: None,
            constraints: Vec::new(),
            criteria: Vec::new(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_count == 0 {
            return Err(DecisionError::InvalidSampleCount);
        }
        if !self.risk_lambda.is_finite() || self.risk_lambda < 0.0 {
            return Err(DecisionError::InvalidRiskLambda {
                value: self.risk_lambda,
            });
        }
        if !self.noise_sigma.is_finite() || self.noise_sigma < 0.0 {
            return Err(DecisionError::InvalidNoiseSigma {
                value: self.noise_sigma,
            });
        }
        if !self.time_threshold.is_finite() {
            return Err(DecisionError::InvalidThreshold {
                value: self.time_threshold,
            });
        }
        for bound in &self.constraints {
            bound.validate()?;
        }
        for spec in &self.criteria {
            spec.validate()?;
        }
        Ok(())
    }
}

/// Read and validate a JSON config file.
pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<ScoringConfig> {
    let raw = std::fs::read_to_string(path.as_ref())
        .map_err(|e| DecisionError::Config(format!("failed to read config: {e}")))?;
    let config: ScoringConfig = serde_json::from_str(&raw)
        .map_err(|e| DecisionError::Config(format!("failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}
