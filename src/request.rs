//! JSON request envelope: options, context and optional configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::engine::{seeded_rng, Decision, ScoringEngine};
use crate::error::{DecisionError, Result};
use crate::types::{Context, DecisionOption};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub options: Vec<DecisionOption>,
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub config: ScoringConfig,
}

/// Decision plus the seed that produced it.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub decision: Decision,
    pub rng_seed: u64,
}

impl DecisionRequest {
    pub fn validate(&self) -> Result<()> {
        self.context.validate()?;
        self.config.validate()
    }

    /// Run the request. The seed is `seed_override`, else `config.rng_seed`,
    /// else freshly drawn; the seed used is returned so the run can be replayed.
    pub fn run(&self, seed_override: Option<u64>) -> Result<RequestOutcome> {
        self.validate()?;
        let engine = ScoringEngine::from_config(&self.config)?;
        let rng_seed = seed_override
            .or(self.config.rng_seed)
            .unwrap_or_else(rand::random);
        debug!(rng_seed, options = self.options.len(), "running decision request");
        let mut rng = seeded_rng(Some(rng_seed));
        let decision = engine.decide(&self.options, &self.context, &mut rng)?;
        Ok(RequestOutcome { decision, rng_seed })
    }
}

pub fn load_request_from_path(path: impl AsRef<Path>) -> Result<DecisionRequest> {
    let raw = std::fs::read_to_string(path.as_ref())
        .map_err(|e| DecisionError::Config(format!("failed to read request: {e}")))?;
    serde_json::from_str(&raw)
        .map_err(|e| DecisionError::Config(format!("failed to parse request: {e}")))
}
