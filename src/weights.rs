//! Context-dependent criterion weights.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::criteria::{EMOTIONAL_SCORE, LEARN_SCORE, NOVELTY_SCORE, SOCIAL_SCORE, TIME_SCORE};
use crate::error::{DecisionError, Result};
use crate::types::Context;

/// Weight for a criterion the vector does not mention.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Criterion name -> non-negative weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

impl WeightVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, criterion: impl Into<String>, weight: f64) {
        self.weights.insert(criterion.into(), weight);
    }

    /// Weight for `criterion`, falling back to [`DEFAULT_WEIGHT`].
    pub fn get(&self, criterion: &str) -> f64 {
        self.weights
            .get(criterion)
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Every weight must be finite and >= 0.
    pub fn validate(&self) -> Result<()> {
        for (criterion, &weight) in &self.weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DecisionError::InvalidWeight {
                    criterion: criterion.clone(),
                    weight,
                });
            }
        }
        Ok(())
    }
}

/// Maps a context to per-criterion weights.
pub trait WeightModel: Send + Sync {
    fn weights(&self, ctx: &Context) -> WeightVector;

    fn describe(&self) -> Option<String> {
        None
    }
}

/// Urgency makes speed matter more: time weight is `1 + pressing_matters`,
/// the other shipped criteria stay at 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrgencyWeightModel;

impl WeightModel for UrgencyWeightModel {
    fn weights(&self, ctx: &Context) -> WeightVector {
        let mut w = WeightVector::new();
        w.set(TIME_SCORE, 1.0 + ctx.pressing_matters);
        for name in [SOCIAL_SCORE, NOVELTY_SCORE, LEARN_SCORE, EMOTIONAL_SCORE] {
            w.set(name, DEFAULT_WEIGHT);
        }
        w
    }

    fn describe(&self) -> Option<String> {
        Some("UrgencyWeightModel(time = 1 + pressing_matters)".to_string())
    }
}

/// Fixed weights regardless of context.
#[derive(Debug, Clone, Default)]
pub struct StaticWeightModel {
    pub weights: WeightVector,
}

impl WeightModel for StaticWeightModel {
    fn weights(&self, _ctx: &Context) -> WeightVector {
        self.weights.clone()
    }

    fn describe(&self) -> Option<String> {
        Some("StaticWeightModel".to_string())
    }
}
