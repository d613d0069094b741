//! Criteria registry and min-max normalizer.
//!
//! A criterion is a named, pure extraction from an option to a raw scalar.
//! Raw values are rescaled per criterion across the whole candidate set, so a
//! column must be recomputed whenever the candidate set changes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DecisionError, Result};
use crate::types::{
    DecisionOption, LEARN_INDEX, MOVE_HEART, NOVELTY_METER, SOCIAL_VALUE, TIME_TAKEN,
};

pub const TIME_SCORE: &str = "time_score";
pub const SOCIAL_SCORE: &str = "social_score";
pub const NOVELTY_SCORE: &str = "novelty_score";
pub const LEARN_SCORE: &str = "learn_score";
pub const EMOTIONAL_SCORE: &str = "emotional_score";

/// Value assigned to every candidate when a criterion cannot separate them.
pub const NEUTRAL_SCORE: f64 = 0.5;

type Extractor = Arc<dyn Fn(&DecisionOption) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct Criterion {
    pub name: String,
    extract: Extractor,
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion").field("name", &self.name).finish()
    }
}

impl Criterion {
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&DecisionOption) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }

    /// Reads `attribute` as-is (higher is better).
    pub fn maximize(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self::new(name, move |o| o.param(&attribute))
    }

    /// Reads `attribute` negated (lower is better).
    pub fn minimize(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self::new(name, move |o| -o.param(&attribute))
    }

    pub fn raw(&self, option: &DecisionOption) -> f64 {
        (self.extract)(option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Maximize,
    Minimize,
}

/// Declarative attribute-reading criterion for JSON configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub id: String,
    pub attribute: String,
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

fn default_direction() -> Direction {
    Direction::Maximize
}

impl CriterionSpec {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(DecisionError::InvalidCriterion {
                message: "criterion id must be non-empty".to_string(),
            });
        }
        if self.attribute.trim().is_empty() {
            return Err(DecisionError::InvalidCriterion {
                message: format!("criterion {} has an empty attribute", self.id),
            });
        }
        Ok(())
    }

    pub fn build(&self) -> Criterion {
        match self.direction {
            Direction::Maximize => Criterion::maximize(&self.id, &self.attribute),
            Direction::Minimize => Criterion::minimize(&self.id, &self.attribute),
        }
    }
}

/// Ordered collection of criteria. Order fixes the breakdown order in reports.
#[derive(Debug, Clone, Default)]
pub struct CriteriaRegistry {
    criteria: Vec<Criterion>,
}

impl CriteriaRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Time (negated duration), social, novelty, learning, emotional.
    pub fn standard() -> Self {
        Self {
            criteria: vec![
                Criterion::minimize(TIME_SCORE, TIME_TAKEN),
                Criterion::maximize(SOCIAL_SCORE, SOCIAL_VALUE),
                Criterion::maximize(NOVELTY_SCORE, NOVELTY_METER),
                Criterion::maximize(LEARN_SCORE, LEARN_INDEX),
                Criterion::maximize(EMOTIONAL_SCORE, MOVE_HEART),
            ],
        }
    }

    /// Append a criterion; names must stay unique.
    pub fn register(&mut self, criterion: Criterion) -> Result<()> {
        if self.get(&criterion.name).is_some() {
            return Err(DecisionError::InvalidCriterion {
                message: format!("duplicate criterion: {}", criterion.name),
            });
        }
        self.criteria.push(criterion);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.criteria.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Min-max rescale to [0,1]; a constant column maps to 0.5 everywhere.
pub fn normalize(raw: &[f64]) -> Vec<f64> {
    let Some(&first) = raw.first() else {
        return Vec::new();
    };
    let (min, max) = raw
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min == max {
        return vec![NEUTRAL_SCORE; raw.len()];
    }
    // Halve first when the span itself would overflow to infinity.
    let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
    let (lo, span) = (min * scale, max * scale - min * scale);
    raw.iter()
        .map(|v| ((v * scale - lo) / span).clamp(0.0, 1.0))
        .collect()
}

/// One criterion's raw and normalized values, aligned with candidate order.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionColumn {
    pub criterion: String,
    pub raw: Vec<f64>,
    pub normalized: Vec<f64>,
}

/// Normalized score table for one candidate set.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScores {
    option_names: Vec<String>,
    columns: Vec<CriterionColumn>,
}

impl NormalizedScores {
    pub fn columns(&self) -> &[CriterionColumn] {
        &self.columns
    }

    pub fn option_names(&self) -> &[String] {
        &self.option_names
    }

    /// Normalized value for (criterion, option name).
    pub fn get(&self, criterion: &str, option: &str) -> Option<f64> {
        let idx = self.option_names.iter().position(|n| n == option)?;
        self.columns
            .iter()
            .find(|c| c.criterion == criterion)
            .map(|c| c.normalized[idx])
    }
}

/// Extract and normalize every criterion over the full candidate set.
pub fn compute_normalized_scores(
    registry: &CriteriaRegistry,
    candidates: &[DecisionOption],
) -> NormalizedScores {
    let columns = registry
        .iter()
        .map(|criterion| {
            let raw: Vec<f64> = candidates.iter().map(|o| criterion.raw(o)).collect();
            let normalized = normalize(&raw);
            CriterionColumn {
                criterion: criterion.name.clone(),
                raw,
                normalized,
            }
        })
        .collect();
    NormalizedScores {
        option_names: candidates.iter().map(|o| o.name.clone()).collect(),
        columns,
    }
}
