//! Aggregation and selection.
//!
//! `ScoringEngine` owns the configured pipeline (constraints, criteria,
//! weight model, simulator, risk aversion) and is immutable once built. The
//! random source is passed to every scoring call, so concurrent runs with
//! independent generators never interfere.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::constraints::{partition_constraints, ConstraintSet, Rejection, DEFAULT_TIME_THRESHOLD};
use crate::criteria::{compute_normalized_scores, CriteriaRegistry};
use crate::error::{DecisionError, Result};
use crate::impact::combinational_impact;
use crate::simulation::{expected_utility, FulfilmentSimulator, DEFAULT_RISK_LAMBDA};
use crate::types::{validate_candidates, Context, DecisionOption};
use crate::weights::{UrgencyWeightModel, WeightModel};

// ---------------------------------------------------------------------
//  Score table
// ---------------------------------------------------------------------

/// One criterion's share of an option's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionContribution {
    pub criterion: String,
    pub raw: f64,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Final score for one option with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionScore {
    pub name: String,
    pub total: f64,
    /// Sum of normalized criteria times weights.
    pub weighted_criteria: f64,
    pub expected_utility: f64,
    pub combinational_impact: f64,
    pub criteria: Vec<CriterionContribution>,
}

/// Option name -> score, in candidate order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreTable {
    entries: Vec<OptionScore>,
}

impl ScoreTable {
    pub fn get(&self, name: &str) -> Option<&OptionScore> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn total(&self, name: &str) -> Option<f64> {
        self.get(name).map(|e| e.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionScore> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.total))
            .collect()
    }

    /// Entries by descending total; equal totals keep candidate order and
    /// NaN totals sort last, matching [`select`].
    pub fn ranked(&self) -> Vec<&OptionScore> {
        let mut out: Vec<&OptionScore> = self.entries.iter().collect();
        out.sort_by(|a, b| match (a.total.is_nan(), b.total.is_nan()) {
            (false, false) => b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        out
    }
}

/// Arg-max by total. Ties keep the first-seen option; NaN never wins.
/// Returns `None` when there is nothing feasible to pick.
pub fn select(table: &ScoreTable) -> Option<&OptionScore> {
    let mut best: Option<&OptionScore> = None;
    for entry in table.iter() {
        if entry.total.is_nan() {
            continue;
        }
        match best {
            Some(b) if entry.total <= b.total => {}
            _ => best = Some(entry),
        }
    }
    if best.is_none() {
        warn!("selection over an empty score table");
    }
    best
}

/// Outcome of filter -> score -> select.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub scores: ScoreTable,
    pub rejected: Vec<Rejection>,
    pub selected: Option<String>,
}

impl Decision {
    pub fn selected_option(&self) -> Option<&OptionScore> {
        self.selected.as_deref().and_then(|n| self.scores.get(n))
    }

    /// Like [`Decision::selected_option`] but an empty candidate set is an error.
    pub fn require_selection(&self) -> Result<&OptionScore> {
        self.selected_option()
            .ok_or(DecisionError::EmptyCandidateSet)
    }
}

// ---------------------------------------------------------------------
//  Engine
// ---------------------------------------------------------------------

#[derive(Clone)]
pub struct ScoringEngine {
    constraints: ConstraintSet,
    criteria: CriteriaRegistry,
    weight_model: Arc<dyn WeightModel>,
    simulator: FulfilmentSimulator,
    risk_lambda: f64,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("constraints", &self.constraints)
            .field("criteria", &self.criteria.names())
            .field("weight_model", &self.weight_model.describe())
            .field("simulator", &self.simulator)
            .field("risk_lambda", &self.risk_lambda)
            .finish()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            constraints: ConstraintSet::with_time_threshold(DEFAULT_TIME_THRESHOLD),
            criteria: CriteriaRegistry::standard(),
            weight_model: Arc::new(UrgencyWeightModel),
            simulator: FulfilmentSimulator::default(),
            risk_lambda: DEFAULT_RISK_LAMBDA,
        }
    }
}

impl ScoringEngine {
    /// Build from validated configuration.
    pub fn from_config(cfg: &ScoringConfig) -> Result<Self> {
        cfg.validate()?;
        let mut constraints = ConstraintSet::with_time_threshold(cfg.time_threshold);
        for bound in &cfg.constraints {
            constraints.push(bound.clone());
        }
        let mut criteria = CriteriaRegistry::standard();
        for spec in &cfg.criteria {
            criteria.register(spec.build())?;
        }
        Ok(Self {
            constraints,
            criteria,
            weight_model: Arc::new(UrgencyWeightModel),
            simulator: FulfilmentSimulator::new(cfg.sample_count, cfg.noise_sigma)?,
            risk_lambda: cfg.risk_lambda,
        })
    }

    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_criteria(mut self, criteria: CriteriaRegistry) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_weight_model(mut self, model: Arc<dyn WeightModel>) -> Self {
        self.weight_model = model;
        self
    }

    pub fn with_simulator(mut self, simulator: FulfilmentSimulator) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn with_risk_lambda(mut self, risk_lambda: f64) -> Result<Self> {
        if !risk_lambda.is_finite() || risk_lambda < 0.0 {
            return Err(DecisionError::InvalidRiskLambda { value: risk_lambda });
        }
        self.risk_lambda = risk_lambda;
        Ok(self)
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn criteria(&self) -> &CriteriaRegistry {
        &self.criteria
    }

    pub fn simulator(&self) -> &FulfilmentSimulator {
        &self.simulator
    }

    pub fn risk_lambda(&self) -> f64 {
        self.risk_lambda
    }

    /// Ordered subsequence of `options` passing every configured constraint.
    pub fn filter(&self, options: &[DecisionOption]) -> (Vec<DecisionOption>, Vec<Rejection>) {
        partition_constraints(options, &self.constraints)
    }

    /// Score every candidate. Candidates are assumed already filtered.
    ///
    /// An empty candidate set yields an empty table. Options are simulated
    /// in candidate order, so a fixed seed gives bit-identical totals.
    pub fn score<R: Rng + ?Sized>(
        &self,
        candidates: &[DecisionOption],
        ctx: &Context,
        rng: &mut R,
    ) -> Result<ScoreTable> {
        ctx.validate()?;
        validate_candidates(candidates)?;
        let weights = self.weight_model.weights(ctx);
        weights.validate()?;

        if candidates.is_empty() {
            warn!("scoring invoked with no feasible candidates");
            return Ok(ScoreTable::default());
        }

        let normalized = compute_normalized_scores(&self.criteria, candidates);
        let mut entries = Vec::with_capacity(candidates.len());

        for (idx, option) in candidates.iter().enumerate() {
            let mut weighted_criteria = 0.0;
            let mut contributions = Vec::with_capacity(normalized.columns().len());
            for column in normalized.columns() {
                let weight = weights.get(&column.criterion);
                let contribution = column.normalized[idx] * weight;
                weighted_criteria += contribution;
                contributions.push(CriterionContribution {
                    criterion: column.criterion.clone(),
                    raw: column.raw[idx],
                    normalized: column.normalized[idx],
                    weight,
                    contribution,
                });
            }

            let samples = self.simulator.simulate(option, ctx, rng);
            let eu = expected_utility(&samples, self.risk_lambda);
            let impact = combinational_impact(option);
            let total = weighted_criteria + eu + impact;

            debug!(
                option = %option.name,
                weighted_criteria,
                expected_utility = eu,
                combinational_impact = impact,
                total,
                "option scored"
            );

            entries.push(OptionScore {
                name: option.name.clone(),
                total,
                weighted_criteria,
                expected_utility: eu,
                combinational_impact: impact,
                criteria: contributions,
            });
        }

        Ok(ScoreTable { entries })
    }

    /// Filter, score and select in one pass.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        options: &[DecisionOption],
        ctx: &Context,
        rng: &mut R,
    ) -> Result<Decision> {
        validate_candidates(options)?;
        let (candidates, rejected) = self.filter(options);
        let scores = self.score(&candidates, ctx, rng)?;
        let selected = select(&scores).map(|s| s.name.clone());
        Ok(Decision {
            scores,
            rejected,
            selected,
        })
    }
}

/// Seeded generator for reproducible runs, or an OS-seeded one.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
