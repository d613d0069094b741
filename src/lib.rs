#![forbid(unsafe_code)]

//! # choice-scorer
//!
//! Multi-criteria decision scoring for a small set of discrete options.
//!
//! A run filters infeasible options, min-max normalizes each criterion across
//! the surviving candidates, weights criteria from the situational context,
//! adds a risk-adjusted Monte Carlo estimate of fulfilment and a deterministic
//! time-efficiency bonus, then picks the highest total.
//!
//! Option identity is the option `name`. The random source is always passed
//! in by the caller, so a fixed seed reproduces a run bit for bit.

pub mod config;
pub mod constraints;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod impact;
pub mod report;
pub mod request;
pub mod simulation;
pub mod types;
pub mod weights;

pub use config::{load_config_from_path, ScoringConfig};
pub use constraints::{
    apply_constraints, partition_constraints, AttributeBound, BoundOp, Constraint, ConstraintSet,
    Rejection,
};
pub use criteria::{
    compute_normalized_scores, normalize, CriteriaRegistry, Criterion, CriterionSpec,
    NormalizedScores,
};
pub use engine::{seeded_rng, select, Decision, OptionScore, ScoreTable, ScoringEngine};
pub use error::DecisionError;
pub use impact::combinational_impact;
pub use report::{build_report, render_report_markdown, DecisionReport, ReportOptions};
pub use request::{load_request_from_path, DecisionRequest, RequestOutcome};
pub use simulation::{expected_utility, scaled_fulfilment, FulfilmentSimulator};
pub use types::{Context, DecisionOption};
pub use weights::{UrgencyWeightModel, WeightModel, WeightVector};
