//! Error taxonomy for the scoring pipeline.
//!
//! Edge cases with a well-defined answer (missing attributes, tied criteria,
//! fewer than two fulfilment samples, an empty candidate set during scoring)
//! are not errors. Everything here is invalid input or configuration the
//! caller must fix before any output is produced.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecisionError {
    #[error("no feasible option to select")]
    EmptyCandidateSet,
    #[error("duplicate option name: {name}")]
    DuplicateOption { name: String },
    #[error("option {option} has non-finite attribute {attribute}: {value}")]
    NonFiniteAttribute {
        option: String,
        attribute: String,
        value: f64,
    },
    #[error("invalid context signal {field}: {value} (expected finite and >= 0)")]
    InvalidContext { field: &'static str, value: f64 },
    #[error("sample_count must be >= 1")]
    InvalidSampleCount,
    #[error("invalid risk_lambda: {value} (expected finite and >= 0)")]
    InvalidRiskLambda { value: f64 },
    #[error("invalid noise_sigma: {value} (expected finite and >= 0)")]
    InvalidNoiseSigma { value: f64 },
    #[error("invalid time_threshold: {value}")]
    InvalidThreshold { value: f64 },
    #[error("invalid constraint: {message}")]
    InvalidConstraint { message: String },
    #[error("invalid criterion: {message}")]
    InvalidCriterion { message: String },
    #[error("weight model produced invalid weight for {criterion}: {weight}")]
    InvalidWeight { criterion: String, weight: f64 },
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DecisionError>;
