//! Feasibility constraints.
//!
//! A constraint is a pure predicate over one option. Filtering keeps the
//! ordered subsequence of options that pass every constraint in the set.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DecisionError, Result};
use crate::types::{DecisionOption, TIME_TAKEN};

/// Default feasibility cutoff on `time_taken`.
pub const DEFAULT_TIME_THRESHOLD: f64 = 35.0;

pub trait Constraint: Send + Sync {
    /// Short label used in logs and rejection reports.
    fn name(&self) -> String;

    fn allows(&self, option: &DecisionOption) -> bool;
}

/// Comparison used by [`AttributeBound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundOp {
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = ">=")]
    AtLeast,
}

impl fmt::Display for BoundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundOp::AtMost => write!(f, "<="),
            BoundOp::AtLeast => write!(f, ">="),
        }
    }
}

/// Declarative bound on one attribute (missing attribute reads 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeBound {
    pub attribute: String,
    pub op: BoundOp,
    pub threshold: f64,
}

impl AttributeBound {
    pub fn new(attribute: impl Into<String>, op: BoundOp, threshold: f64) -> Self {
        Self {
            attribute: attribute.into(),
            op,
            threshold,
        }
    }

    /// `time_taken <= threshold`.
    pub fn max_time(threshold: f64) -> Self {
        Self::new(TIME_TAKEN, BoundOp::AtMost, threshold)
    }

    pub fn validate(&self) -> Result<()> {
        if self.attribute.trim().is_empty() {
            return Err(DecisionError::InvalidConstraint {
                message: "bound attribute must be non-empty".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(DecisionError::InvalidConstraint {
                message: format!(
                    "bound on {} has non-finite threshold {}",
                    self.attribute, self.threshold
                ),
            });
        }
        Ok(())
    }
}

impl Constraint for AttributeBound {
    fn name(&self) -> String {
        format!("{} {} {}", self.attribute, self.op, self.threshold)
    }

    fn allows(&self, option: &DecisionOption) -> bool {
        let v = option.param(&self.attribute);
        match self.op {
            BoundOp::AtMost => v <= self.threshold,
            BoundOp::AtLeast => v >= self.threshold,
        }
    }
}

/// Closure-backed constraint for caller-defined rules.
pub struct Predicate<F> {
    name: String,
    f: F,
}

impl<F> Predicate<F>
where
    F: Fn(&DecisionOption) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Constraint for Predicate<F>
where
    F: Fn(&DecisionOption) -> bool + Send + Sync,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn allows(&self, option: &DecisionOption) -> bool {
        (self.f)(option)
    }
}

/// Ordered, caller-extensible list of constraints.
#[derive(Clone)]
pub struct ConstraintSet {
    constraints: Vec<Arc<dyn Constraint>>,
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ConstraintSet {
    /// No constraints: every option is feasible.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The single `time_taken <= threshold` bound.
    pub fn with_time_threshold(threshold: f64) -> Self {
        let mut set = Self::empty();
        set.push(AttributeBound::max_time(threshold));
        set
    }

    pub fn push(&mut self, constraint: impl Constraint + 'static) {
        self.constraints.push(Arc::new(constraint));
    }

    pub fn push_arc(&mut self, constraint: Arc<dyn Constraint>) {
        self.constraints.push(constraint);
    }

    pub fn push_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&DecisionOption) -> bool + Send + Sync + 'static,
    {
        self.push(Predicate::new(name, f));
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.name()).collect()
    }

    /// Name of the first constraint the option fails, if any.
    pub fn first_violation(&self, option: &DecisionOption) -> Option<String> {
        self.constraints
            .iter()
            .find(|c| !c.allows(option))
            .map(|c| c.name())
    }
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }
}

/// An option removed by the filter and the first constraint it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub option: String,
    pub constraint: String,
}

/// Ordered subsequence of `options` passing every constraint.
pub fn apply_constraints(
    options: &[DecisionOption],
    constraints: &ConstraintSet,
) -> Vec<DecisionOption> {
    partition_constraints(options, constraints).0
}

/// Split `options` into survivors (input order) and rejections.
pub fn partition_constraints(
    options: &[DecisionOption],
    constraints: &ConstraintSet,
) -> (Vec<DecisionOption>, Vec<Rejection>) {
    let mut kept = Vec::with_capacity(options.len());
    let mut rejected = Vec::new();
    for opt in options {
        match constraints.first_violation(opt) {
            None => kept.push(opt.clone()),
            Some(constraint) => {
                debug!(option = %opt.name, constraint = %constraint, "option rejected");
                rejected.push(Rejection {
                    option: opt.name.clone(),
                    constraint,
                });
            }
        }
    }
    (kept, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(name: &str, time: f64) -> DecisionOption {
        DecisionOption::new(name).with(TIME_TAKEN, time)
    }

    #[test]
    fn default_threshold_rejects_long_options_and_keeps_order() {
        let options = vec![opt("a", 10.0), opt("b", 36.0), opt("c", 35.0), opt("d", 1.0)];
        let set = ConstraintSet::with_time_threshold(DEFAULT_TIME_THRESHOLD);
        let kept = apply_constraints(&options, &set);
        let names: Vec<&str> = kept.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn missing_time_reads_zero_and_passes() {
        let set = ConstraintSet::with_time_threshold(DEFAULT_TIME_THRESHOLD);
        let kept = apply_constraints(&[DecisionOption::new("free")], &set);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let set = ConstraintSet::with_time_threshold(DEFAULT_TIME_THRESHOLD);
        assert!(apply_constraints(&[], &set).is_empty());
    }

    #[test]
    fn caller_predicates_extend_the_set() {
        let mut set = ConstraintSet::with_time_threshold(DEFAULT_TIME_THRESHOLD);
        set.push_fn("not_b", |o: &DecisionOption| o.name != "b");
        set.push(AttributeBound::new("budget", BoundOp::AtMost, 10.0));

        let options = vec![
            opt("a", 1.0).with("budget", 5.0),
            opt("b", 1.0),
            opt("c", 1.0).with("budget", 20.0),
        ];
        let (kept, rejected) = partition_constraints(&options, &set);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "a");
        assert_eq!(
            rejected,
            vec![
                Rejection {
                    option: "b".to_string(),
                    constraint: "not_b".to_string()
                },
                Rejection {
                    option: "c".to_string(),
                    constraint: "budget <= 10".to_string()
                },
            ]
        );
    }

    #[test]
    fn shared_constraints_can_be_pushed_as_arcs() {
        let shared: Arc<dyn Constraint> = Arc::new(AttributeBound::new(
            "social_value",
            BoundOp::AtLeast,
            1.0,
        ));
        let mut set = ConstraintSet::empty();
        set.push_arc(Arc::clone(&shared));
        assert_eq!(set.names(), vec!["social_value >= 1".to_string()]);
        assert_eq!(
            set.first_violation(&opt("lonely", 1.0)),
            Some("social_value >= 1".to_string())
        );
        assert_eq!(set.first_violation(&opt("team", 1.0).with("social_value", 3.0)), None);
    }

    #[test]
    fn bound_deserializes_from_symbolic_op() {
        let bound: AttributeBound =
            serde_json::from_str(r#"{"attribute":"social_value","op":">=","threshold":2}"#)
                .unwrap();
        assert_eq!(bound.op, BoundOp::AtLeast);
        assert!(bound.allows(&DecisionOption::new("x").with("social_value", 2.0)));
        assert!(!bound.allows(&DecisionOption::new("y")));
    }

    #[test]
    fn bound_validation_rejects_blank_attribute() {
        assert!(AttributeBound::new(" ", BoundOp::AtMost, 1.0).validate().is_err());
        assert!(AttributeBound::new("x", BoundOp::AtMost, f64::NAN)
            .validate()
            .is_err());
    }
}
