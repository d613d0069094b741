//! Option store and context records.
//!
//! An option's `name` is its identity: every container keyed by option uses
//! the name, and two options sharing a name are the same candidate.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{DecisionError, Result};

/// Attribute read by the time criterion, the default constraint and the
/// combinational impact term.
pub const TIME_TAKEN: &str = "time_taken";
pub const SOCIAL_VALUE: &str = "social_value";
pub const NOVELTY_METER: &str = "novelty_meter";
pub const LEARN_INDEX: &str = "learn_index";
pub const MOVE_HEART: &str = "move_heart";
pub const FULFILMENT_VALUE: &str = "fulfilment_value";

/// A named candidate choice with numeric attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    /// Stable identifier.
    pub name: String,
    /// Named numeric attributes. Absent keys read as 0.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl DecisionOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, attribute: impl Into<String>, value: f64) -> Self {
        self.params.insert(attribute.into(), value);
        self
    }

    /// Attribute value, or 0 when absent.
    pub fn param(&self, attribute: &str) -> f64 {
        self.param_or(attribute, 0.0)
    }

    pub fn param_or(&self, attribute: &str, default: f64) -> f64 {
        self.params.get(attribute).copied().unwrap_or(default)
    }
}

/// Reject duplicate names and non-finite attribute values.
pub fn validate_candidates(options: &[DecisionOption]) -> Result<()> {
    let mut seen = HashSet::with_capacity(options.len());
    for opt in options {
        if !seen.insert(opt.name.as_str()) {
            return Err(DecisionError::DuplicateOption {
                name: opt.name.clone(),
            });
        }
        if let Some((attribute, value)) = opt.params.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DecisionError::NonFiniteAttribute {
                option: opt.name.clone(),
                attribute: attribute.clone(),
                value: *value,
            });
        }
    }
    Ok(())
}

/// Situational signals supplied once per scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Presence / availability signal.
    #[serde(default)]
    pub device: f64,
    /// Urgency signal.
    #[serde(default)]
    pub pressing_matters: f64,
}

impl Context {
    pub fn new(device: f64, pressing_matters: f64) -> Result<Self> {
        let ctx = Self {
            device,
            pressing_matters,
        };
        ctx.validate()?;
        Ok(ctx)
    }

    /// Both signals must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("device", self.device),
            ("pressing_matters", self.pressing_matters),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DecisionError::InvalidContext { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_param_reads_zero() {
        let opt = DecisionOption::new("a").with(TIME_TAKEN, 4.0);
        assert_eq!(opt.param(TIME_TAKEN), 4.0);
        assert_eq!(opt.param(LEARN_INDEX), 0.0);
        assert_eq!(opt.param_or(LEARN_INDEX, 1.0), 1.0);
    }

    #[test]
    fn validate_candidates_rejects_duplicate_names() {
        let options = vec![DecisionOption::new("a"), DecisionOption::new("a")];
        assert_eq!(
            validate_candidates(&options),
            Err(DecisionError::DuplicateOption {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn validate_candidates_rejects_non_finite_attribute() {
        let options = vec![DecisionOption::new("a").with(SOCIAL_VALUE, f64::INFINITY)];
        assert!(matches!(
            validate_candidates(&options),
            Err(DecisionError::NonFiniteAttribute { .. })
        ));
    }

    #[test]
    fn context_rejects_negative_and_nan_signals() {
        assert!(Context::new(1.0, 2.0).is_ok());
        assert!(matches!(
            Context::new(-1.0, 0.0),
            Err(DecisionError::InvalidContext {
                field: "device",
                ..
            })
        ));
        assert!(matches!(
            Context::new(0.0, f64::NAN),
            Err(DecisionError::InvalidContext {
                field: "pressing_matters",
                ..
            })
        ));
    }

    #[test]
    fn context_deserializes_with_defaults() {
        let ctx: Context = serde_json::from_str(r#"{"pressing_matters": 2}"#).unwrap();
        assert_eq!(ctx.device, 0.0);
        assert_eq!(ctx.pressing_matters, 2.0);
    }
}
