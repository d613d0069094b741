//! Report generation for scoring runs.

use serde::Serialize;

use crate::constraints::Rejection;
use crate::engine::{CriterionContribution, Decision, OptionScore};
use crate::request::{DecisionRequest, RequestOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct ReportOptions {
    pub top_n: usize,
    pub include_breakdown: bool,
    pub include_rejected: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            include_breakdown: true,
            include_rejected: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub request_hash: String,
    pub summary: ReportSummary,
    pub ranked: Vec<ReportEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<Rejection>,
    pub run_stamp: RunStamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub options_submitted: usize,
    pub options_feasible: usize,
    pub selected: Option<String>,
    pub selected_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub name: String,
    pub total: f64,
    pub weighted_criteria: f64,
    pub expected_utility: f64,
    pub combinational_impact: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<CriterionContribution>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStamp {
    pub rng_seed: u64,
    pub sample_count: usize,
    pub risk_lambda: f64,
    pub noise_sigma: f64,
    pub time_threshold: f64,
}

pub fn build_report(
    req: &DecisionRequest,
    outcome: &RequestOutcome,
    opts: &ReportOptions,
) -> DecisionReport {
    let decision = &outcome.decision;
    let selected = decision.selected_option();

    let ranked = decision
        .scores
        .ranked()
        .into_iter()
        .take(opts.top_n)
        .enumerate()
        .map(|(idx, s)| ReportEntry::from_score(idx + 1, s, opts.include_breakdown))
        .collect();

    DecisionReport {
        request_hash: hash_request(req),
        summary: ReportSummary {
            options_submitted: req.options.len(),
            options_feasible: decision.scores.len(),
            selected: selected.map(|s| s.name.clone()),
            selected_score: selected.map(|s| s.total),
        },
        ranked,
        rejected: if opts.include_rejected {
            decision.rejected.clone()
        } else {
            Vec::new()
        },
        run_stamp: RunStamp {
            rng_seed: outcome.rng_seed,
            sample_count: req.config.sample_count,
            risk_lambda: req.config.risk_lambda,
            noise_sigma: req.config.noise_sigma,
            time_threshold: req.config.time_threshold,
        },
    }
}

impl ReportEntry {
    fn from_score(rank: usize, score: &OptionScore, include_breakdown: bool) -> Self {
        Self {
            rank,
            name: score.name.clone(),
            total: score.total,
            weighted_criteria: score.weighted_criteria,
            expected_utility: score.expected_utility,
            combinational_impact: score.combinational_impact,
            criteria: include_breakdown.then(|| score.criteria.clone()),
        }
    }
}

pub fn render_report_markdown(report: &DecisionReport) -> String {
    let mut out = String::new();
    out.push_str("# Decision Report\n\n");
    out.push_str(&format!("- Request hash: `{}`\n", report.request_hash));
    out.push_str(&format!(
        "- Options feasible/submitted: {}/{}\n",
        report.summary.options_feasible, report.summary.options_submitted
    ));
    match (&report.summary.selected, report.summary.selected_score) {
        (Some(name), Some(score)) => {
            out.push_str(&format!("- Selected: **{}** with score {:.3}\n", name, score));
        }
        _ => out.push_str("- Selected: none (no feasible option)\n"),
    }
    out.push_str(&format!("- RNG seed: {}\n", report.run_stamp.rng_seed));
    out.push_str(&format!(
        "- Samples: {}, risk lambda: {}, noise sigma: {}, time threshold: {}\n",
        report.run_stamp.sample_count,
        report.run_stamp.risk_lambda,
        report.run_stamp.noise_sigma,
        report.run_stamp.time_threshold
    ));

    out.push_str("\n## Scores\n\n");
    for entry in &report.ranked {
        out.push_str(&format!(
            "{}. {}: {:.3} (criteria {:.3}, expected utility {:.3}, impact {:.3})\n",
            entry.rank,
            entry.name,
            entry.total,
            entry.weighted_criteria,
            entry.expected_utility,
            entry.combinational_impact
        ));
        if let Some(criteria) = &entry.criteria {
            for c in criteria {
                out.push_str(&format!(
                    "   - `{}`: raw {:.3}, normalized {:.3} x weight {:.3} = {:.3}\n",
                    c.criterion, c.raw, c.normalized, c.weight, c.contribution
                ));
            }
        }
    }

    if !report.rejected.is_empty() {
        out.push_str("\n## Rejected\n\n");
        for r in &report.rejected {
            out.push_str(&format!("- {} (failed `{}`)\n", r.option, r.constraint));
        }
    }

    out
}

/// Stable summary line for callers that only need the pick.
pub fn summarize(decision: &Decision) -> String {
    match decision.selected_option() {
        Some(s) => format!("{} ({:.3})", s.name, s.total),
        None => "no feasible option".to_string(),
    }
}

fn hash_request(req: &DecisionRequest) -> String {
    let bytes = serde_json::to_vec(req).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}
