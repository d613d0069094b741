//! Monte Carlo fulfilment simulation and mean-variance expected utility.
//!
//! The random source is always supplied by the caller. Nothing here owns or
//! caches a generator, so a fixed seed reproduces the same samples.

use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;
use statrs::statistics::Statistics;

use crate::error::{DecisionError, Result};
use crate::types::{Context, DecisionOption, FULFILMENT_VALUE};

pub const DEFAULT_SAMPLE_COUNT: usize = 100;
pub const DEFAULT_NOISE_SIGMA: f64 = 0.5;
pub const DEFAULT_RISK_LAMBDA: f64 = 0.01;

/// Context scaling: each unit of urgency or device presence adds half the
/// base fulfilment.
pub fn scaled_fulfilment(option: &DecisionOption, ctx: &Context) -> f64 {
    let base = option.param(FULFILMENT_VALUE);
    base * (1.0 + 0.5 * ctx.pressing_matters + 0.5 * ctx.device)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FulfilmentSimulator {
    sample_count: usize,
    noise_sigma: f64,
}

impl Default for FulfilmentSimulator {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            noise_sigma: DEFAULT_NOISE_SIGMA,
        }
    }
}

impl FulfilmentSimulator {
    pub fn new(sample_count: usize, noise_sigma: f64) -> Result<Self> {
        if sample_count == 0 {
            return Err(DecisionError::InvalidSampleCount);
        }
        if !noise_sigma.is_finite() || noise_sigma < 0.0 {
            return Err(DecisionError::InvalidNoiseSigma { value: noise_sigma });
        }
        Ok(Self {
            sample_count,
            noise_sigma,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn noise_sigma(&self) -> f64 {
        self.noise_sigma
    }

    /// Draw `sample_count` samples from Normal(scaled fulfilment, noise_sigma).
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        option: &DecisionOption,
        ctx: &Context,
        rng: &mut R,
    ) -> Vec<f64> {
        let mean = scaled_fulfilment(option, ctx);
        // Normal requires sigma > 0; zero noise is a point mass.
        match Normal::new(mean, self.noise_sigma) {
            Ok(dist) if self.noise_sigma > 0.0 => {
                (0..self.sample_count).map(|_| dist.sample(rng)).collect()
            }
            _ => vec![mean; self.sample_count],
        }
    }
}

/// `mean - risk_lambda * sample_variance`.
///
/// Variance is 0 with fewer than two samples; an empty slice scores 0.
pub fn expected_utility(samples: &[f64], risk_lambda: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().mean();
    let variance = if samples.len() > 1 {
        samples.iter().variance()
    } else {
        0.0
    };
    mean - risk_lambda * variance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn book() -> DecisionOption {
        DecisionOption::new("Read book").with(FULFILMENT_VALUE, 6.0)
    }

    #[test]
    fn expected_utility_zero_variance() {
        assert_eq!(expected_utility(&[5.0, 5.0, 5.0, 5.0], 0.01), 5.0);
    }

    #[test]
    fn expected_utility_penalizes_variance() {
        let eu = expected_utility(&[4.0, 6.0], 0.01);
        assert!((eu - 4.98).abs() < 1e-12);
    }

    #[test]
    fn expected_utility_single_and_empty() {
        assert_eq!(expected_utility(&[7.5], 10.0), 7.5);
        assert_eq!(expected_utility(&[], 0.01), 0.0);
    }

    #[test]
    fn scaling_uses_urgency_and_device() {
        let ctx = Context::new(1.0, 2.0).unwrap();
        // 6 * (1 + 1 + 0.5)
        assert_eq!(scaled_fulfilment(&book(), &ctx), 15.0);
        assert_eq!(scaled_fulfilment(&DecisionOption::new("x"), &ctx), 0.0);
    }

    #[test]
    fn same_seed_reproduces_samples() {
        let sim = FulfilmentSimulator::default();
        let ctx = Context::new(1.0, 2.0).unwrap();
        let a = sim.simulate(&book(), &ctx, &mut StdRng::seed_from_u64(7));
        let b = sim.simulate(&book(), &ctx, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(a, b);
    }

    #[test]
    fn samples_center_on_scaled_value() {
        let sim = FulfilmentSimulator::new(5_000, 0.5).unwrap();
        let ctx = Context::new(1.0, 2.0).unwrap();
        let samples = sim.simulate(&book(), &ctx, &mut StdRng::seed_from_u64(11));
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 15.0).abs() < 0.05, "mean={mean}");
    }

    #[test]
    fn zero_noise_is_deterministic() {
        let sim = FulfilmentSimulator::new(3, 0.0).unwrap();
        let samples = sim.simulate(&book(), &Context::default(), &mut StdRng::seed_from_u64(1));
        assert_eq!(samples, vec![6.0, 6.0, 6.0]);
    }

    #[test]
    fn new_rejects_invalid_knobs() {
        assert_eq!(
            FulfilmentSimulator::new(0, 0.5),
            Err(DecisionError::InvalidSampleCount)
        );
        assert!(FulfilmentSimulator::new(10, -1.0).is_err());
        assert!(FulfilmentSimulator::new(10, f64::NAN).is_err());
    }
}
