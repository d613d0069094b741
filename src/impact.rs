//! Combinational impact: a deterministic, unnormalized bonus for options that
//! deliver learning, novelty and fulfilment quickly.
//!
//! The fulfilment term overlaps with the simulated expected utility. Both are
//! kept; changing that weighting is a product decision.

use crate::types::{DecisionOption, FULFILMENT_VALUE, LEARN_INDEX, NOVELTY_METER, TIME_TAKEN};

/// `learn/time + novelty/time + fulfilment/max(time, 1)`.
///
/// `time` is `time_taken`, read as 1 when absent. An explicit zero divides
/// the learn and novelty terms by 1 instead; negative times are used as given.
pub fn combinational_impact(option: &DecisionOption) -> f64 {
    let time = option.param_or(TIME_TAKEN, 1.0);
    let floored = time.max(1.0);
    let divisor = if time == 0.0 { 1.0 } else { time };

    let learn = option.param(LEARN_INDEX) / divisor;
    let novelty = option.param(NOVELTY_METER) / divisor;
    let fulfil = option.param(FULFILMENT_VALUE) / floored;
    learn + novelty + fulfil
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_book_example() {
        let opt = DecisionOption::new("Read book")
            .with(TIME_TAKEN, 5.0)
            .with(LEARN_INDEX, 5.0)
            .with(NOVELTY_METER, 3.0)
            .with(FULFILMENT_VALUE, 6.0);
        assert!((combinational_impact(&opt) - 2.8).abs() < 1e-12);
    }

    #[test]
    fn missing_time_defaults_to_one() {
        let opt = DecisionOption::new("x")
            .with(LEARN_INDEX, 2.0)
            .with(NOVELTY_METER, 1.0)
            .with(FULFILMENT_VALUE, 4.0);
        assert_eq!(combinational_impact(&opt), 7.0);
    }

    #[test]
    fn short_tasks_keep_full_fulfilment_floor() {
        // learn/novelty scale by 1/0.5, fulfilment is floored at time 1.
        let opt = DecisionOption::new("x")
            .with(TIME_TAKEN, 0.5)
            .with(LEARN_INDEX, 1.0)
            .with(FULFILMENT_VALUE, 3.0);
        assert_eq!(combinational_impact(&opt), 5.0);
    }

    #[test]
    fn zero_time_stays_finite() {
        let opt = DecisionOption::new("x")
            .with(TIME_TAKEN, 0.0)
            .with(LEARN_INDEX, 2.0)
            .with(NOVELTY_METER, 2.0);
        assert_eq!(combinational_impact(&opt), 4.0);
    }

    #[test]
    fn negative_time_divides_learn_and_novelty_directly() {
        let opt = DecisionOption::new("x")
            .with(TIME_TAKEN, -2.0)
            .with(LEARN_INDEX, 4.0)
            .with(NOVELTY_METER, 2.0)
            .with(FULFILMENT_VALUE, 6.0);
        assert_eq!(combinational_impact(&opt), 3.0);
    }
}
