//! Exercise decision schedule of a swaption.
//!
//! Each exercise date of a swaption is paired with the cash-flow
//! equivalents of the swap it delivers. Tree, lattice and simulation
//! methods only need this schedule, not the coupon structure.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::types::PricingError;
use pricer_models::instruments::rates::{FixedIborSwap, Swaption};

use crate::method::check_market;

/// One exercise decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDecision {
    /// Exercise time.
    pub decision_time: f64,
    /// Cash-flow equivalent times of the delivered swap.
    pub impact_times: Vec<f64>,
    /// Cash-flow equivalent amounts of the delivered swap.
    pub impact_amounts: Vec<f64>,
}

/// Exercise decisions in increasing time order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSchedule {
    decisions: Vec<ExerciseDecision>,
}

impl DecisionSchedule {
    /// The decisions.
    #[inline]
    pub fn decisions(&self) -> &[ExerciseDecision] {
        &self.decisions
    }

    /// Number of exercise dates.
    #[inline]
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Whether there is no decision.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Latest cash-flow time over all decisions.
    pub fn last_impact_time(&self) -> f64 {
        self.decisions
            .iter()
            .flat_map(|d| d.impact_times.iter().copied())
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

fn decision(time: f64, swap: &FixedIborSwap, curves: &YieldCurveBundle) -> Result<ExerciseDecision, PricingError> {
    let cfe = swap.cash_flow_equivalents(curves)?;
    Ok(ExerciseDecision {
        decision_time: time,
        impact_times: cfe.times().to_vec(),
        impact_amounts: cfe.amounts().to_vec(),
    })
}

/// The decision schedule of any swaption.
///
/// The holder's side does not enter: a long and a short swaption share
/// their schedule. A cash-settled swaption reports the cash-flow
/// equivalents of its underlying as if it delivered physically.
///
/// # Errors
///
/// `InvalidInput` if a curve is missing or the dates disagree.
pub fn decision_schedule(swaption: &Swaption, curves: &YieldCurveBundle) -> Result<DecisionSchedule, PricingError> {
    check_market(swaption, curves)?;
    let decisions = match swaption {
        Swaption::Physical(s) => vec![decision(s.expiry_time(), s.underlying(), curves)?],
        Swaption::Cash(s) => vec![decision(s.expiry_time(), s.underlying(), curves)?],
        Swaption::Bermudan(s) => s
            .expiry_times()
            .iter()
            .zip(s.underlyings())
            .map(|(&t, swap)| decision(t, swap, curves))
            .collect::<Result<_, _>>()?,
    };
    Ok(DecisionSchedule { decisions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bermudan, cash, curves, physical};
    use pricer_core::market_data::CurveEnum;

    #[test]
    fn test_european_has_one_decision() {
        let c = curves();
        let swaption = physical(true, true);
        let schedule = decision_schedule(&swaption, &c).unwrap();
        assert_eq!(schedule.len(), 1);
        let d = &schedule.decisions()[0];
        assert_eq!(d.decision_time, swaption.expiry_time());
        assert_eq!(d.impact_times.len(), d.impact_amounts.len());
        assert!(d.impact_amounts[0] > 0.0);
        assert!((schedule.last_impact_time() - swaption.underlying().maturity_time()).abs() < 1e-2);
    }

    #[test]
    fn test_holder_side_and_settlement_do_not_matter() {
        let c = curves();
        let long = decision_schedule(&physical(false, true), &c).unwrap();
        assert_eq!(long, decision_schedule(&physical(false, false), &c).unwrap());
        assert_eq!(long, decision_schedule(&cash(false, true), &c).unwrap());
    }

    #[test]
    fn test_bermudan_decisions_are_ordered() {
        let schedule = decision_schedule(&bermudan(true, true), &curves()).unwrap();
        assert_eq!(schedule.len(), 5);
        let times: Vec<f64> = schedule.decisions().iter().map(|d| d.decision_time).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        // Later decisions deliver shorter swaps ending on the same date.
        let lens: Vec<usize> = schedule.decisions().iter().map(|d| d.impact_times.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] > w[1]));
        for d in schedule.decisions() {
            assert!(d.impact_times[0] >= d.decision_time);
        }
    }

    #[test]
    fn test_missing_curve() {
        let funding_only = YieldCurveBundle::new().with_curve("Funding", CurveEnum::flat(0.05));
        assert!(matches!(
            decision_schedule(&physical(true, true), &funding_only),
            Err(PricingError::InvalidInput(_))
        ));
    }
}
