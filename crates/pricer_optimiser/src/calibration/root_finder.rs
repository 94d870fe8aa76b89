//! Exact successive calibration with a Brent root per instrument.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::math::solvers::BrentSolver;
use pricer_core::types::CalibrationError;
use pricer_models::instruments::rates::Swaption;
use pricer_pricing::SwaptionPricer;

use super::instrument::{target_prices, CalibrationInstrument};
use super::{CalibrationConfig, CalibrationObjective};

/// Lifecycle of a calibration engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    /// No instrument yet.
    #[default]
    Idle,
    /// At least one instrument; ready to calibrate.
    InstrumentAdded,
    /// A `calibrate` call is running.
    Calibrating,
    /// The last `calibrate` call succeeded.
    Calibrated,
}

/// Calibrates one model value per instrument so that every instrument
/// reprices to its target.
///
/// # Example
///
/// ```ignore
/// use pricer_optimiser::calibration::{CalibrationConfig, HullWhiteObjective, SuccessiveRootFinderCalibration};
/// use pricer_pricing::analytical::SwaptionSabrMethod;
///
/// let mut calibration =
///     SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.01, 0.01), CalibrationConfig::default());
/// for swaption in coterminal {
///     calibration.add_instrument(swaption, &SwaptionSabrMethod, &sabr);
/// }
/// let params = calibration.calibrate(&curves)?;
/// ```
pub struct SuccessiveRootFinderCalibration<'a, O: CalibrationObjective> {
    objective: O,
    config: CalibrationConfig,
    instruments: Vec<CalibrationInstrument<'a>>,
    state: CalibrationState,
}

impl<'a, O: CalibrationObjective> SuccessiveRootFinderCalibration<'a, O> {
    /// Engine without instruments.
    pub fn new(objective: O, config: CalibrationConfig) -> Self {
        Self {
            objective,
            config,
            instruments: Vec::new(),
            state: CalibrationState::Idle,
        }
    }

    /// Appends `swaption`, targeting its price under `method` with `parameters`.
    pub fn add_instrument<M>(&mut self, swaption: Swaption, method: &'a M, parameters: &'a M::Parameters)
    where
        M: SwaptionPricer + Sync,
        M::Parameters: Sync,
    {
        tracing::debug!(
            index = self.instruments.len(),
            kind = swaption.kind(),
            expiry = swaption.expiry_time(),
            "calibration instrument added"
        );
        self.instruments.push(CalibrationInstrument::new(swaption, method, parameters));
        self.state = CalibrationState::InstrumentAdded;
    }

    /// Appends every swaption with the same target method.
    pub fn add_instruments<M, I>(&mut self, swaptions: I, method: &'a M, parameters: &'a M::Parameters)
    where
        M: SwaptionPricer + Sync,
        M::Parameters: Sync,
        I: IntoIterator<Item = Swaption>,
    {
        for swaption in swaptions {
            self.add_instrument(swaption, method, parameters);
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Number of instruments added.
    #[inline]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether no instrument was added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// The model side.
    #[inline]
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Solves the instruments in insertion order.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` without instruments
    /// - `InvalidParameter` if the instruments do not fit the objective or
    ///   a target price cannot be computed
    /// - `NotConverged` / `NumericalInstability` from the failing step, with
    ///   the values solved so far followed by the last iterate
    pub fn calibrate(&mut self, curves: &YieldCurveBundle) -> Result<O::Parameters, CalibrationError> {
        if self.instruments.is_empty() {
            return Err(CalibrationError::insufficient_data(0, 1));
        }
        self.state = CalibrationState::Calibrating;
        let result = self.solve(curves);
        self.state = match result {
            Ok(_) => CalibrationState::Calibrated,
            Err(_) => CalibrationState::InstrumentAdded,
        };
        result
    }

    fn solve(&self, curves: &YieldCurveBundle) -> Result<O::Parameters, CalibrationError> {
        let swaptions: Vec<Swaption> = self.instruments.iter().map(|i| i.swaption.clone()).collect();
        let targets = target_prices(&self.instruments, curves, 0)?;
        let objective = &self.objective;
        let solver = BrentSolver::new(self.config.solver);
        let (lower, upper) = objective.bounds();

        let mut parameters = objective.initial_parameters(&swaptions)?;
        let mut values = Vec::with_capacity(swaptions.len());
        let mut guess = objective.initial_value();
        for (k, (swaption, &target)) in swaptions.iter().zip(&targets).enumerate() {
            let (a, b) = self.config.bracket(guess);
            let mut last = (guess, f64::NAN);
            let solved = solver.find_root_bracketed(
                |value| {
                    let trial = objective.with_value(&parameters, &swaptions, k, value)?;
                    let residual = objective.price(swaption, curves, &trial)? - target;
                    last = (value, residual);
                    Ok::<_, CalibrationError>(residual)
                },
                a,
                b,
                lower,
                upper,
            );
            let value = match solved {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(instrument = k, target, last = last.0, error = %err, "calibration step failed");
                    return Err(step_failure(err, k, &values, last));
                }
            };
            parameters = objective.with_value(&parameters, &swaptions, k, value)?;
            tracing::debug!(instrument = k, target, value, "instrument calibrated");
            values.push(value);
            guess = value;
        }
        tracing::info!(instruments = values.len(), "successive root-finder calibration done");
        Ok(parameters)
    }
}

/// Failure of step `k`: the values of steps `0..k` followed by the last
/// iterate, with the last residual when the solver gave none.
pub(crate) fn step_failure(
    err: CalibrationError,
    k: usize,
    solved: &[f64],
    (last, residual): (f64, f64),
) -> CalibrationError {
    let mut partial = solved.to_vec();
    partial.push(last);
    let err = if err.residual_ss.is_nan() && residual.is_finite() {
        err.with_residual(residual * residual)
    } else {
        err
    };
    err.with_instrument(k).with_parameters(partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{G2ppObjective, HullWhiteObjective, LmmDdObjective};
    use crate::basket::{calibration_basket_fixed_leg_period, BasketStrikes};
    use crate::test_support::{bermudan_components, cash, curves, g2pp, lmm, physical, sabr};
    use approx::assert_abs_diff_eq;
    use pricer_core::math::solvers::SolverConfig;
    use pricer_core::sensitivity::CurrencyAmount;
    use pricer_core::types::PricingError;
    use pricer_models::models::HullWhiteParameters;
    use pricer_pricing::analytical::{SwaptionHullWhiteMethod, SwaptionSabrMethod};

    #[test]
    fn test_state_transitions() {
        let sabr = sabr();
        let mut calibration =
            SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.01, 0.01), CalibrationConfig::default());
        assert_eq!(calibration.state(), CalibrationState::Idle);
        calibration.add_instrument(physical(true), &SwaptionSabrMethod, &sabr);
        assert_eq!(calibration.state(), CalibrationState::InstrumentAdded);
        calibration.calibrate(&curves()).unwrap();
        assert_eq!(calibration.state(), CalibrationState::Calibrated);
    }

    #[test]
    fn test_empty_calibration() {
        let mut calibration =
            SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.01, 0.01), CalibrationConfig::default());
        let err = calibration.calibrate(&curves()).unwrap_err();
        assert!(err.is_insufficient_data());
        assert_eq!(calibration.state(), CalibrationState::Idle);
    }

    #[test]
    fn test_hull_white_recovers_its_own_volatilities() {
        let instruments = bermudan_components();
        let knots: Vec<f64> = instruments[..instruments.len() - 1].iter().map(Swaption::expiry_time).collect();
        let vols: Vec<f64> = (0..instruments.len()).map(|i| 0.008 + 0.0005 * i as f64).collect();
        let truth = HullWhiteParameters::new(0.02, vols.clone(), knots).unwrap();
        let mut calibration =
            SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.02, 0.01), CalibrationConfig::default());
        calibration.add_instruments(instruments, &SwaptionHullWhiteMethod, &truth);
        let calibrated = calibration.calibrate(&curves()).unwrap();
        for (c, t) in calibrated.volatilities().iter().zip(&vols) {
            assert_abs_diff_eq!(*c, *t, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_g2pp_reprices_sabr() {
        let sabr = sabr();
        let c = curves();
        let instruments = bermudan_components();
        let objective = G2ppObjective::new(g2pp());
        let mut calibration = SuccessiveRootFinderCalibration::new(objective, CalibrationConfig::default());
        calibration.add_instruments(instruments.clone(), &SwaptionSabrMethod, &sabr);
        let params = calibration.calibrate(&c).unwrap();
        for swaption in &instruments {
            let target = SwaptionSabrMethod.present_value(swaption, &c, &sabr).unwrap().amount();
            let model = calibration.objective().price(swaption, &c, &params).unwrap();
            assert_abs_diff_eq!(model, target, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_lmm_reprices_fixed_leg_basket() {
        let sabr = sabr();
        let c = curves();
        let swaption = physical(false);
        let basket = calibration_basket_fixed_leg_period(&swaption, BasketStrikes::Original).unwrap();
        let objective = LmmDdObjective::new(lmm(&swaption));
        let mut calibration = SuccessiveRootFinderCalibration::new(objective, CalibrationConfig::default());
        calibration.add_instruments(basket.clone(), &SwaptionSabrMethod, &sabr);
        let params = calibration.calibrate(&c).unwrap();
        for s in &basket {
            let target = SwaptionSabrMethod.present_value(s, &c, &sabr).unwrap().amount();
            assert_abs_diff_eq!(calibration.objective().price(s, &c, &params).unwrap(), target, epsilon = 1e-2);
        }
    }

    /// Hull-White price plus a premium no volatility can reach after `expiry`.
    struct Unreachable(f64);

    impl SwaptionPricer for Unreachable {
        type Parameters = HullWhiteParameters;

        fn present_value(
            &self,
            swaption: &Swaption,
            curves: &YieldCurveBundle,
            params: &HullWhiteParameters,
        ) -> Result<CurrencyAmount, PricingError> {
            let pv = SwaptionHullWhiteMethod.present_value(swaption, curves, params)?.amount();
            let premium = if swaption.expiry_time() > self.0 { 1e12 } else { 0.0 };
            Ok(CurrencyAmount::new(swaption.currency(), pv + premium))
        }
    }

    #[test]
    fn test_unreachable_target_keeps_partial_values() {
        let instruments = bermudan_components();
        let truth = HullWhiteParameters::constant(0.02, 0.01).unwrap();
        let target = Unreachable(3.5);
        let mut calibration =
            SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.02, 0.012), CalibrationConfig::default());
        calibration.add_instruments(instruments, &target, &truth);
        let err = calibration.calibrate(&curves()).unwrap_err();
        assert_eq!(err.instrument_index, Some(3));
        let partial = err.parameter_values.clone().unwrap();
        assert_eq!(partial.len(), 4);
        for v in &partial[..3] {
            assert_abs_diff_eq!(*v, 0.01, epsilon = 1e-9);
        }
        assert!(err.residual_ss.is_finite());
        assert_eq!(calibration.state(), CalibrationState::InstrumentAdded);
    }

    #[test]
    fn test_iteration_budget() {
        let sabr = sabr();
        let config = CalibrationConfig::default().with_solver(SolverConfig::new(1e-14, 2));
        let mut calibration = SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.01, 0.01), config);
        calibration.add_instruments(bermudan_components(), &SwaptionSabrMethod, &sabr);
        let err = calibration.calibrate(&curves()).unwrap_err();
        assert!(err.is_not_converged());
        assert_eq!(err.instrument_index, Some(0));
        assert_eq!(err.parameter_values.map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_same_expiry_is_rejected() {
        let sabr = sabr();
        let mut calibration =
            SuccessiveRootFinderCalibration::new(HullWhiteObjective::new(0.01, 0.01), CalibrationConfig::default());
        calibration.add_instrument(physical(true), &SwaptionSabrMethod, &sabr);
        calibration.add_instrument(cash(true), &SwaptionSabrMethod, &sabr);
        // same expiry twice cannot be split into Hull-White pieces
        let err = calibration.calibrate(&curves()).unwrap_err();
        assert_eq!(err.instrument_index, Some(1));
    }
}
