//! Best-fit successive calibration of LMM-DD on strike baskets.

use pricer_core::market_data::YieldCurveBundle;
use pricer_core::math::solvers::LevenbergMarquardtSolver;
use pricer_core::types::CalibrationError;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::LmmDdParameters;
use pricer_pricing::analytical::SwaptionLmmDdMethod;
use pricer_pricing::SwaptionPricer;

use super::instrument::{target_prices, CalibrationInstrument};
use super::lmm_dd::{period_blocks, with_level_from};
use super::{CalibrationConfig, CalibrationState};

const LOWER: [f64; 2] = [1e-4, 0.0];
const UPPER: [f64; 2] = [10.0, 1.0];

/// Calibrates a volatility level and a displacement per basket of
/// swaptions, minimising the squared price differences of the basket.
///
/// Baskets are ordered by maturity; basket `b` owns the LMM periods
/// between the longest maturity of basket `b - 1` and its own, the last
/// basket also the periods after it. The fit is not exact: a basket across
/// strikes is matched at best by the two parameters.
pub struct SuccessiveLeastSquareCalibration<'a> {
    initial: LmmDdParameters,
    method: SwaptionLmmDdMethod,
    config: CalibrationConfig,
    baskets: Vec<Vec<CalibrationInstrument<'a>>>,
    state: CalibrationState,
}

impl<'a> SuccessiveLeastSquareCalibration<'a> {
    /// Engine starting from `initial`.
    pub fn new(initial: LmmDdParameters, config: CalibrationConfig) -> Self {
        Self {
            initial,
            method: SwaptionLmmDdMethod,
            config,
            baskets: Vec::new(),
            state: CalibrationState::Idle,
        }
    }

    /// Appends a basket, targeting each price under `method` with `parameters`.
    pub fn add_basket<M, I>(&mut self, swaptions: I, method: &'a M, parameters: &'a M::Parameters)
    where
        M: SwaptionPricer + Sync,
        M::Parameters: Sync,
        I: IntoIterator<Item = Swaption>,
    {
        let basket: Vec<_> = swaptions
            .into_iter()
            .map(|s| CalibrationInstrument::new(s, method, parameters))
            .collect();
        tracing::debug!(index = self.baskets.len(), size = basket.len(), "calibration basket added");
        if !basket.is_empty() {
            self.baskets.push(basket);
            self.state = CalibrationState::InstrumentAdded;
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Number of baskets added.
    #[inline]
    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    /// Whether no basket was added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    /// Fits the baskets in insertion order.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` without baskets
    /// - `InvalidParameter` if a basket maturity is not an LMM time or the
    ///   maturities do not increase
    /// - pricing or solver failures of a basket, with the values
    ///   `[level, displacement]` of the baskets fitted so far;
    ///   `instrument_index` is the basket index
    ///
    /// A fit that exhausts its iteration budget keeps its best iterate.
    pub fn calibrate(&mut self, curves: &YieldCurveBundle) -> Result<LmmDdParameters, CalibrationError> {
        if self.baskets.is_empty() {
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

    fn solve(&self, curves: &YieldCurveBundle) -> Result<LmmDdParameters, CalibrationError> {
        let maturities: Vec<f64> = self
            .baskets
            .iter()
            .map(|basket| {
                basket
                    .iter()
                    .map(|i| i.swaption.underlying().maturity_time())
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect();
        let blocks = period_blocks(&self.initial, &maturities)?;
        let solver = LevenbergMarquardtSolver::new(
            self.config
                .least_squares
                .clone()
                .with_bounds(LOWER.to_vec(), UPPER.to_vec()),
        );

        let mut parameters = self.initial.clone();
        let mut values = Vec::with_capacity(2 * self.baskets.len());
        let mut offset = 0;
        for (b, (basket, block)) in self.baskets.iter().zip(&blocks).enumerate() {
            let targets = target_prices(basket, curves, offset)?;
            offset += basket.len();
            let scale = targets.iter().fold(0.0_f64, |m, t| m.max(t.abs())).max(1.0);
            let start = block.start;
            let initial_guess = vec![1.0, self.initial.displacements()[start]];
            let base = &parameters;
            let fit = solver.try_solve(
                |x: &[f64]| -> Result<Vec<f64>, CalibrationError> {
                    let trial = with_level_from(base, &self.initial, start, x[0], Some(x[1]))?;
                    basket
                        .iter()
                        .zip(&targets)
                        .map(|(instrument, target)| -> Result<f64, CalibrationError> {
                            let pv = self.method.present_value(&instrument.swaption, curves, &trial)?;
                            Ok((pv.amount() - target) / scale)
                        })
                        .collect()
                },
                initial_guess,
            );
            let fit = match fit {
                Ok(fit) => {
                    if !fit.converged {
                        tracing::warn!(
                            basket = b,
                            iterations = fit.iterations,
                            rmse = fit.rmse(basket.len()) * scale,
                            "least-square budget exhausted, keeping the best iterate"
                        );
                    }
                    fit
                }
                Err(err) => {
                    tracing::warn!(basket = b, error = %err, "least-square fit failed");
                    return Err(err.with_instrument(b).with_parameters(values));
                }
            };
            parameters = with_level_from(&parameters, &self.initial, start, fit.params[0], Some(fit.params[1]))?;
            tracing::debug!(
                basket = b,
                level = fit.params[0],
                displacement = fit.params[1],
                rmse = fit.rmse(basket.len()) * scale,
                "basket calibrated"
            );
            values.extend_from_slice(&fit.params);
        }
        tracing::info!(baskets = self.baskets.len(), "successive least-square calibration done");
        Ok(parameters)
    }
}
