//! LMM-DD volatility level calibration.

use std::ops::Range;

use pricer_core::types::{CalibrationError, PricingError};
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::LmmDdParameters;
use pricer_pricing::analytical::SwaptionLmmDdMethod;
use pricer_pricing::SwaptionPricer;

use super::objective::CalibrationObjective;

/// Multiplicative level of the LMM-DD volatilities, one per block of periods.
///
/// Instruments are ordered by underlying maturity. Instrument `k` owns the
/// periods between the maturity of instrument `k - 1` and its own; the last
/// instrument also owns the periods after its maturity. A value scales the
/// initial volatility rows of its block and of every later period.
#[derive(Debug, Clone)]
pub struct LmmDdObjective<M = SwaptionLmmDdMethod> {
    initial: LmmDdParameters,
    method: M,
}

impl LmmDdObjective {
    /// Objective priced with the LMM-DD approximation.
    pub fn new(initial: LmmDdParameters) -> Self {
        Self::with_method(initial, SwaptionLmmDdMethod)
    }
}

impl<M> LmmDdObjective<M>
where
    M: SwaptionPricer<Parameters = LmmDdParameters>,
{
    /// Objective priced with `method`.
    pub fn with_method(initial: LmmDdParameters, method: M) -> Self {
        Self { initial, method }
    }

    /// Parameters before calibration.
    #[inline]
    pub fn initial(&self) -> &LmmDdParameters {
        &self.initial
    }
}

/// Period block of each instrument, from the model time index of each
/// underlying maturity.
pub(crate) fn period_blocks(
    parameters: &LmmDdParameters,
    maturities: &[f64],
) -> Result<Vec<Range<usize>>, CalibrationError> {
    let n = parameters.number_of_periods();
    let mut blocks = Vec::with_capacity(maturities.len());
    let mut start = 0;
    for (k, &maturity) in maturities.iter().enumerate() {
        let end = parameters.time_index(maturity).ok_or_else(|| {
            CalibrationError::invalid_parameter(format!("maturity {maturity} is not an LMM ibor time"))
                .with_instrument(k)
        })?;
        if end <= start {
            return Err(CalibrationError::invalid_parameter(
                "LMM calibration maturities must be strictly increasing",
            )
            .with_instrument(k));
        }
        blocks.push(start..end);
        start = end;
    }
    if let Some(last) = blocks.last_mut() {
        last.end = n;
    }
    Ok(blocks)
}

/// Copy of `parameters` with the rows from `start` set to the initial rows
/// times `factor`.
pub(crate) fn with_level_from(
    parameters: &LmmDdParameters,
    initial: &LmmDdParameters,
    start: usize,
    factor: f64,
    displacement: Option<f64>,
) -> Result<LmmDdParameters, PricingError> {
    let n = parameters.number_of_periods();
    if start >= n {
        return Err(PricingError::InvalidInput(format!(
            "period {start} is past the {n} LMM periods"
        )));
    }
    let mut volatilities = parameters.volatilities().to_vec();
    for (row, base) in volatilities[start..].iter_mut().zip(&initial.volatilities()[start..]) {
        *row = base.iter().map(|v| v * factor).collect();
    }
    let mut displacements = parameters.displacements().to_vec();
    if let Some(d) = displacement {
        displacements[start..].fill(d);
    }
    Ok(LmmDdParameters::new(
        parameters.ibor_times().to_vec(),
        parameters.accrual_factors().to_vec(),
        displacements,
        volatilities,
        parameters.mean_reversion(),
    )?)
}

fn maturities(instruments: &[Swaption]) -> Vec<f64> {
    instruments.iter().map(|s| s.underlying().maturity_time()).collect()
}

impl<M> CalibrationObjective for LmmDdObjective<M>
where
    M: SwaptionPricer<Parameters = LmmDdParameters>,
{
    type Parameters = LmmDdParameters;
    type Method = M;

    fn method(&self) -> &M {
        &self.method
    }

    fn initial_parameters(&self, instruments: &[Swaption]) -> Result<LmmDdParameters, CalibrationError> {
        if let Some(k) = instruments.iter().position(|s| matches!(s, Swaption::Bermudan(_))) {
            return Err(CalibrationError::invalid_parameter("LMM calibration instruments must be European")
                .with_instrument(k));
        }
        period_blocks(&self.initial, &maturities(instruments))?;
        Ok(self.initial.clone())
    }

    fn with_value(
        &self,
        parameters: &LmmDdParameters,
        instruments: &[Swaption],
        index: usize,
        value: f64,
    ) -> Result<LmmDdParameters, PricingError> {
        let blocks = period_blocks(&self.initial, &maturities(instruments))?;
        let block = blocks.get(index).ok_or_else(|| {
            PricingError::InvalidInput(format!("no LMM period block for instrument {index}"))
        })?;
        with_level_from(parameters, &self.initial, block.start, value, None)
    }

    fn initial_value(&self) -> f64 {
        1.0
    }

    fn bounds(&self) -> (f64, f64) {
        (1e-4, 100.0)
    }
}
