//! Libor market model with displaced diffusion (LMM-DD).
//!
//! Forward rates `L_j` on the periods `[T_j, T_{j+1}]` follow
//! ```text
//! d(L_j + a_j) = (L_j + a_j) · (μ_j dt + e^{amr·t} γ_j · dW)
//! ```
//! with `γ_j` a vector of factor volatilities, `a_j` a displacement and
//! `amr` a common mean-reversion style time scaling of the volatilities.

use crate::instruments::rates::CouponIbor;

use super::ModelError;

/// Tolerance used to match a cash-flow time with a model time.
pub const TIME_TOLERANCE: f64 = 1e-3;

/// LMM-DD parameters on a fixed grid of ibor times.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LmmDdParameters {
    ibor_times: Vec<f64>,
    accrual_factors: Vec<f64>,
    displacements: Vec<f64>,
    volatilities: Vec<Vec<f64>>,
    mean_reversion: f64,
}

impl LmmDdParameters {
    /// Creates validated parameters.
    ///
    /// `ibor_times` are `T_0 < … < T_n`; the other per-period arrays have
    /// `n` entries and every volatility row has the same number of factors.
    pub fn new(
        ibor_times: Vec<f64>,
        accrual_factors: Vec<f64>,
        displacements: Vec<f64>,
        volatilities: Vec<Vec<f64>>,
        mean_reversion: f64,
    ) -> Result<Self, ModelError> {
        if ibor_times.len() < 2 {
            return Err(ModelError::DimensionMismatch {
                message: "at least two ibor times are required".to_string(),
            });
        }
        if let Some(index) = ibor_times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ModelError::NonIncreasingKnots { index: index + 1 });
        }
        let n = ibor_times.len() - 1;
        for (name, len) in [
            ("accrual factors", accrual_factors.len()),
            ("displacements", displacements.len()),
            ("volatility rows", volatilities.len()),
        ] {
            if len != n {
                return Err(ModelError::DimensionMismatch {
                    message: format!("{len} {name} for {n} periods"),
                });
            }
        }
        let factors = volatilities[0].len();
        if factors == 0 || volatilities.iter().any(|row| row.len() != factors) {
            return Err(ModelError::DimensionMismatch {
                message: "volatility rows must share a non-zero factor count".to_string(),
            });
        }
        if let Some(&value) = accrual_factors.iter().find(|d| !(**d > 0.0)) {
            return Err(ModelError::InvalidParameter {
                name: "accrual factor",
                value,
            });
        }
        if !mean_reversion.is_finite() {
            return Err(ModelError::InvalidMeanReversion {
                value: mean_reversion,
            });
        }
        Ok(Self {
            ibor_times,
            accrual_factors,
            displacements,
            volatilities,
            mean_reversion,
        })
    }

    /// Parameters on the periods of an ibor leg: `T_0` is the first fixing
    /// period start, `T_j` the coupon payment times. `volatility` gives the
    /// factor volatilities of a period from its start time.
    pub fn from_ibor_leg<F>(
        ibor_leg: &[CouponIbor],
        displacement: f64,
        mean_reversion: f64,
        volatility: F,
    ) -> Result<Self, ModelError>
    where
        F: Fn(f64) -> Vec<f64>,
    {
        let first = ibor_leg.first().ok_or(ModelError::DimensionMismatch {
            message: "empty ibor leg".to_string(),
        })?;
        let mut ibor_times = Vec::with_capacity(ibor_leg.len() + 1);
        ibor_times.push(first.fixing().start_time);
        ibor_times.extend(ibor_leg.iter().map(|c| c.payment_time()));
        let accrual_factors = ibor_leg.iter().map(|c| c.accrual_factor()).collect();
        let volatilities = ibor_times[..ibor_leg.len()].iter().map(|&t| volatility(t)).collect();
        Self::new(
            ibor_times,
            accrual_factors,
            vec![displacement; ibor_leg.len()],
            volatilities,
            mean_reversion,
        )
    }

    /// Model times `T_0 … T_n`.
    #[inline]
    pub fn ibor_times(&self) -> &[f64] {
        &self.ibor_times
    }

    /// Accrual factor of each period.
    #[inline]
    pub fn accrual_factors(&self) -> &[f64] {
        &self.accrual_factors
    }

    /// Displacement of each period.
    #[inline]
    pub fn displacements(&self) -> &[f64] {
        &self.displacements
    }

    /// Factor volatilities of each period.
    #[inline]
    pub fn volatilities(&self) -> &[Vec<f64>] {
        &self.volatilities
    }

    /// Time scaling of the volatilities.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Number of forward periods.
    pub fn number_of_periods(&self) -> usize {
        self.accrual_factors.len()
    }

    /// Number of Brownian factors.
    pub fn number_of_factors(&self) -> usize {
        self.volatilities[0].len()
    }

    /// Index of the model time within [`TIME_TOLERANCE`] of `time`.
    pub fn time_index(&self, time: f64) -> Option<usize> {
        let i = self.ibor_times.partition_point(|&t| t < time);
        [i.checked_sub(1), Some(i)]
            .into_iter()
            .flatten()
            .filter(|&j| j < self.ibor_times.len())
            .find(|&j| (self.ibor_times[j] - time).abs() < TIME_TOLERANCE)
    }

    /// Copy with the volatility of `period` on `factor` moved by `delta`.
    pub fn with_bumped_volatility(&self, period: usize, factor: usize, delta: f64) -> Result<Self, ModelError> {
        let n = self.number_of_periods();
        let m = self.number_of_factors();
        if period >= n || factor >= m {
            return Err(ModelError::IndexOutOfRange {
                index: period * m + factor,
                len: n * m,
            });
        }
        let mut copy = self.clone();
        copy.volatilities[period][factor] += delta;
        Ok(copy)
    }

    /// Copy with every volatility of the periods `start..end` multiplied by `factor`.
    pub fn with_scaled_periods(&self, start: usize, end: usize, factor: f64) -> Result<Self, ModelError> {
        self.check_range(start, end)?;
        let mut copy = self.clone();
        for row in &mut copy.volatilities[start..end] {
            for v in row.iter_mut() {
                *v *= factor;
            }
        }
        Ok(copy)
    }

    /// Copy with the displacement of the periods `start..end` set to `displacement`.
    pub fn with_displaced_periods(&self, start: usize, end: usize, displacement: f64) -> Result<Self, ModelError> {
        self.check_range(start, end)?;
        let mut copy = self.clone();
        for d in &mut copy.displacements[start..end] {
            *d = displacement;
        }
        Ok(copy)
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), ModelError> {
        let n = self.number_of_periods();
        if start > end || end > n {
            return Err(ModelError::IndexOutOfRange { index: end, len: n });
        }
        Ok(())
    }
}
