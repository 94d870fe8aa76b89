//! Physical swaptions in the displaced-diffusion Libor market model.
//!
//! The swap is seen as an option on the bond `Σ_{j≥1} c_j P(θ, t_j)` struck
//! at the first cash flow equivalent. The bond volatility is frozen at a
//! mid point `B_M = (B_0 + K)/2` between its forward and its strike, where
//! the rates are moved along the first-order direction of the model, and
//! the option is priced with the Black formula on the bond.

use pricer_core::market_data::{YieldCurve, YieldCurveBundle};
use pricer_core::sensitivity::{CurrencyAmount, CurveSensitivity};
use pricer_core::types::PricingError;
use pricer_models::analytical::black_price;
use pricer_models::instruments::rates::Swaption;
use pricer_models::models::LmmDdParameters;

use crate::finite_difference::{parameter_sensitivity, swaption_curve_sensitivity};
use crate::method::{check_market, long_sign, SwaptionPricer};

const METHOD: &str = "LMM-DD approximation";
/// Volatility bump of the parameter sensitivity.
const VOLATILITY_SHIFT: f64 = 1e-6;
/// Curve bump of the curve sensitivity.
const CURVE_SHIFT: f64 = 1e-6;
/// Below this the mean reversion is treated as zero.
const MEAN_REVERSION_FLOOR: f64 = 1e-6;

/// `∫_0^θ e^{2 amr s} ds`.
pub(crate) fn mean_reversion_impact(mean_reversion: f64, expiry: f64) -> f64 {
    if mean_reversion.abs() < MEAN_REVERSION_FLOOR {
        expiry
    } else {
        ((2.0 * mean_reversion * expiry).exp() - 1.0) / (2.0 * mean_reversion)
    }
}

/// Cumulative drift loadings `μ_j = Σ_{k≤j} ρ_k γ_k` with
/// `ρ_k = (L_k + a_k)/(L_k + 1/δ_k)`.
fn cumulative_loadings(libors: &[f64], deltas: &[f64], displacements: &[f64], gammas: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let factors = gammas.first().map_or(0, Vec::len);
    let mut result: Vec<Vec<f64>> = Vec::with_capacity(libors.len());
    let mut running = vec![0.0; factors];
    for j in 0..libors.len() {
        let ratio = (libors[j] + displacements[j]) / (libors[j] + 1.0 / deltas[j]);
        for (r, g) in running.iter_mut().zip(&gammas[j]) {
            *r += ratio * g;
        }
        result.push(running.clone());
    }
    result
}

fn libors(discounts: &[f64], deltas: &[f64]) -> Vec<f64> {
    deltas
        .iter()
        .enumerate()
        .map(|(j, d)| (discounts[j] / discounts[j + 1] - 1.0) / d)
        .collect()
}

/// Undiscounted-at-`T_start` price inputs of the bond option.
struct BondOption {
    first_discount: f64,
    forward: f64,
    strike: f64,
    volatility: f64,
    is_call: bool,
}

fn bond_option(
    swaption: &Swaption,
    curves: &YieldCurveBundle,
    params: &LmmDdParameters,
) -> Result<BondOption, PricingError> {
    let swap = match swaption {
        Swaption::Physical(s) => s.underlying(),
        _ => {
            return Err(PricingError::UnsupportedInstrument(format!(
                "{METHOD} prices physically settled European swaptions only"
            )))
        }
    };
    let cfe = swap.cash_flow_equivalents(curves)?;
    let amounts = cfe.amounts();
    let first = *amounts
        .first()
        .ok_or_else(|| PricingError::InvalidInput("swap without cash flows".to_string()))?;
    let orientation = first.signum();

    let indices = cfe
        .times()
        .iter()
        .map(|&t| {
            params.time_index(t).ok_or_else(|| {
                PricingError::InvalidInput(format!("cash flow time {t:.4} is not an LMM ibor time"))
            })
        })
        .collect::<Result<Vec<usize>, PricingError>>()?;
    let start = indices.iter().copied().min().unwrap_or(0);
    let end = indices.iter().copied().max().unwrap_or(0);
    let count = end - start + 1;
    if count < 2 {
        return Err(PricingError::InvalidInput(
            "the swap must span at least one LMM period".to_string(),
        ));
    }
    let mut flows = vec![0.0; count];
    for (&index, &amount) in indices.iter().zip(amounts) {
        flows[index - start] = -orientation * amount;
    }

    let funding = curves.curve(swap.funding_curve())?;
    let discounts = params.ibor_times()[start..=end]
        .iter()
        .map(|&t| funding.discount_factor(t))
        .collect::<Result<Vec<f64>, _>>()?;
    let periods = start..end;
    let deltas = &params.accrual_factors()[periods.clone()];
    let displacements = &params.displacements()[periods.clone()];
    let gammas = &params.volatilities()[periods];

    let ratios: Vec<f64> = discounts.iter().map(|d| d / discounts[0]).collect();
    // Bond flows are c_1..c_{n}; the strike leg c_0 is paid at T_start.
    let bond_flows: Vec<f64> = ratios.iter().enumerate().map(|(j, p)| if j == 0 { 0.0 } else { flows[j] * p }).collect();
    let forward: f64 = bond_flows.iter().sum();
    let strike = -flows[0];
    let mid = 0.5 * (forward + strike);

    let expiry = swaption.expiry_time();
    let impact = mean_reversion_impact(params.mean_reversion(), expiry);

    let mu0 = cumulative_loadings(&libors(&discounts, deltas), deltas, displacements, gammas);
    let mut tau2 = vec![0.0; count];
    for j in 1..count {
        tau2[j] = mu0[j - 1].iter().map(|m| m * m).sum::<f64>() * impact;
    }
    let tau: Vec<f64> = tau2.iter().map(|t| t.sqrt()).collect();

    let numerator: f64 = -mid + bond_flows.iter().zip(&tau2).map(|(b, t2)| b - b * t2 / 2.0).sum::<f64>();
    let denominator: f64 = bond_flows.iter().zip(&tau).map(|(b, t)| b * t).sum();
    let x_bar = if denominator != 0.0 { numerator / denominator } else { 0.0 };

    let moved: Vec<f64> = ratios
        .iter()
        .zip(tau.iter().zip(&tau2))
        .map(|(p, (t, t2))| p * (1.0 - x_bar * t - t2 / 2.0))
        .collect();
    let weights: Vec<f64> = moved.iter().zip(&flows).enumerate().map(|(j, (p, c))| if j == 0 { 0.0 } else { c * p / mid }).collect();
    let mu_mid = cumulative_loadings(&libors(&moved, deltas), deltas, displacements, gammas);

    let factors = params.number_of_factors();
    let mut sigma = vec![0.0; factors];
    for (j, mu) in mu_mid.iter().enumerate() {
        for (s, m) in sigma.iter_mut().zip(mu) {
            *s += weights[j + 1] * m;
        }
    }
    let variance: f64 = sigma.iter().map(|s| s * s).sum::<f64>() * impact;

    Ok(BondOption {
        first_discount: discounts[0],
        forward,
        strike,
        volatility: variance.sqrt(),
        is_call: first < 0.0,
    })
}

/// Physically settled European swaptions by the LMM-DD bond approximation.
///
/// Every cash flow equivalent time of the swap must be an ibor time of
/// the model, within the model time tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaptionLmmDdMethod;

impl SwaptionLmmDdMethod {
    /// Present value.
    ///
    /// # Errors
    ///
    /// `UnsupportedInstrument` for cash-settled and Bermudan swaptions,
    /// `InvalidInput` when the swap does not fit on the model grid.
    pub fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        check_market(swaption, curves)?;
        let option = bond_option(swaption, curves, params)?;
        let price = black_price(option.forward, option.strike, 1.0, option.volatility, option.is_call);
        Ok(CurrencyAmount::new(
            swaption.currency(),
            long_sign(swaption.is_long()) * option.first_discount * price,
        ))
    }

    /// Black volatility of the bond option; the total volatility over the
    /// option life.
    pub fn implied_bond_volatility(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
    ) -> Result<f64, PricingError> {
        check_market(swaption, curves)?;
        Ok(bond_option(swaption, curves, params)?.volatility)
    }

    /// Sensitivity to each factor volatility, indexed `[period][factor]`.
    pub fn present_value_lmm_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
    ) -> Result<Vec<Vec<f64>>, PricingError> {
        let factors = params.number_of_factors();
        let flat = parameter_sensitivity(
            params,
            params.number_of_periods() * factors,
            VOLATILITY_SHIFT,
            |p, i, h| p.with_bumped_volatility(i / factors, i % factors, h),
            |p| Ok(self.present_value(swaption, curves, p)?.amount()),
        )?;
        Ok(flat.chunks(factors).map(<[f64]>::to_vec).collect())
    }

    /// Curve sensitivity by bumping the curve at the swap times.
    pub fn present_value_curve_sensitivity(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
    ) -> Result<CurveSensitivity, PricingError> {
        self.present_value(swaption, curves, params)?;
        swaption_curve_sensitivity(swaption, curves, CURVE_SHIFT, |bumped| {
            Ok(self.present_value(swaption, bumped, params)?.amount())
        })
    }
}

impl SwaptionPricer for SwaptionLmmDdMethod {
    type Parameters = LmmDdParameters;

    fn present_value(
        &self,
        swaption: &Swaption,
        curves: &YieldCurveBundle,
        params: &LmmDdParameters,
    ) -> Result<CurrencyAmount, PricingError> {
        SwaptionLmmDdMethod::present_value(self, swaption, curves, params)
    }
}
