//! SABR smile parameters and implied volatility formulas.
//!
//! ```text
//! dF = α F^β dW_F
//! dα = ν α dW_α
//! d⟨W_F, W_α⟩ = ρ dt
//! ```
//!
//! The Black volatility is given by the Hagan et al. (2002) expansion,
//! with dedicated branches at the money, for `β = 0` and for `β = 1`.
//! [`hagan_volatility_adjoint`] differentiates the general branch with
//! respect to forward, strike and the four parameters.
//!
//! ## Usage
//!
//! ```
//! use pricer_models::models::sabr::{hagan_volatility, SabrPoint};
//!
//! let point = SabrPoint { alpha: 0.05, beta: 0.5, rho: -0.25, nu: 0.5 };
//! let vol = hagan_volatility(0.03, 0.035, 5.0, &point);
//! assert!(vol > 0.2 && vol < 0.4);
//! ```

use pricer_core::math::interpolators::BilinearInterpolator;

use super::ModelError;

const CUTOFF_MONEYNESS: f64 = 1e-12;
const SMALL_Z: f64 = 1e-6;
const LARGE_NEG_Z: f64 = -1e6;
const LARGE_POS_Z: f64 = 1e8;
const BETA_EPS: f64 = 1e-8;
const RHO_EPS: f64 = 1e-5;
const ATM_EPS: f64 = 1e-7;

/// SABR parameters at one (expiry, tenor) point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrPoint {
    /// Initial volatility level.
    pub alpha: f64,
    /// CEV exponent.
    pub beta: f64,
    /// Forward/volatility correlation.
    pub rho: f64,
    /// Volatility of volatility.
    pub nu: f64,
}

/// Hagan volatility and its derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SabrVolatilityAdjoint {
    /// Black volatility.
    pub volatility: f64,
    /// ∂σ/∂F
    pub forward: f64,
    /// ∂σ/∂K
    pub strike: f64,
    /// ∂σ/∂α
    pub alpha: f64,
    /// ∂σ/∂β
    pub beta: f64,
    /// ∂σ/∂ρ
    pub rho: f64,
    /// ∂σ/∂ν
    pub nu: f64,
}

/// Implied volatility approximation used by a [`SabrParameters`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SabrFormula {
    /// Hagan et al. expansion. The only formula with analytic sensitivities.
    #[default]
    Hagan,
    /// Obłój refinement of the leading term.
    Obloj,
}

impl SabrFormula {
    /// Black volatility under this formula.
    pub fn volatility(&self, forward: f64, strike: f64, expiry: f64, point: &SabrPoint) -> f64 {
        match self {
            SabrFormula::Hagan => hagan_volatility(forward, strike, expiry, point),
            SabrFormula::Obloj => obloj_volatility(forward, strike, expiry, point),
        }
    }
}

/// One of the four SABR parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SabrParameter {
    /// α
    Alpha,
    /// β
    Beta,
    /// ρ
    Rho,
    /// ν
    Nu,
}

/// SABR parameter surfaces indexed by (expiry, tenor).
#[derive(Debug, Clone, PartialEq)]
pub struct SabrParameters {
    alpha: BilinearInterpolator<f64>,
    beta: BilinearInterpolator<f64>,
    rho: BilinearInterpolator<f64>,
    nu: BilinearInterpolator<f64>,
    formula: SabrFormula,
}

impl SabrParameters {
    /// Parameter surfaces with the Hagan formula.
    pub fn new(
        alpha: BilinearInterpolator<f64>,
        beta: BilinearInterpolator<f64>,
        rho: BilinearInterpolator<f64>,
        nu: BilinearInterpolator<f64>,
    ) -> Self {
        Self {
            alpha,
            beta,
            rho,
            nu,
            formula: SabrFormula::Hagan,
        }
    }

    /// The same parameters at every (expiry, tenor).
    pub fn flat(point: SabrPoint) -> Result<Self, ModelError> {
        let axis = [0.0, 100.0];
        let flat = |v: f64| -> Result<BilinearInterpolator<f64>, ModelError> {
            let row = [v, v];
            Ok(BilinearInterpolator::new(&axis, &axis, &[&row, &row])?)
        };
        Ok(Self::new(
            flat(point.alpha)?,
            flat(point.beta)?,
            flat(point.rho)?,
            flat(point.nu)?,
        ))
    }

    /// Copy using another volatility formula.
    pub fn with_formula(mut self, formula: SabrFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Configured volatility formula.
    #[inline]
    pub fn formula(&self) -> SabrFormula {
        self.formula
    }

    /// Parameters at `(expiry, tenor)`.
    pub fn point(&self, expiry: f64, tenor: f64) -> SabrPoint {
        SabrPoint {
            alpha: self.alpha.interpolate(expiry, tenor),
            beta: self.beta.interpolate(expiry, tenor),
            rho: self.rho.interpolate(expiry, tenor),
            nu: self.nu.interpolate(expiry, tenor),
        }
    }

    /// Black volatility for an option expiring at `expiry` on a swap of `tenor`.
    pub fn volatility(&self, expiry: f64, tenor: f64, forward: f64, strike: f64) -> f64 {
        self.formula
            .volatility(forward, strike, expiry, &self.point(expiry, tenor))
    }

    /// Copy with one whole surface moved by `shift`.
    pub fn with_shifted(&self, parameter: SabrParameter, shift: f64) -> Self {
        let mut copy = self.clone();
        let surface = match parameter {
            SabrParameter::Alpha => &mut copy.alpha,
            SabrParameter::Beta => &mut copy.beta,
            SabrParameter::Rho => &mut copy.rho,
            SabrParameter::Nu => &mut copy.nu,
        };
        *surface = surface.shifted(shift);
        copy
    }
}

/// Hagan Black volatility.
pub fn hagan_volatility(forward: f64, strike: f64, expiry: f64, point: &SabrPoint) -> f64 {
    let SabrPoint { alpha, beta, rho, nu } = *point;
    if alpha == 0.0 {
        return 0.0;
    }
    let k = strike.max(forward * CUTOFF_MONEYNESS);
    let beta1 = 1.0 - beta;
    if (forward - k).abs() < ATM_EPS {
        let f1 = forward.powf(beta1);
        return alpha
            * (1.0
                + expiry
                    * (beta1 * beta1 * alpha * alpha / 24.0 / f1 / f1
                        + rho * alpha * beta * nu / 4.0 / f1
                        + nu * nu * (2.0 - 3.0 * rho * rho) / 24.0))
            / f1;
    }
    let ln = (forward / k).ln();
    if beta.abs() < BETA_EPS {
        let z = nu * (forward * k).sqrt() * ln / alpha;
        let r = z_over_chi(rho, z)[0];
        alpha * ln * r
            * (1.0 + expiry * (alpha * alpha / forward / k + nu * nu * (2.0 - 3.0 * rho * rho)) / 24.0)
            / (forward - k)
    } else if (beta - 1.0).abs() < BETA_EPS {
        let z = nu * ln / alpha;
        let r = z_over_chi(rho, z)[0];
        alpha * r * (1.0 + expiry * (rho * alpha * nu / 4.0 + nu * nu * (2.0 - 3.0 * rho * rho) / 24.0))
    } else {
        let f1 = (forward * k).powf(beta1);
        let f1_sqrt = f1.sqrt();
        let ln_beta_sq = (beta1 * ln).powi(2);
        let z = nu * f1_sqrt * ln / alpha;
        let r = z_over_chi(rho, z)[0];
        let first = alpha / (f1_sqrt * (1.0 + ln_beta_sq / 24.0 + ln_beta_sq * ln_beta_sq / 1920.0));
        let third = 1.0
            + expiry
                * (beta1 * beta1 * alpha * alpha / 24.0 / f1
                    + rho * nu * beta * alpha / 4.0 / f1_sqrt
                    + nu * nu * (2.0 - 3.0 * rho * rho) / 24.0);
        first * r * third
    }
}

/// Hagan volatility with its derivatives, by an algorithmic adjoint of
/// the general formula.
pub fn hagan_volatility_adjoint(
    forward: f64,
    strike: f64,
    expiry: f64,
    point: &SabrPoint,
) -> SabrVolatilityAdjoint {
    let SabrPoint { alpha, beta, rho, nu } = *point;
    let strike = strike.max(forward * CUTOFF_MONEYNESS);
    let t = expiry;
    let beta_star = 1.0 - beta;

    if alpha == 0.0 {
        let alpha_bar = if (forward - strike).abs() < ATM_EPS {
            (1.0 + (2.0 - 3.0 * rho * rho) * nu * nu / 24.0 * t) / forward.powf(beta_star)
        } else {
            // Unbounded away from the money; capped.
            1e7
        };
        return SabrVolatilityAdjoint {
            volatility: 0.0,
            forward: 0.0,
            strike: 0.0,
            alpha: alpha_bar,
            beta: 0.0,
            rho: 0.0,
            nu: 0.0,
        };
    }

    // Forward sweep.
    let sf_k = (forward * strike).powf(beta_star / 2.0);
    let ln = (forward / strike).ln();
    let z = nu / alpha * sf_k * ln;
    let sf1 = sf_k * (1.0 + beta_star * beta_star / 24.0 * ln * ln + beta_star.powi(4) / 1920.0 * ln.powi(4));
    let sf2 = 1.0
        + ((beta_star * alpha / sf_k).powi(2) / 24.0
            + rho * beta * nu * alpha / (4.0 * sf_k)
            + (2.0 - 3.0 * rho * rho) * nu * nu / 24.0)
            * t;
    let [r, r_rho, r_z] = z_over_chi(rho, z);
    let volatility = alpha / sf1 * r * sf2;

    // Backward sweep.
    let sf2_bar = alpha / sf1 * r;
    let sf1_bar = -alpha / (sf1 * sf1) * r * sf2;
    let r_bar = alpha / sf1 * sf2;
    let z_bar = r_z * r_bar;
    let ln_bar = sf_k * (beta_star * beta_star / 12.0 * ln + beta_star.powi(4) / 480.0 * ln.powi(3)) * sf1_bar
        + nu / alpha * sf_k * z_bar;
    let sf_k_bar = nu / alpha * ln * z_bar + sf1 / sf_k * sf1_bar
        - ((beta_star * alpha).powi(2) / sf_k.powi(3) / 12.0 + rho * beta * nu * alpha / 4.0 / (sf_k * sf_k))
            * t
            * sf2_bar;
    let strike_bar = -ln_bar / strike + beta_star * sf_k / (2.0 * strike) * sf_k_bar;
    let forward_bar = ln_bar / forward + beta_star * sf_k / (2.0 * forward) * sf_k_bar;
    let nu_bar = sf_k * ln / alpha * z_bar
        + (rho * beta * alpha / (4.0 * sf_k) + (2.0 - 3.0 * rho * rho) * nu / 12.0) * t * sf2_bar;
    let rho_bar = r_rho * r_bar + (beta * nu * alpha / (4.0 * sf_k) - rho * nu * nu / 4.0) * t * sf2_bar;
    let alpha_bar = -nu / (alpha * alpha) * sf_k * ln * z_bar
        + (beta_star * beta_star * alpha / (sf_k * sf_k) / 12.0 + rho * beta * nu / (4.0 * sf_k)) * t * sf2_bar
        + r * sf2 / sf1;
    let beta_bar = -0.5 * (forward * strike).ln() * sf_k * sf_k_bar
        - sf_k * (beta_star / 12.0 * ln * ln + beta_star.powi(3) / 480.0 * ln.powi(4)) * sf1_bar
        + (-beta_star * alpha * alpha / (sf_k * sf_k) / 12.0 + rho * nu * alpha / 4.0 / sf_k) * t * sf2_bar;

    SabrVolatilityAdjoint {
        volatility,
        forward: forward_bar,
        strike: strike_bar,
        alpha: alpha_bar,
        beta: beta_bar,
        rho: rho_bar,
        nu: nu_bar,
    }
}

/// Obłój volatility: Hagan's time correction on the refined leading term
/// `ν·ln(F/K) / x(z)` with `z = ν/α · (F^{1-β} - K^{1-β}) / (1-β)`.
pub fn obloj_volatility(forward: f64, strike: f64, expiry: f64, point: &SabrPoint) -> f64 {
    let SabrPoint { alpha, beta, rho, nu } = *point;
    if alpha == 0.0 {
        return 0.0;
    }
    let k = strike.max(forward * CUTOFF_MONEYNESS);
    let beta_star = 1.0 - beta;
    let sf_k = (forward * k).powf(beta_star / 2.0);
    let correction = 1.0
        + ((beta_star * alpha / sf_k).powi(2) / 24.0
            + rho * beta * nu * alpha / (4.0 * sf_k)
            + (2.0 - 3.0 * rho * rho) * nu * nu / 24.0)
            * expiry;
    let ln = (forward / k).ln();
    if ln.abs() < ATM_EPS {
        return alpha / forward.powf(beta_star) * correction;
    }
    let z = if beta_star.abs() < BETA_EPS {
        nu / alpha * ln
    } else {
        nu / alpha * (forward.powf(beta_star) - k.powf(beta_star)) / beta_star
    };
    if nu == 0.0 || z.abs() < SMALL_Z {
        // ν·ln/x(z) → α·ln/(∫_K^F u^{-β} du) as ν → 0.
        let integral = if beta_star.abs() < BETA_EPS {
            ln
        } else {
            (forward.powf(beta_star) - k.powf(beta_star)) / beta_star
        };
        return alpha * ln / integral * correction;
    }
    let chi = z / z_over_chi(rho, z)[0];
    nu * ln / chi * correction
}

/// `z / χ(z)` with its derivatives with respect to `ρ` and `z`.
fn z_over_chi(rho: f64, z: f64) -> [f64; 3] {
    if z.abs() < SMALL_Z {
        return [1.0 - rho * z / 2.0, -z / 2.0, -rho / 2.0];
    }
    let rho_star = 1.0 - rho;
    if rho_star.abs() < RHO_EPS {
        // Expansion of χ around ρ = 1.
        let (chi, chi_rho, chi_z) = if z > 1.0 {
            if rho_star == 0.0 {
                return [0.0, 0.0, 0.0];
            }
            ((2.0 * (z - 1.0)).ln() - rho_star.ln(), 1.0 / rho_star, 1.0 / (z - 1.0))
        } else if z < 1.0 {
            let q = z / (z - 1.0);
            (-(1.0 - z).ln() - 0.5 * q * q * rho_star, 0.5 * q * q, 1.0 / (1.0 - z))
        } else {
            return [0.0, 0.0, 0.0];
        };
        return [z / chi, -z * chi_rho / (chi * chi), 1.0 / chi - z * chi_z / (chi * chi)];
    }
    let root = (1.0 - 2.0 * rho * z + z * z).sqrt();
    let arg = if z < LARGE_NEG_Z {
        (rho * rho - 1.0) / 2.0 / z
    } else if z > LARGE_POS_Z {
        2.0 * (z - rho)
    } else {
        root + z - rho
    };
    if arg <= 0.0 {
        return [0.0, 0.0, 0.0];
    }
    let chi = arg.ln() - rho_star.ln();
    let chi_z = 1.0 / root;
    let chi_rho = (-z / root - 1.0) / arg + 1.0 / rho_star;
    [z / chi, -z * chi_rho / (chi * chi), 1.0 / chi - z * chi_z / (chi * chi)]
}
