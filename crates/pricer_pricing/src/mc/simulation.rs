//! Path loop shared by the Monte Carlo methods.
//!
//! Normals are drawn sequentially from the generator, block by block, in
//! path order. With the `parallel` feature the payoffs of a block are
//! evaluated on the rayon pool; the values are collected in path order and
//! summed sequentially, so the estimate does not depend on the feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::MonteCarloConfig;
use crate::rng::NormalGenerator;

/// Paths drawn per block.
const BLOCK_PATHS: usize = 8192;

/// Sample mean with its standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonteCarloEstimate {
    /// Sample mean.
    pub value: f64,
    /// `sqrt(sample variance / paths)`.
    pub standard_error: f64,
    /// Number of paths; an antithetic pair counts once.
    pub paths: usize,
}

impl MonteCarloEstimate {
    /// Estimate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            standard_error: self.standard_error * factor.abs(),
            paths: self.paths,
        }
    }
}

fn path_value<F>(z: &[f64], antithetic: bool, payoff: &F) -> f64
where
    F: Fn(&[f64]) -> f64,
{
    if antithetic {
        let mirrored: Vec<f64> = z.iter().map(|v| -v).collect();
        0.5 * (payoff(z) + payoff(&mirrored))
    } else {
        payoff(z)
    }
}

fn block_values<F>(normals: &[f64], dim: usize, antithetic: bool, payoff: &F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    #[cfg(feature = "parallel")]
    {
        normals
            .par_chunks(dim)
            .map(|z| path_value(z, antithetic, payoff))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        normals
            .chunks(dim)
            .map(|z| path_value(z, antithetic, payoff))
            .collect()
    }
}

/// Runs `payoff` on `config.n_paths()` draws of `dim` normals each.
pub(crate) fn estimate<G, F>(config: &MonteCarloConfig, generator: &mut G, dim: usize, payoff: F) -> MonteCarloEstimate
where
    G: NormalGenerator + ?Sized,
    F: Fn(&[f64]) -> f64 + Sync,
{
    let dim = dim.max(1);
    let n = config.n_paths();
    let mut buffer = vec![0.0; BLOCK_PATHS.min(n) * dim];
    let (mut sum, mut sum_sq) = (0.0, 0.0);
    let mut remaining = n;
    while remaining > 0 {
        let paths = remaining.min(BLOCK_PATHS);
        let normals = &mut buffer[..paths * dim];
        generator.fill_normal(normals);
        for v in block_values(normals, dim, config.antithetic(), &payoff) {
            sum += v;
            sum_sq += v * v;
        }
        remaining -= paths;
    }
    let count = n as f64;
    let mean = sum / count;
    let variance = if n > 1 {
        ((sum_sq - count * mean * mean) / (count - 1.0)).max(0.0)
    } else {
        0.0
    };
    MonteCarloEstimate {
        value: mean,
        standard_error: (variance / count).sqrt(),
        paths: n,
    }
}

fn path_vector<F>(z: &[f64], antithetic: bool, f: &F) -> Vec<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    if antithetic {
        let mirrored: Vec<f64> = z.iter().map(|v| -v).collect();
        f(z).into_iter().zip(f(&mirrored)).map(|(a, b)| 0.5 * (a + b)).collect()
    } else {
        f(z)
    }
}

/// Sample mean of a vector-valued path function of length `len`.
pub(crate) fn mean_vector<G, F>(config: &MonteCarloConfig, generator: &mut G, dim: usize, len: usize, f: F) -> Vec<f64>
where
    G: NormalGenerator + ?Sized,
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    let dim = dim.max(1);
    let n = config.n_paths();
    let antithetic = config.antithetic();
    let mut buffer = vec![0.0; BLOCK_PATHS.min(n) * dim];
    let mut sum = vec![0.0; len];
    let mut remaining = n;
    while remaining > 0 {
        let paths = remaining.min(BLOCK_PATHS);
        let normals = &mut buffer[..paths * dim];
        generator.fill_normal(normals);
        #[cfg(feature = "parallel")]
        let values: Vec<Vec<f64>> = normals.par_chunks(dim).map(|z| path_vector(z, antithetic, &f)).collect();
        #[cfg(not(feature = "parallel"))]
        let values: Vec<Vec<f64>> = normals.chunks(dim).map(|z| path_vector(z, antithetic, &f)).collect();
        for v in values {
            for (s, x) in sum.iter_mut().zip(v) {
                *s += x;
            }
        }
        remaining -= paths;
    }
    sum.into_iter().map(|s| s / n as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PricerRng;
    use approx::assert_abs_diff_eq;

    fn config(paths: usize, antithetic: bool) -> MonteCarloConfig {
        MonteCarloConfig::builder()
            .n_paths(paths)
            .seed(7)
            .antithetic(antithetic)
            .build()
            .unwrap()
    }

    #[test]
    fn test_mean_of_second_moment() {
        let c = config(200_000, false);
        let mut rng = PricerRng::from_seed(c.seed());
        let e = estimate(&c, &mut rng, 2, |z| z[0] * z[0] + z[1]);
        assert_abs_diff_eq!(e.value, 1.0, epsilon = 5.0 * e.standard_error);
        assert!(e.standard_error > 0.0 && e.standard_error < 0.01);
        assert_eq!(e.paths, 200_000);
    }

    #[test]
    fn test_antithetic_removes_odd_part() {
        let c = config(1000, true);
        let mut rng = PricerRng::from_seed(c.seed());
        let e = estimate(&c, &mut rng, 3, |z| 2.0 + z[0] - 3.0 * z[2]);
        assert_abs_diff_eq!(e.value, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.standard_error, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_same_seed_same_result_across_blocks() {
        let c = config(BLOCK_PATHS + 17, false);
        let run = || {
            let mut rng = PricerRng::from_seed(c.seed());
            estimate(&c, &mut rng, 1, |z| z[0].max(0.0))
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_consumes_draws_in_path_order() {
        struct Counter(f64);
        impl NormalGenerator for Counter {
            fn next_normal(&mut self) -> f64 {
                self.0 += 1.0;
                self.0
            }
        }
        let c = config(3, false);
        let v = mean_vector(&c, &mut Counter(0.0), 2, 2, |z| z.to_vec());
        assert_eq!(v, vec![3.0, 4.0]);
    }
}
