//! # Random Number Generation
//!
//! Monte Carlo methods draw their standard normals through the
//! [`NormalGenerator`] trait so that tests and callers can inject any
//! source. [`PricerRng`] is the seeded default.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::{NormalGenerator, PricerRng};
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::PricerRng;

/// Source of independent standard normal variates.
///
/// Draw order is part of the contract: a method consuming `n` values per
/// path takes them path by path, in order.
pub trait NormalGenerator {
    /// Next standard normal variate.
    fn next_normal(&mut self) -> f64;

    /// Fills `buffer` with standard normal variates.
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_normal();
        }
    }
}

impl<G: NormalGenerator + ?Sized> NormalGenerator for &mut G {
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }

    fn fill_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_normal(buffer)
    }
}
