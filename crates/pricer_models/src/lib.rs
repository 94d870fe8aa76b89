//! # Pricer Models (L2: Business Logic)
//!
//! Swaption instruments, interest rate model parameters and the closed-form
//! kernels the pricing methods are built from.
//!
//! This crate provides:
//! - Analytical formulas: normal distribution, Black and Bachelier
//! - Accrual schedules for swap legs
//! - Rate instruments: coupons, fixed/ibor swaps, European and Bermudan
//!   swaptions, and a generator turning trade dates into model times
//! - Model parameters: Hull-White, G2++, LMM with displaced diffusion,
//!   SABR (with right extrapolation) and Black volatility surfaces
//!
//! ## Design Principles
//!
//! - **Immutable parameters**: bumps return new objects
//! - **Enum-based swaptions** for static dispatch in the pricing methods
//! - **Resolved times**: instruments carry year fractions from a reference
//!   date, so the kernels never touch calendars

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;
pub mod schedules;
