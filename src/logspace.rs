/*
 * SPDX-FileCopyrightText: 2026 The logrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Arithmetic on probabilities stored as natural logarithms.
//!
//! On graphs with millions of nodes the probability mass of a single node can
//! be smaller than the smallest normal `f64`. Representing a mass *x* by ln *x*
//! keeps full precision: products become sums, and sums are computed by
//! [`log_add`], a numerically stable form of log-sum-exp.
//!
//! The logarithm of zero is [`LOG_ZERO`] (−∞), which is the identity of
//! [`log_add`].
//!
//! # Reductions
//!
//! Folding values is always done through a named [`Reduction`] chosen at the
//! use site:
//!
//! - [`LogSum`] folds log-space values with [`log_add`];
//! - [`LinearSum`] folds linear-space values with Kahan-compensated
//!   summation.
//!
//! Both are associative and commutative up to floating-point rounding, so
//! they can be applied to partial results computed in parallel in any order.
//!
//! ```
//! use logrank::logspace::{LinearSum, LogSum, Reduction};
//!
//! let log_total = LogSum::reduce([0.25_f64.ln(), 0.5_f64.ln(), 0.25_f64.ln()]);
//! assert!(log_total.abs() < 1E-12);
//!
//! let total = LinearSum::reduce([0.1, 0.2, 0.3]);
//! assert!((total - 0.6).abs() < 1E-15);
//! ```

use kahan::KahanSum;

/// The logarithm of zero mass.
pub const LOG_ZERO: f64 = f64::NEG_INFINITY;

/// Computes ln(*e*ᵃ + *e*ᵇ) without overflow or underflow.
///
/// If one of the arguments is [`LOG_ZERO`] the other one is returned
/// unchanged. Otherwise, letting *h* be the larger argument and *l* the
/// smaller one, the result is *h* + ln(1 + *e*ˡ⁻ʰ); since *l* − *h* ≤ 0 the
/// exponential cannot overflow.
///
/// # Examples
///
/// ```
/// use logrank::logspace::{log_add, LOG_ZERO};
///
/// assert_eq!(log_add(-3.0, LOG_ZERO), -3.0);
/// let s = log_add(0.2_f64.ln(), 0.3_f64.ln());
/// assert!((s.exp() - 0.5).abs() < 1E-15);
/// ```
#[inline]
#[must_use]
pub fn log_add(a: f64, b: f64) -> f64 {
    if a == LOG_ZERO {
        return b;
    }
    if b == LOG_ZERO {
        return a;
    }
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

/// Returns ln *x*, mapping every nonpositive value to [`LOG_ZERO`].
///
/// Masses are never negative, but a linear sum of masses can end up as a tiny
/// negative number because of rounding; treating it as zero avoids a NaN.
#[inline]
#[must_use]
pub fn ln_or_zero(x: f64) -> f64 {
    if x > 0.0 {
        x.ln()
    } else {
        LOG_ZERO
    }
}

/// A named, associative and commutative way of folding `f64` values.
///
/// An implementation provides an accumulator type with an identity, a way to
/// add a single value, a way to merge two partial accumulators (e.g., coming
/// from different partitions), and a final extraction.
pub trait Reduction {
    /// The partial state of a reduction.
    type Acc: Send;

    /// The accumulator corresponding to an empty input.
    fn identity() -> Self::Acc;

    /// Adds a single value to an accumulator.
    fn add(acc: Self::Acc, value: f64) -> Self::Acc;

    /// Merges two partial accumulators.
    fn merge(a: Self::Acc, b: Self::Acc) -> Self::Acc;

    /// Extracts the result from an accumulator.
    fn finish(acc: Self::Acc) -> f64;

    /// Reduces a sequence of values.
    fn reduce(values: impl IntoIterator<Item = f64>) -> f64 {
        Self::finish(values.into_iter().fold(Self::identity(), Self::add))
    }
}

/// Sums log-space values, yielding the logarithm of the linear sum.
#[derive(Debug, Clone, Copy)]
pub struct LogSum;

impl Reduction for LogSum {
    type Acc = f64;

    #[inline(always)]
    fn identity() -> f64 {
        LOG_ZERO
    }

    #[inline(always)]
    fn add(acc: f64, value: f64) -> f64 {
        log_add(acc, value)
    }

    #[inline(always)]
    fn merge(a: f64, b: f64) -> f64 {
        log_add(a, b)
    }

    #[inline(always)]
    fn finish(acc: f64) -> f64 {
        acc
    }
}

/// Sums linear-space values using Kahan compensation.
#[derive(Debug, Clone, Copy)]
pub struct LinearSum;

impl Reduction for LinearSum {
    type Acc = KahanSum<f64>;

    #[inline(always)]
    fn identity() -> KahanSum<f64> {
        KahanSum::new()
    }

    #[inline(always)]
    fn add(acc: KahanSum<f64>, value: f64) -> KahanSum<f64> {
        acc + value
    }

    #[inline(always)]
    fn merge(a: KahanSum<f64>, b: KahanSum<f64>) -> KahanSum<f64> {
        a + b
    }

    #[inline(always)]
    fn finish(acc: KahanSum<f64>) -> f64 {
        acc.sum()
    }
}
