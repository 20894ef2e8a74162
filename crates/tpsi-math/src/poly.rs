//! Plaintext polynomials over Z_N.
//!
//! Polynomials are plain coefficient vectors in ascending order: `c[i]` is the
//! coefficient of `x^i`.

use crate::zn::Modulus;
use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// The monic polynomial whose roots are exactly `roots`, i.e. the product of
/// the factors `x + (-a)`.
pub fn poly_from_roots(roots: &[BigUint], q: &Modulus) -> Vec<BigUint> {
    let mut coeffs = vec![BigUint::one()];
    for a in roots {
        let minus_a = q.neg(a);
        // Multiply by (x - a): shift up and add -a times the old coefficients.
        let mut next = vec![BigUint::zero(); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i + 1] = q.add(&next[i + 1], c);
            next[i] = q.add(&next[i], &q.mul(c, &minus_a));
        }
        coeffs = next;
    }
    coeffs
}

/// Evaluate a polynomial at `x` with Horner's rule.
pub fn evaluate(coeffs: &[BigUint], x: &BigUint, q: &Modulus) -> BigUint {
    coeffs
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, c| q.add(&q.mul(&acc, x), c))
}

/// Product of two polynomials.
pub fn mul(a: &[BigUint], b: &[BigUint], q: &Modulus) -> Vec<BigUint> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    let mut out = vec![BigUint::zero(); a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            out[i + j] = q.add(&out[i + j], &q.mul(ai, bj));
        }
    }
    out
}

/// Evaluate a polynomial at every point of `xs`.
pub fn evaluate_many(coeffs: &[BigUint], xs: &[BigUint], q: &Modulus) -> Vec<BigUint> {
    xs.iter().map(|x| evaluate(coeffs, x, q)).collect_vec()
}
