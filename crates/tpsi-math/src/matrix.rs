//! Plaintext matrices over Z_N.
//!
//! Matrices are `ndarray::Array2<BigUint>` with reduced entries. The functions
//! here are used on random masks and on decrypted, masked values only.

use crate::zn::Modulus;
use crate::{Error, Result};
use ndarray::Array2;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// Sample a uniform `rows × cols` matrix.
pub fn random<R: RngCore + CryptoRng>(
    rows: usize,
    cols: usize,
    q: &Modulus,
    rng: &mut R,
) -> Array2<BigUint> {
    Array2::from_shape_fn((rows, cols), |_| q.random(rng))
}

fn check_same_shape(a: &Array2<BigUint>, b: &Array2<BigUint>) -> Result<()> {
    if a.dim() != b.dim() {
        Err(Error::DimensionMismatch {
            expected: a.dim(),
            found: b.dim(),
        })
    } else {
        Ok(())
    }
}

/// Entry-wise sum.
pub fn add(a: &Array2<BigUint>, b: &Array2<BigUint>, q: &Modulus) -> Result<Array2<BigUint>> {
    check_same_shape(a, b)?;
    Ok(Array2::from_shape_fn(a.dim(), |(i, j)| {
        q.add(&a[(i, j)], &b[(i, j)])
    }))
}

/// Entry-wise negation.
pub fn neg(a: &Array2<BigUint>, q: &Modulus) -> Array2<BigUint> {
    a.map(|v| q.neg(v))
}

/// Multiplication by a scalar.
pub fn scale(a: &Array2<BigUint>, k: &BigUint, q: &Modulus) -> Array2<BigUint> {
    a.map(|v| q.mul(v, k))
}

/// Matrix product.
pub fn matmul(a: &Array2<BigUint>, b: &Array2<BigUint>, q: &Modulus) -> Result<Array2<BigUint>> {
    let (r, s) = a.dim();
    let (s2, t) = b.dim();
    if s != s2 {
        return Err(Error::DimensionMismatch {
            expected: (s, t),
            found: (s2, t),
        });
    }
    Ok(Array2::from_shape_fn((r, t), |(i, j)| {
        (0..s).fold(BigUint::zero(), |acc, l| {
            q.add(&acc, &q.mul(&a[(i, l)], &b[(l, j)]))
        })
    }))
}
