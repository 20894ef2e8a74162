#![crate_name = "tpsi_util"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Utilities for the tpsi library: prime generation and uniform sampling of
//! big integers.

use num_bigint::{BigUint, RandBigInt};
use num_bigint_dig::RandPrime;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// Converts a `num-bigint-dig` integer into a `num-bigint` one.
fn from_dig(value: &num_bigint_dig::BigUint) -> BigUint {
    BigUint::from_bytes_be(&value.to_bytes_be())
}

/// Generate a random prime of exactly `bits` bits.
///
/// # Panics
///
/// Panics if `bits < 2`.
pub fn generate_prime<R: RngCore + CryptoRng>(bits: usize, rng: &mut R) -> BigUint {
    assert!(bits >= 2, "a prime needs at least two bits");
    from_dig(&rng.gen_prime(bits))
}

/// Sample a vector of `size` integers uniformly in `[0, bound)`.
///
/// # Panics
///
/// Panics if `bound` is zero.
pub fn sample_vec_below<R: RngCore + CryptoRng>(
    bound: &BigUint,
    size: usize,
    rng: &mut R,
) -> Vec<BigUint> {
    assert!(!bound.is_zero(), "cannot sample below zero");
    (0..size).map(|_| rng.gen_biguint_below(bound)).collect()
}

/// Sample an integer uniformly in `[1, bound)`.
///
/// # Panics
///
/// Panics if `bound < 2`.
pub fn sample_nonzero_below<R: RngCore + CryptoRng>(bound: &BigUint, rng: &mut R) -> BigUint {
    assert!(*bound > BigUint::from(1u32), "no nonzero value below the bound");
    loop {
        let v = rng.gen_biguint_below(bound);
        if !v.is_zero() {
            return v;
        }
    }
}
