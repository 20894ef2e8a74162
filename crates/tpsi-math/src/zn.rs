//! Modular arithmetic in Z_N for arbitrary-precision moduli.

use crate::{Error, Result};
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// Structure encapsulating an integer modulus N ≥ 2.
///
/// Every value returned by the methods of this structure is reduced, i.e. lies
/// in `[0, N)`. Inputs are reduced first, so callers may pass unreduced values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modulus {
    p: BigUint,
}

impl Modulus {
    /// Create a modulus from an integer N ≥ 2.
    pub fn new(p: BigUint) -> Result<Self> {
        if p < BigUint::from(2u32) {
            Err(Error::InvalidModulus(p))
        } else {
            Ok(Self { p })
        }
    }

    /// Returns the value of the modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Reduce `a` modulo N.
    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.p
    }

    /// Modular addition.
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.p
    }

    /// Modular subtraction.
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let b = self.reduce(b);
        (a + &self.p - b) % &self.p
    }

    /// Modular negation.
    pub fn neg(&self, a: &BigUint) -> BigUint {
        let a = self.reduce(a);
        if a.is_zero() {
            a
        } else {
            &self.p - a
        }
    }

    /// Modular multiplication.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// Modular exponentiation.
    pub fn pow(&self, a: &BigUint, e: &BigUint) -> BigUint {
        a.modpow(e, &self.p)
    }

    /// Modular inverse, if it exists.
    pub fn inv(&self, a: &BigUint) -> Result<BigUint> {
        let a = self.reduce(a);
        a.modinv(&self.p).ok_or(Error::NotInvertible(a))
    }

    /// Sum of an iterator of values, reduced.
    pub fn sum<'a, I: IntoIterator<Item = &'a BigUint>>(&self, values: I) -> BigUint {
        values
            .into_iter()
            .fold(BigUint::zero(), |acc, v| self.add(&acc, v))
    }

    /// Sample a uniform value in `[0, N)`.
    pub fn random<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_below(&self.p)
    }

    /// Sample a uniform vector of values in `[0, N)`.
    pub fn random_vec<R: RngCore + CryptoRng>(&self, size: usize, rng: &mut R) -> Vec<BigUint> {
        tpsi_util::sample_vec_below(&self.p, size, rng)
    }

    /// Sample a uniform nonzero value.
    pub fn random_nonzero<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        tpsi_util::sample_nonzero_below(&self.p, rng)
    }

    /// Sample a uniform invertible value.
    pub fn random_invertible<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        loop {
            let v = self.random_nonzero(rng);
            if self.inv(&v).is_ok() {
                return v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Modulus;
    use crate::Error;
    use num_bigint::BigUint;
    use proptest::prelude::*;
    use rand::thread_rng;

    fn m127() -> Modulus {
        Modulus::new((BigUint::from(1u32) << 127) - 1u32).unwrap()
    }

    #[test]
    fn constructor() {
        assert!(Modulus::new(BigUint::from(0u32)).is_err());
        assert!(Modulus::new(BigUint::from(1u32)).is_err());
        assert!(Modulus::new(BigUint::from(2u32)).is_ok());
        assert!(Modulus::new(BigUint::from(11u32)).is_ok());
    }

    #[test]
    fn small_modulus() {
        let q = Modulus::new(BigUint::from(11u32)).unwrap();
        assert_eq!(q.reduce(&BigUint::from(90u32)), BigUint::from(2u32));
        assert_eq!(q.neg(&BigUint::from(0u32)), BigUint::from(0u32));
        assert_eq!(q.neg(&BigUint::from(3u32)), BigUint::from(8u32));
        assert_eq!(q.sub(&BigUint::from(2u32), &BigUint::from(5u32)), BigUint::from(8u32));
        assert_eq!(q.inv(&BigUint::from(4u32)).unwrap(), BigUint::from(3u32));
        assert_eq!(
            q.inv(&BigUint::from(0u32)),
            Err(Error::NotInvertible(BigUint::from(0u32)))
        );
    }

    #[test]
    fn composite_modulus() {
        let q = Modulus::new(BigUint::from(15u32)).unwrap();
        assert!(q.inv(&BigUint::from(6u32)).is_err());
        assert_eq!(q.inv(&BigUint::from(7u32)).unwrap(), BigUint::from(13u32));
        let mut rng = thread_rng();
        for _ in 0..50 {
            let v = q.random_invertible(&mut rng);
            assert!(q.inv(&v).is_ok());
        }
    }

    proptest! {
        #[test]
        fn inverse_is_inverse(a in 1u128..u128::MAX) {
            let q = m127();
            let a = q.reduce(&BigUint::from(a));
            prop_assume!(a != BigUint::from(0u32));
            let inv = q.inv(&a).unwrap();
            prop_assert_eq!(q.mul(&a, &inv), BigUint::from(1u32));
        }

        #[test]
        fn add_sub_neg(a: u128, b: u128) {
            let q = m127();
            let (a, b) = (BigUint::from(a), BigUint::from(b));
            let s = q.add(&a, &b);
            prop_assert_eq!(q.sub(&s, &b), q.reduce(&a));
            prop_assert_eq!(q.add(&q.neg(&a), &a), BigUint::from(0u32));
        }
    }
}
