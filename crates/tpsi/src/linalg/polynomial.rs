use super::EncryptedMatrix;
use crate::primitives::Arithmetic;
use crate::{Error, Party, Result};
use itertools::{EitherOrBoth, Itertools};
use num_bigint::BigUint;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};

/// A polynomial with encrypted coefficients, stored as a `1 × (d + 1)`
/// encrypted matrix with the coefficients in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncryptedPolynomial<C> {
    coefficients: EncryptedMatrix<C>,
}

impl<C: Clone> EncryptedPolynomial<C> {
    /// Create a polynomial from its coefficients in ascending order.
    pub fn from_coefficients(coefficients: Vec<C>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::TooFewValues(0, 1));
        }
        let len = coefficients.len();
        Ok(Self {
            coefficients: EncryptedMatrix::from_vec(1, len, coefficients)?,
        })
    }

    /// The coefficients in ascending order.
    pub fn coefficients(&self) -> Vec<C> {
        self.coefficients.row(0)
    }

    /// Coefficient of `x^i`.
    pub fn coefficient(&self, i: usize) -> Option<&C> {
        self.coefficients.get(0, i)
    }

    /// The formal degree, i.e. the number of coefficients minus one.
    pub fn degree(&self) -> usize {
        self.coefficients.cols() - 1
    }

    /// The polynomial made of the first `len` coefficients.
    pub fn truncated(&self, len: usize) -> Result<Self> {
        let mut c = self.coefficients();
        c.truncate(len);
        Self::from_coefficients(c)
    }

    /// Homomorphic difference. Missing coefficients of the shorter operand
    /// count as zero.
    pub fn sub<S: ThresholdScheme<Ciphertext = C>>(&self, other: &Self, scheme: &S) -> Self {
        let c = self
            .coefficients()
            .iter()
            .zip_longest(other.coefficients().iter())
            .map(|pair| match pair {
                EitherOrBoth::Both(a, b) => scheme.sub(a, b),
                EitherOrBoth::Left(a) => a.clone(),
                EitherOrBoth::Right(b) => scheme.negate(b),
            })
            .collect_vec();
        let len = c.len();
        Self {
            coefficients: EncryptedMatrix::from_array(ndarray::Array2::from_shape_fn(
                (1, len),
                |(_, j)| c[j].clone(),
            )),
        }
    }

    /// The polynomial with the coefficients in the opposite order.
    pub fn reversed(&self) -> Self {
        let mut c = self.coefficients();
        c.reverse();
        Self {
            coefficients: EncryptedMatrix::from_array(ndarray::Array2::from_shape_fn(
                (1, c.len()),
                |(_, j)| c[j].clone(),
            )),
        }
    }

    /// Evaluate the polynomial at a public point, with Horner's rule.
    pub fn evaluate<S: ThresholdScheme<Ciphertext = C>>(&self, x: &BigUint, scheme: &S) -> C {
        // Never empty: the constructor rejects empty coefficient vectors.
        let c = self.coefficients();
        let d = self.degree();
        c[..d]
            .iter()
            .rev()
            .fold(c[d].clone(), |acc, ci| scheme.add(&scheme.scale(&acc, x), ci))
    }

    /// Evaluate the polynomial at several public points.
    pub fn evaluate_many<S: ThresholdScheme<Ciphertext = C>>(
        &self,
        xs: &[BigUint],
        scheme: &S,
    ) -> Vec<C> {
        xs.iter().map(|x| self.evaluate(x, scheme)).collect()
    }
}

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Product of two encrypted polynomials. All the coefficient products are
    /// computed in one batch.
    pub fn poly_mul<A: Arithmetic<S>>(
        &mut self,
        a: &EncryptedPolynomial<S::Ciphertext>,
        b: &EncryptedPolynomial<S::Ciphertext>,
        arithmetic: &A,
    ) -> Result<EncryptedPolynomial<S::Ciphertext>> {
        let (a, b) = (a.coefficients(), b.coefficients());
        let pairs = (0..a.len()).cartesian_product(0..b.len()).collect_vec();
        let lhs = pairs.iter().map(|(i, _)| a[*i].clone()).collect_vec();
        let rhs = pairs.iter().map(|(_, j)| b[*j].clone()).collect_vec();
        let products = arithmetic.multiply(self, &lhs, &rhs)?;

        let scheme = self.scheme();
        let mut c: Vec<Option<S::Ciphertext>> = vec![None; a.len() + b.len() - 1];
        for ((i, j), p) in pairs.iter().zip(products) {
            c[i + j] = Some(match c[i + j].take() {
                Some(acc) => scheme.add(&acc, &p),
                None => p,
            });
        }
        EncryptedPolynomial::from_coefficients(c.into_iter().flatten().collect())
    }
}
