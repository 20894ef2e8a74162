use super::EncryptedPolynomial;
use crate::primitives::Arithmetic;
use crate::{Error, Party, Result};
use num_bigint::BigUint;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};

/// Denominator of a [`RationalEncryptedPolynomial`].
#[derive(Debug, Clone, PartialEq)]
pub enum Denominator<C> {
    /// One denominator shared by every coefficient.
    Shared(C),
    /// One denominator per coefficient.
    PerCoefficient(Vec<C>),
}

/// A polynomial whose coefficients are fractions of encrypted values.
///
/// Divisions are deferred until [`Party::resolve_rational`] computes all the
/// needed inverses in one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalEncryptedPolynomial<C> {
    numerator: EncryptedPolynomial<C>,
    denominator: Denominator<C>,
}

impl<C: Clone> RationalEncryptedPolynomial<C> {
    /// Create a rational polynomial; a per-coefficient denominator must have
    /// one entry per coefficient of the numerator.
    pub fn new(numerator: EncryptedPolynomial<C>, denominator: Denominator<C>) -> Result<Self> {
        if let Denominator::PerCoefficient(d) = &denominator {
            if d.len() != numerator.degree() + 1 {
                return Err(Error::TooFewValues(d.len(), numerator.degree() + 1));
            }
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The numerators of the coefficients.
    pub fn numerator(&self) -> &EncryptedPolynomial<C> {
        &self.numerator
    }

    /// The denominators of the coefficients.
    pub fn denominator(&self) -> &Denominator<C> {
        &self.denominator
    }

    /// The formal degree.
    pub fn degree(&self) -> usize {
        self.numerator.degree()
    }
}

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Carry out the divisions of a rational polynomial.
    pub fn resolve_rational<A: Arithmetic<S>>(
        &mut self,
        r: &RationalEncryptedPolynomial<S::Ciphertext>,
        arithmetic: &A,
    ) -> Result<EncryptedPolynomial<S::Ciphertext>> {
        let one = BigUint::from(1u32);
        let numerators = r.numerator().coefficients();
        let inverses = match r.denominator() {
            Denominator::Shared(d) => {
                let inv = arithmetic
                    .invert(self, std::slice::from_ref(d), &one)?
                    .pop()
                    .ok_or_else(|| Error::batch_mismatch(0, 1, 0))?;
                vec![inv; numerators.len()]
            }
            Denominator::PerCoefficient(d) => arithmetic.invert(self, d, &one)?,
        };
        EncryptedPolynomial::from_coefficients(arithmetic.multiply(self, &numerators, &inverses)?)
    }

    /// Divide a polynomial by its leading coefficient.
    pub fn monic<A: Arithmetic<S>>(
        &mut self,
        p: &EncryptedPolynomial<S::Ciphertext>,
        arithmetic: &A,
    ) -> Result<EncryptedPolynomial<S::Ciphertext>> {
        let leading = p
            .coefficient(p.degree())
            .cloned()
            .ok_or_else(|| Error::DefaultError("Empty polynomial".to_string()))?;
        let r = RationalEncryptedPolynomial::new(p.clone(), Denominator::Shared(leading))?;
        self.resolve_rational(&r, arithmetic)
    }
}
