//! Recovery of linear relations between the columns of encrypted rows.
//!
//! The solver performs an incremental Gaussian elimination on encrypted rows,
//! deciding at every step with a zero test whether the new pivot vanishes. The
//! first vanishing pivot, at column k, means that column k is a linear
//! combination of the previous ones; the coefficients of that combination are
//! recovered by back-substitution, still encrypted.
//!
//! The rows come from a [`RelationRows`] source:
//! - [`MinimalPolynomialRows`] recovers the minimal polynomial of a linearly
//!   recurrent sequence;
//! - [`RationalRows`] recovers a rational function from its values at sample
//!   points.

use crate::linalg::EncryptedPolynomial;
use crate::primitives::Arithmetic;
use crate::{Error, Party, Result};
use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::One;
use tpsi_math::zn::Modulus;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};
use tracing::{debug, info};

/// A source of encrypted rows for the relation solver.
pub trait RelationRows<C> {
    /// Number of columns of every row.
    fn width(&self) -> usize;

    /// Number of rows available.
    fn len(&self) -> usize;

    /// Returns whether the source has no row.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row `k`, with [`RelationRows::width`] entries.
    fn row(&self, k: usize) -> Vec<C>;

    /// Whether the relation for the first column beyond the last row is
    /// accepted without a zero test when the rows run out. Otherwise the
    /// solver reports that there is no relation.
    fn accept_unverified(&self) -> bool;
}

/// Rows `[s_k, s_{k+1}, …, s_{k+d}]` of a sequence, whose relation is the
/// minimal polynomial of the sequence when it has order at most d.
#[derive(Debug, Clone)]
pub struct MinimalPolynomialRows<C> {
    sequence: Vec<C>,
    order: usize,
}

impl<C: Clone> MinimalPolynomialRows<C> {
    /// Rows of `sequence` for a recurrence of order at most `order`.
    pub fn new(sequence: Vec<C>, order: usize) -> Result<Self> {
        if sequence.len() <= order {
            return Err(Error::TooFewValues(sequence.len(), order + 1));
        }
        Ok(Self { sequence, order })
    }
}

impl<C: Clone> RelationRows<C> for MinimalPolynomialRows<C> {
    fn width(&self) -> usize {
        self.order + 1
    }

    fn len(&self) -> usize {
        self.sequence.len() - self.order
    }

    fn row(&self, k: usize) -> Vec<C> {
        self.sequence[k..=k + self.order].to_vec()
    }

    fn accept_unverified(&self) -> bool {
        true
    }
}

/// Rows of the rational interpolation problem `f(x_k) = N(x_k) / D(x_k)`
/// with `deg N ≤ t + 1` and `deg D ≤ t`.
///
/// Column `2l` of row k holds `x_k^l` and column `2l + 1` holds
/// `-f_k·x_k^l`, so a relation splits into the coefficients of N (even
/// columns) and of D (odd columns).
#[derive(Debug, Clone)]
pub struct RationalRows<C> {
    rows: Vec<Vec<C>>,
    width: usize,
}

impl<C: Clone> RationalRows<C> {
    /// Build the rows from public sample points and encrypted values, for a
    /// denominator of degree at most `t`. `one` must be the encryption of 1
    /// shared by all the parties.
    pub fn new<S: ThresholdScheme<Ciphertext = C>>(
        points: &[BigUint],
        values: &[C],
        t: usize,
        one: &C,
        scheme: &S,
        q: &Modulus,
    ) -> Result<Self> {
        if points.len() != values.len() {
            return Err(Error::TooFewValues(values.len(), points.len()));
        }
        let width = 2 * t + 3;
        let rows = points
            .iter()
            .zip(values)
            .map(|(x, f)| {
                let mut power = BigUint::one();
                let mut row = Vec::with_capacity(width);
                for c in 0..width {
                    if c % 2 == 0 {
                        row.push(scheme.scale(one, &power));
                    } else {
                        row.push(scheme.scale(f, &q.neg(&power)));
                        power = q.mul(&power, x);
                    }
                }
                row
            })
            .collect();
        Ok(Self { rows, width })
    }

    /// Split a relation into the coefficients of the numerator and of the
    /// denominator, in ascending order.
    pub fn split(relation: &[C]) -> (Vec<C>, Vec<C>) {
        let (even, odd): (Vec<_>, Vec<_>) = relation
            .iter()
            .cloned()
            .enumerate()
            .partition(|(c, _)| c % 2 == 0);
        (
            even.into_iter().map(|(_, v)| v).collect(),
            odd.into_iter().map(|(_, v)| v).collect(),
        )
    }
}

impl<C: Clone> RelationRows<C> for RationalRows<C> {
    fn width(&self) -> usize {
        self.width
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, k: usize) -> Vec<C> {
        self.rows[k].clone()
    }

    fn accept_unverified(&self) -> bool {
        false
    }
}

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Find the first column that is a linear combination of the previous
    /// ones.
    ///
    /// Returns the encrypted coefficients `[y_0, …, y_{k-1}, 1]` such that
    /// `c_k + Σ_{l<k} y_l·c_l = 0`, or `None` if the rows ran out without a
    /// relation and the source does not accept unverified relations.
    pub fn find_relation<A: Arithmetic<S>, R: RelationRows<S::Ciphertext>>(
        &mut self,
        rows: &R,
        arithmetic: &A,
    ) -> Result<Option<Vec<S::Ciphertext>>> {
        let width = rows.width();
        let scheme = self.scheme();
        let one = BigUint::one();
        // stored[i] holds the entries of the i-th normalized row beyond column i.
        let mut stored: Vec<Vec<S::Ciphertext>> = vec![];

        for k in 0..rows.len().min(width) {
            let mut row = rows.row(k);
            if row.len() != width {
                return Err(Error::batch_mismatch(0, width, row.len()));
            }
            for (i, tail) in stored.iter().enumerate() {
                let factors = vec![row[i].clone(); tail.len()];
                let products = arithmetic.multiply(self, &factors, tail)?;
                for (entry, p) in row[i + 1..].iter_mut().zip(&products) {
                    *entry = scheme.sub(entry, p);
                }
            }
            if self.zero_test_one(&row[k])? {
                debug!(party = self.index(), column = k, "Relation found");
                return self.back_substitute(&stored, k, arithmetic).map(Some);
            }
            if k + 1 == width {
                return Ok(None);
            }
            let inverse = arithmetic
                .invert(self, std::slice::from_ref(&row[k]), &one)?
                .pop()
                .ok_or_else(|| Error::batch_mismatch(0, 1, 0))?;
            let tail = row.split_off(k + 1);
            let normalized = arithmetic.multiply(self, &vec![inverse; tail.len()], &tail)?;
            stored.push(normalized);
        }

        let k = stored.len();
        if rows.accept_unverified() && k < width {
            debug!(party = self.index(), column = k, "Rows exhausted, accepting relation");
            self.back_substitute(&stored, k, arithmetic).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Coefficients of column k in terms of the previous columns, given the
    /// normalized rows for columns 0..k.
    fn back_substitute<A: Arithmetic<S>>(
        &mut self,
        stored: &[Vec<S::Ciphertext>],
        k: usize,
        arithmetic: &A,
    ) -> Result<Vec<S::Ciphertext>> {
        let scheme = self.scheme();
        let mut y: Vec<S::Ciphertext> = Vec::with_capacity(k + 1);
        // y is filled from y_{k-1} down to y_0, then reversed.
        for i in (0..k).rev() {
            let u = |l: usize| stored[i][l - i - 1].clone();
            let mut acc = scheme.negate(&u(k));
            if i + 1 < k {
                let lhs = (i + 1..k).map(u).collect_vec();
                let rhs = y.iter().rev().cloned().collect_vec();
                let products = arithmetic.multiply(self, &lhs, &rhs)?;
                acc = products.iter().fold(acc, |acc, p| scheme.sub(&acc, p));
            }
            y.push(acc);
        }
        y.reverse();
        y.push(self.encrypted_one()?);
        Ok(y)
    }

    /// The minimal polynomial of an encrypted sequence satisfying a linear
    /// recurrence of order at most `order`, in ascending order and with a
    /// leading coefficient of one.
    ///
    /// The sequence must have at least `2·order` terms for the result to be
    /// the minimal polynomial.
    pub fn minimal_polynomial<A: Arithmetic<S>>(
        &mut self,
        sequence: &[S::Ciphertext],
        order: usize,
        arithmetic: &A,
    ) -> Result<EncryptedPolynomial<S::Ciphertext>> {
        info!(party = self.index(), order, "Computing a minimal polynomial");
        let rows = MinimalPolynomialRows::new(sequence.to_vec(), order)?;
        let relation = self
            .find_relation(&rows, arithmetic)?
            .ok_or_else(|| Error::DefaultError("No relation found".to_string()))?;
        EncryptedPolynomial::from_coefficients(relation)
    }
}

#[cfg(test)]
mod tests {
    use super::{MinimalPolynomialRows, RationalRows, RelationRows};
    use crate::primitives::{Interactive, Native};
    use crate::testing::{big, ct, run_three, TransparentCiphertext, TransparentScheme};
    use crate::Error;
    use num_bigint::BigUint;
    use tpsi_math::{poly, zn::Modulus};

    fn q() -> Modulus {
        Modulus::new((BigUint::from(1u32) << 127) - 1u32).unwrap()
    }

    fn plain(cts: &[TransparentCiphertext]) -> Vec<BigUint> {
        cts.iter().map(|c| c.0.clone()).collect()
    }

    fn signed(q: &Modulus, v: i64) -> BigUint {
        let magnitude = BigUint::from(v.unsigned_abs());
        if v < 0 {
            q.neg(&magnitude)
        } else {
            q.reduce(&magnitude)
        }
    }

    #[test]
    fn rows() {
        let rows = MinimalPolynomialRows::new([1, 2, 3, 4].map(ct).to_vec(), 2).unwrap();
        assert_eq!(rows.width(), 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.row(1), [2, 3, 4].map(ct).to_vec());
        assert!(MinimalPolynomialRows::new([1, 2].map(ct).to_vec(), 2).is_err());

        let (n, d) = RationalRows::split(&[0, 1, 2, 3, 4].map(ct));
        assert_eq!(n, [0, 2, 4].map(ct).to_vec());
        assert_eq!(d, [1, 3].map(ct).to_vec());

        let q = q();
        let scheme = TransparentScheme::new(2);
        let rows = RationalRows::new(&big(&[2]), &[ct(5)], 1, &ct(1), &scheme, &q).unwrap();
        assert_eq!(rows.width(), 5);
        assert_eq!(
            plain(&rows.row(0)),
            vec![
                BigUint::from(1u32),
                signed(&q, -5),
                BigUint::from(2u32),
                signed(&q, -10),
                BigUint::from(4u32)
            ]
        );
    }

    #[test]
    fn minimal_polynomial_reference() {
        let q = q();
        let sequence = [51, -79, -125, 441]
            .iter()
            .map(|v| TransparentCiphertext(signed(&q, *v)))
            .collect::<Vec<_>>();
        let results = run_three(|party| {
            let interactive = party.minimal_polynomial(&sequence, 2, &Interactive).unwrap();
            let native = party.minimal_polynomial(&sequence, 2, &Native).unwrap();
            let monic = party.monic(&interactive.reversed(), &Interactive).unwrap();
            (interactive, native, monic)
        });
        let inv4 = q.inv(&BigUint::from(4u32)).unwrap();
        for (interactive, native, monic) in results {
            assert_eq!(plain(&interactive.coefficients()), big(&[4, 1, 1]));
            assert_eq!(interactive, native);
            assert_eq!(
                plain(&monic.coefficients()),
                vec![inv4.clone(), inv4.clone(), BigUint::from(1u32)]
            );
        }
    }

    #[test]
    fn lower_order_relation_stops_early() {
        // s_k = 3^k satisfies s_{k+1} - 3 s_k = 0.
        let sequence = [1, 3, 9, 27, 81, 243].map(ct).to_vec();
        let results = run_three(|party| {
            party
                .minimal_polynomial(&sequence, 3, &Interactive)
                .unwrap()
        });
        let q = q();
        for p in results {
            assert_eq!(plain(&p.coefficients()), vec![signed(&q, -3), BigUint::from(1u32)]);
        }
    }

    #[test]
    fn rational_function() {
        let q = q();
        // f = (x - 7)(x - 9) / (x - 3)
        let numerator = poly::poly_from_roots(&big(&[7, 9]), &q);
        let denominator = poly::poly_from_roots(&big(&[3]), &q);
        let points = big(&[11, 29, 47, 83, 101]);
        let values = points
            .iter()
            .map(|x| {
                let d = q.inv(&poly::evaluate(&denominator, x, &q)).unwrap();
                TransparentCiphertext(q.mul(&poly::evaluate(&numerator, x, &q), &d))
            })
            .collect::<Vec<_>>();

        let results = run_three(|party| {
            let one = party.encrypted_one().unwrap();
            let (scheme, q) = (party.scheme(), party.modulus());
            let found = RationalRows::new(&points, &values, 1, &one, scheme, q).unwrap();
            let found = party.find_relation(&found, &Interactive).unwrap();
            let too_small =
                RationalRows::new(&points[..3], &values[..3], 0, &one, scheme, q).unwrap();
            let too_small = party.find_relation(&too_small, &Native).unwrap();
            (found, too_small)
        });
        for (found, too_small) in results {
            let (n, d) = RationalRows::split(&found.unwrap());
            assert_eq!(plain(&n), numerator);
            assert_eq!(plain(&d), denominator);
            assert!(too_small.is_none());
        }
    }

    #[test]
    fn mismatched_inputs() {
        let scheme = TransparentScheme::new(2);
        let r = RationalRows::new(&big(&[1, 2]), &[ct(1)], 0, &ct(1), &scheme, &q());
        assert!(matches!(r, Err(Error::TooFewValues(1, 2))));
    }
}
