//! Extraction of the intersection.
//!
//! Every party i masks its root polynomial `P_i` with a random root ρ_i, and
//! the parties sum the encrypted evaluations of `M_i = P_i·(x - ρ_i)` at
//! 2T + 3 public points. The sum V has the intersection as common factor, so
//! for every party j, `V / P_j` is a rational function whose reduced
//! denominator has exactly the elements of j outside the intersection as
//! roots. The relation solver recovers this denominator under encryption, j
//! evaluates it at its elements and a zero test tells which ones are shared.

use crate::linalg::EncryptedPolynomial;
use crate::primitives::Arithmetic;
use crate::solver::RationalRows;
use crate::{Error, Party, Result};
use num_bigint::BigUint;
use num_traits::One;
use tpsi_math::poly;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};
use tracing::{debug, info};

/// The elements of one party, split by membership in the intersection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Membership {
    /// Elements held by every party.
    pub shared: Vec<BigUint>,
    /// Elements missing from at least one other party.
    pub unique: Vec<BigUint>,
}

impl Membership {
    /// Split `items` according to the zero tests of the denominator at each
    /// item: a root of the denominator is unique to this party.
    fn from_zero_tests(items: &[BigUint], is_root: &[bool]) -> Self {
        let mut membership = Self::default();
        for (item, root) in items.iter().zip(is_root) {
            if *root {
                membership.unique.push(item.clone());
            } else {
                membership.shared.push(item.clone());
            }
        }
        membership
    }
}

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Compute which elements of `items` are shared by all the parties.
    ///
    /// Returns `None`, at every party, if some party has more than T elements
    /// outside the intersection.
    pub fn intersect<A: Arithmetic<S>>(
        &mut self,
        items: &[BigUint],
        arithmetic: &A,
    ) -> Result<Option<Membership>> {
        let parameters = *self.setting().parameters();
        let q = self.modulus();
        info!(party = self.index(), "Extracting the intersection");

        let points = self.joint_public_random(parameters.sample_count())?;
        let root_polynomial = poly::poly_from_roots(items, q);
        let rho = q.random(self.rng());
        let masked = poly::mul(&root_polynomial, &[q.neg(&rho), BigUint::one()], q);
        let table = self.encrypt_and_share(&poly::evaluate_many(&masked, &points, q))?;
        let sums = self.sum_columns(&table)?;
        let one = self.encrypted_one()?;

        let mut membership = None;
        for j in 0..parameters.parties() {
            debug!(party = self.index(), owner = j, "Recovering a denominator");
            let own = if j == self.index() {
                Some(self.divide_by_roots(&sums, &root_polynomial, &points)?)
            } else {
                None
            };
            let values = self.publish_ciphertexts(j, own)?;
            let rows = RationalRows::new(
                &points,
                &values,
                parameters.threshold(),
                &one,
                self.scheme(),
                q,
            )?;
            let Some(relation) = self.find_relation(&rows, arithmetic)? else {
                info!(party = self.index(), owner = j, "No rational relation found");
                return Ok(None);
            };
            let (_, denominator) = RationalRows::split(&relation);
            let denominator = EncryptedPolynomial::from_coefficients(denominator)?;

            let own = (j == self.index()).then(|| denominator.evaluate_many(items, self.scheme()));
            let evaluations = self.publish_ciphertexts(j, own)?;
            let is_root = self.zero_test(&evaluations)?;
            if j == self.index() {
                membership = Some(Membership::from_zero_tests(items, &is_root));
            }
        }

        let membership = membership
            .ok_or_else(|| Error::role_mismatch(self.index(), "party of this run"))?;
        info!(
            party = self.index(),
            shared = membership.shared.len(),
            unique = membership.unique.len(),
            "Intersection extracted"
        );
        Ok(Some(membership))
    }

    /// The encrypted values `V(x_k) / P(x_k)`.
    fn divide_by_roots(
        &self,
        sums: &[S::Ciphertext],
        root_polynomial: &[BigUint],
        points: &[BigUint],
    ) -> Result<Vec<S::Ciphertext>> {
        let q = self.modulus();
        let scheme = self.scheme();
        points
            .iter()
            .zip(sums)
            .enumerate()
            .map(|(k, (x, v))| {
                let inverse = q
                    .inv(&poly::evaluate(root_polynomial, x, q))
                    .map_err(|_| Error::not_invertible_at_sample(k))?;
                Ok(scheme.scale(v, &inverse))
            })
            .collect()
    }
}
