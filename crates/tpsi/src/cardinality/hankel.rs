use crate::linalg::EncryptedMatrix;
use crate::{Error, Party, Result};
use ndarray::Array2;
use num_bigint::BigUint;
use tpsi_math::{matrix, zn::Modulus};
use tpsi_traits::{PartialDecrypter, ThresholdScheme};
use tracing::info;

/// The `size × size` Hankel matrix of a set at the point `u`, with entries
/// `H[j][k] = Σ_a u^{a·(j+k)}`.
///
/// The matrix is `Σ_a v_a·v_aᵀ` with `v_a = (1, u^a, …, u^{a·(size-1)})`, so
/// for a generic `u` its rank is `min(|items|, size)`.
pub fn hankel_matrix(items: &[BigUint], u: &BigUint, size: usize, q: &Modulus) -> Array2<BigUint> {
    let bases = items.iter().map(|a| q.pow(u, a)).collect::<Vec<_>>();
    let mut powers = vec![BigUint::from(1u32); bases.len()];
    let sequence = (0..(2 * size).saturating_sub(1))
        .map(|_| {
            let s = q.sum(&powers);
            powers
                .iter_mut()
                .zip(&bases)
                .for_each(|(p, b)| *p = q.mul(p, b));
            s
        })
        .collect::<Vec<_>>();
    Array2::from_shape_fn((size, size), |(j, k)| sequence[j + k].clone())
}

/// The contribution of one party to the encrypted Hankel matrix: the
/// Coordinator scales its matrix by `n - 1` and the Participants negate
/// theirs, so that the elements held by every party cancel out in the sum.
pub fn hankel_contribution(
    items: &[BigUint],
    u: &BigUint,
    size: usize,
    parties: usize,
    is_coordinator: bool,
    q: &Modulus,
) -> Array2<BigUint> {
    let h = hankel_matrix(items, u, size, q);
    if is_coordinator {
        matrix::scale(&h, &BigUint::from(parties - 1), q)
    } else {
        matrix::neg(&h, q)
    }
}

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// The encrypted Hankel matrix `(n-1)·H_0 - Σ_{i≥1} H_i`, of side T + 1,
    /// at a joint random point.
    ///
    /// Its rank is the number of elements outside the intersection of the
    /// sets, capped at T + 1.
    pub fn encrypted_hankel(
        &mut self,
        items: &[BigUint],
    ) -> Result<EncryptedMatrix<S::Ciphertext>> {
        let parameters = *self.setting().parameters();
        let size = parameters.hankel_size();
        info!(party = self.index(), size, "Building the encrypted Hankel matrix");
        let u = self
            .joint_public_random(1)?
            .pop()
            .ok_or_else(|| Error::batch_mismatch(0, 1, 0))?;
        let contribution = hankel_contribution(
            items,
            &u,
            size,
            parameters.parties(),
            self.setting().is_coordinator(),
            self.modulus(),
        );
        let table = self.encrypt_and_share(&contribution.iter().cloned().collect::<Vec<_>>())?;
        EncryptedMatrix::from_vec(size, size, self.sum_columns(&table)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{hankel_contribution, hankel_matrix};
    use crate::linalg::EncryptedMatrix;
    use crate::testing::{
        big, parameters, run_three, run_transparent, TransparentCiphertext, TransparentScheme,
    };
    use ndarray::{array, Array2};
    use num_bigint::BigUint;
    use tpsi_math::matrix;
    use tpsi_math::zn::Modulus;

    fn to_big(a: Array2<u64>) -> Array2<BigUint> {
        a.map(|v| BigUint::from(*v))
    }

    #[test]
    fn reference_matrix() {
        let q = Modulus::new(BigUint::from(11u32)).unwrap();
        let u = BigUint::from(6u32);
        let h = hankel_matrix(&big(&[2, 3, 5]), &u, 3, &q);
        assert_eq!(h, to_big(array![[3, 9, 4], [9, 4, 6], [4, 6, 8]]));
        assert_eq!(
            h.map(|v| v * 3u32),
            to_big(array![[9, 27, 12], [27, 12, 18], [12, 18, 24]])
        );

        let coordinator = hankel_contribution(&big(&[2, 3, 5]), &u, 3, 4, true, &q);
        assert_eq!(coordinator, matrix::scale(&h, &BigUint::from(3u32), &q));
        let participant = hankel_contribution(&big(&[2, 3, 5]), &u, 3, 4, false, &q);
        assert_eq!(participant, matrix::neg(&h, &q));
    }

    #[test]
    fn rank_counts_the_elements() {
        let q = Modulus::new((BigUint::from(1u32) << 127) - 1u32).unwrap();
        let u = BigUint::from(123456789u64);
        // 2 elements at size 3 and 3 elements at size 3
        let two = hankel_matrix(&big(&[10, 20]), &u, 3, &q);
        let three = hankel_matrix(&big(&[10, 20, 30]), &u, 3, &q);
        let encrypt = |h: &Array2<BigUint>| {
            EncryptedMatrix::from_array(h.map(|v| TransparentCiphertext(v.clone())))
        };
        let results = run_three(|party| {
            (
                party.is_singular(&encrypt(&two)).unwrap(),
                party.is_singular(&encrypt(&three)).unwrap(),
            )
        });
        assert!(results.iter().all(|r| *r == (true, false)));
    }

    #[test]
    fn encrypted_hankel_cancels_the_intersection() {
        let sets = [big(&[1, 2, 3]), big(&[1, 2, 4]), big(&[1, 2, 5])];
        let results = run_transparent(TransparentScheme::new(3), parameters(3, 2, 3), |party| {
            let h = party.encrypted_hankel(&sets[party.index()]).unwrap();
            (party.decrypt_matrix(&h).unwrap(), party.is_singular(&h).unwrap())
        });
        for (h, singular) in &results {
            assert_eq!(h, &results[0].0);
            assert_eq!(h.dim(), (3, 3));
            // Three elements outside the intersection: full rank.
            assert!(!singular);
        }
        // H[0][0] counts (n-1)·|S_0| - Σ|S_i| = 2·3 - 6 = 0.
        assert_eq!(results[0].0[(0, 0)], BigUint::from(0u32));
    }
}
