use super::EncryptedMatrix;
use crate::{Error, Party, Result};
use ndarray::Array2;
use num_bigint::BigUint;
use tpsi_math::matrix;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Threshold decryption of a whole matrix.
    pub fn decrypt_matrix(
        &mut self,
        m: &EncryptedMatrix<S::Ciphertext>,
    ) -> Result<Array2<BigUint>> {
        let values = self.threshold_decrypt(&m.to_vec())?;
        Array2::from_shape_vec(m.dim(), values).map_err(|e| Error::DefaultError(e.to_string()))
    }

    /// A `rows × cols` matrix whose plaintext is the sum of one random matrix
    /// per party. Returns this party's matrix and the encrypted sum.
    pub fn joint_random_matrix(
        &mut self,
        rows: usize,
        cols: usize,
    ) -> Result<(Array2<BigUint>, EncryptedMatrix<S::Ciphertext>)> {
        let (own, sums) = self.joint_encrypted_random(rows * cols)?;
        Ok((
            Array2::from_shape_vec((rows, cols), own)
                .map_err(|e| Error::DefaultError(e.to_string()))?,
            EncryptedMatrix::from_vec(rows, cols, sums)?,
        ))
    }

    /// Encrypted product of two encrypted matrices, computed with masking
    /// and without any ciphertext-by-ciphertext multiplication.
    ///
    /// With joint random masks `RA = Σ RA_i` and `RB = Σ RB_i`, the parties
    /// open `MA = A + RA` and `MB = B + RB`; party i contributes
    /// `RA·RB_i - MA·RB_i - RA_i·MB`, the Coordinator adds `MA·MB`, and the
    /// contributions sum to `A·B`.
    pub fn masked_matmul(
        &mut self,
        a: &EncryptedMatrix<S::Ciphertext>,
        b: &EncryptedMatrix<S::Ciphertext>,
    ) -> Result<EncryptedMatrix<S::Ciphertext>> {
        let (r, s) = a.dim();
        let (s2, t) = b.dim();
        if s != s2 || s == 0 {
            return Err(tpsi_math::Error::DimensionMismatch {
                expected: (s, t),
                found: (s2, t),
            }
            .into());
        }
        self.next_round("masked matrix product");
        let q = self.modulus();
        let scheme = self.scheme();

        let ra_i = matrix::random(r, s, q, self.rng());
        let rb_i = matrix::random(s, t, q, self.rng());
        let own = ra_i.iter().chain(rb_i.iter()).cloned().collect::<Vec<_>>();
        let table = self.encrypt_and_share(&own)?;
        let mut sums = self.sum_columns(&table)?;
        let rb = EncryptedMatrix::from_vec(s, t, sums.split_off(r * s))?;
        let ra = EncryptedMatrix::from_vec(r, s, sums)?;

        let ma = a.add(&ra, scheme)?;
        let mb = b.add(&rb, scheme)?;
        let mut opened = self.threshold_decrypt(&[ma.to_vec(), mb.to_vec()].concat())?;
        let mb = Array2::from_shape_vec((s, t), opened.split_off(r * s))
            .map_err(|e| Error::DefaultError(e.to_string()))?;
        let ma = Array2::from_shape_vec((r, s), opened)
            .map_err(|e| Error::DefaultError(e.to_string()))?;

        let mut plain = matrix::neg(
            &matrix::add(
                &matrix::matmul(&ma, &rb_i, q)?,
                &matrix::matmul(&ra_i, &mb, q)?,
                q,
            )?,
            q,
        );
        if self.setting().is_coordinator() {
            plain = matrix::add(&plain, &matrix::matmul(&ma, &mb, q)?, q)?;
        }
        let plain = self.encrypt_vec(&plain.iter().cloned().collect::<Vec<_>>())?;
        let plain = EncryptedMatrix::from_vec(r, t, plain)?;
        let contribution = ra.mul_plain_right(&rb_i, scheme)?.add(&plain, scheme)?;

        let table = self.share_ciphertexts(contribution.to_vec())?;
        EncryptedMatrix::from_vec(r, t, self.sum_columns(&table)?)
    }
}
