use crate::linalg::{EncryptedMatrix, EncryptedPolynomial};
use crate::primitives::Interactive;
use crate::{Error, Party, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};
use tracing::{debug, info};

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Test whether a square encrypted matrix is singular.
    ///
    /// The constant coefficient of the characteristic polynomial is
    /// `±det(M)`. It is computed under encryption and zero-tested, so the
    /// parties learn whether M is singular and nothing about its rank.
    pub fn is_singular(&mut self, m: &EncryptedMatrix<S::Ciphertext>) -> Result<bool> {
        let constant = self
            .characteristic_polynomial(m)?
            .coefficients()
            .pop()
            .ok_or_else(|| Error::batch_mismatch(0, 1, 0))?;
        self.zero_test_one(&constant)
    }

    /// The characteristic polynomial `det(λ·I - M)` of a square encrypted
    /// matrix, from the leading coefficient down: coefficient `i` of the
    /// result is the coefficient of `λ^{n-i}`.
    ///
    /// Uses Berkowitz's division-free recurrence. The leading block of size
    /// k + 1 is split as `[[A, c], [r, a]]`, and its polynomial is the product
    /// of the polynomial of A with `1 - a·y - Σ_j (r·A^j·c)·y^{j+2}`,
    /// truncated to k + 2 coefficients. The bilinear forms `r·A^j·c` are
    /// computed with masked matrix products; no value is decrypted.
    pub fn characteristic_polynomial(
        &mut self,
        m: &EncryptedMatrix<S::Ciphertext>,
    ) -> Result<EncryptedPolynomial<S::Ciphertext>> {
        let (rows, cols) = m.dim();
        if rows != cols || rows == 0 {
            return Err(tpsi_math::Error::DimensionMismatch {
                expected: (rows, rows),
                found: (rows, cols),
            }
            .into());
        }
        info!(
            party = self.index(),
            size = rows,
            "Computing a characteristic polynomial"
        );
        let scheme = self.scheme();
        let one = EncryptedPolynomial::from_coefficients(vec![self.encrypted_one()?])?;
        let zero = self.constant(&BigUint::zero())?;
        let diagonal = |k: usize| {
            m.get(k, k)
                .cloned()
                .ok_or_else(|| Error::batch_mismatch(0, rows * rows, k))
        };

        let first = EncryptedPolynomial::from_coefficients(vec![zero.clone(), diagonal(0)?])?;
        let mut p = one.sub(&first, scheme);
        for k in 1..rows {
            debug!(party = self.index(), size = k + 1, "Extending the characteristic polynomial");
            let a = m.block(0..k, 0..k)?;
            let c = m.block(0..k, k..k + 1)?;
            let r = m.block(k..k + 1, 0..k)?;
            let mut factor = vec![zero.clone(), diagonal(k)?];
            factor.extend(self.bilinear_forms(&r, &a, &c, k)?);
            let factor = one.sub(&EncryptedPolynomial::from_coefficients(factor)?, scheme);
            p = self.poly_mul(&factor, &p, &Interactive)?.truncated(k + 2)?;
        }
        Ok(p)
    }

    /// The encrypted values `r·A^j·c` for `j < count`.
    fn bilinear_forms(
        &mut self,
        r: &EncryptedMatrix<S::Ciphertext>,
        a: &EncryptedMatrix<S::Ciphertext>,
        c: &EncryptedMatrix<S::Ciphertext>,
        count: usize,
    ) -> Result<Vec<S::Ciphertext>> {
        let mut column = c.clone();
        let mut krylov = vec![column.clone()];
        for _ in 1..count {
            column = self.masked_matmul(a, &column)?;
            krylov.push(column.clone());
        }
        let forms = self.masked_matmul(r, &EncryptedMatrix::hstack(&krylov)?)?;
        Ok(forms.row(0))
    }

    /// The cardinality test: returns whether at most T elements lie outside
    /// the intersection of the sets of all the parties.
    pub fn cardinality_test(&mut self, items: &[BigUint]) -> Result<bool> {
        let hankel = self.encrypted_hankel(items)?;
        let passed = self.is_singular(&hankel)?;
        info!(party = self.index(), passed, "Cardinality test done");
        Ok(passed)
    }
}
