use crate::{Error, Party, Result};
use num_bigint::BigUint;
use tpsi_traits::{MultiplicativeScheme, PartialDecrypter, ThresholdScheme};

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Encryptions of `factor · x^{-1}` for a batch of encrypted `x`, using
    /// only additive operations.
    ///
    /// A joint random mask ρ is multiplied into x with [`Self::secure_multiply`],
    /// `xρ` is decrypted and inverted in the clear, and the encrypted mask is
    /// scaled by `factor · (xρ)^{-1}`.
    pub fn masked_inverse(
        &mut self,
        cts: &[S::Ciphertext],
        factor: &BigUint,
    ) -> Result<Vec<S::Ciphertext>> {
        if cts.is_empty() {
            return Ok(vec![]);
        }
        let q = self.modulus();
        let masks = (0..cts.len())
            .map(|_| q.random_invertible(self.rng()))
            .collect::<Vec<_>>();
        let table = self.encrypt_and_share(&masks)?;
        let joint_masks = self.sum_columns(&table)?;
        let masked = self.secure_multiply(cts, &joint_masks)?;
        let opened = self.threshold_decrypt(&masked)?;

        let scheme = self.scheme();
        opened
            .iter()
            .zip(&joint_masks)
            .map(|(v, rho)| {
                let w = q.mul(factor, &q.inv(v)?);
                Ok(scheme.scale(rho, &w))
            })
            .collect()
    }
}

impl<'a, S: MultiplicativeScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Encryptions of `factor · x^{-1}` for a batch of encrypted `x`, using
    /// the multiplication of the scheme.
    ///
    /// The parties multiply their invertible masks into m, `x·m` is decrypted
    /// and inverted in the clear, the Coordinator encrypts
    /// `factor · (x·m)^{-1}` and the result is multiplied by m.
    pub fn secure_inverse(
        &mut self,
        cts: &[S::Ciphertext],
        factor: &BigUint,
    ) -> Result<Vec<S::Ciphertext>> {
        if cts.is_empty() {
            return Ok(vec![]);
        }
        let q = self.modulus();
        let masks = (0..cts.len())
            .map(|_| q.random_invertible(self.rng()))
            .collect::<Vec<_>>();
        let table = self.encrypt_and_share(&masks)?;
        let scheme = self.scheme();
        let joint_masks = (0..cts.len())
            .map(|j| {
                table[1..].iter().try_fold(table[0][j].clone(), |acc, row| {
                    scheme.try_multiply(&acc, &row[j]).map_err(Error::scheme)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let masked = cts
            .iter()
            .zip(&joint_masks)
            .map(|(x, m)| scheme.try_multiply(x, m).map_err(Error::scheme))
            .collect::<Result<Vec<_>>>()?;
        let opened = self.threshold_decrypt(&masked)?;

        let scaled_inverses = if self.setting().is_coordinator() {
            let w = opened
                .iter()
                .map(|v| Ok(q.mul(factor, &q.inv(v)?)))
                .collect::<Result<Vec<_>>>()?;
            Some(self.encrypt_vec(&w)?)
        } else {
            None
        };
        let scaled_inverses = self.publish_ciphertexts(0, scaled_inverses)?;
        if scaled_inverses.len() != cts.len() {
            return Err(Error::batch_mismatch(0, cts.len(), scaled_inverses.len()));
        }
        scaled_inverses
            .iter()
            .zip(&joint_masks)
            .map(|(w, m)| {
                let product = scheme.try_multiply(w, m).map_err(Error::scheme)?;
                scheme.refresh(product).map_err(Error::scheme)
            })
            .collect()
    }
}
