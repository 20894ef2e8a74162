use crate::{Party, Result};
use num_bigint::BigUint;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Additive secret sharing of a batch of encrypted values.
    ///
    /// Returns this party's shares: summed over all the parties, the shares
    /// of `cts[j]` give its plaintext. Each party masks the values with
    /// private random `d_i`; the masked values `a + Σ d_i` are decrypted, the
    /// Coordinator keeps `a + Σ d_i - d_0` and every other party keeps `-d_i`.
    pub fn additive_share(&mut self, cts: &[S::Ciphertext]) -> Result<Vec<BigUint>> {
        let q = self.modulus();
        let masks = q.random_vec(cts.len(), self.rng());
        let table = self.encrypt_and_share(&masks)?;
        let mask_sums = self.sum_columns(&table)?;

        let scheme = self.scheme();
        let masked = cts
            .iter()
            .zip(&mask_sums)
            .map(|(a, d)| scheme.add(a, d))
            .collect::<Vec<_>>();
        let opened = self.threshold_decrypt(&masked)?;

        if self.setting().is_coordinator() {
            Ok(opened.iter().zip(&masks).map(|(e, d)| q.sub(e, d)).collect())
        } else {
            Ok(masks.iter().map(|d| q.neg(d)).collect())
        }
    }
}
