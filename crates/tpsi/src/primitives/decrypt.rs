use crate::network::Message;
use crate::{Error, Party, Result};
use num_bigint::BigUint;
use rayon::prelude::*;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Threshold decryption of a batch of ciphertexts.
    ///
    /// Every party computes its decryption shares and sends them to the
    /// Coordinator, which combines the shares of all the parties and
    /// broadcasts the plaintexts. The ciphertexts must be identical at every
    /// party.
    pub fn threshold_decrypt(&mut self, cts: &[S::Ciphertext]) -> Result<Vec<BigUint>> {
        if cts.is_empty() {
            return Ok(vec![]);
        }
        self.next_round("threshold decryption");
        let key = self.key();
        let shares = cts
            .par_iter()
            .map(|ct| key.try_partial_decrypt(ct))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::scheme)?;

        let plaintexts = match self.topology().gather(Message::DecryptionShares(shares))? {
            Some(messages) => {
                let mut by_party = Vec::with_capacity(messages.len());
                for (peer, message) in messages.into_iter().enumerate() {
                    let shares = message.into_decryption_shares(peer)?;
                    if shares.len() != cts.len() {
                        return Err(Error::batch_mismatch(peer, cts.len(), shares.len()));
                    }
                    by_party.push(shares);
                }
                let scheme = self.scheme();
                let plaintexts = cts
                    .par_iter()
                    .enumerate()
                    .map(|(j, ct)| {
                        let shares = by_party.iter().map(|s| s[j].clone()).collect::<Vec<_>>();
                        scheme.try_combine(ct, &shares)
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(Error::scheme)?;
                Some(Message::Plaintexts(plaintexts))
            }
            None => None,
        };
        let q = self.modulus();
        Ok(self
            .topology()
            .scatter(plaintexts)?
            .into_plaintexts(0)?
            .iter()
            .map(|m| q.reduce(m))
            .collect())
    }
}
