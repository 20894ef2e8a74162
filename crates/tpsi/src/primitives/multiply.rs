use crate::{Error, Party, Result};
use tpsi_traits::{PartialDecrypter, ThresholdScheme};

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Secure multiplication of pairs of encrypted values, without any
    /// ciphertext-by-ciphertext operation.
    ///
    /// The left operands are additively shared; each party scales the right
    /// operands by its shares, and the scaled ciphertexts of all the parties
    /// are summed.
    pub fn secure_multiply(
        &mut self,
        lhs: &[S::Ciphertext],
        rhs: &[S::Ciphertext],
    ) -> Result<Vec<S::Ciphertext>> {
        if lhs.len() != rhs.len() {
            return Err(Error::DefaultError(format!(
                "Cannot multiply {} values by {} values",
                lhs.len(),
                rhs.len()
            )));
        }
        if lhs.is_empty() {
            return Ok(vec![]);
        }
        let shares = self.additive_share(lhs)?;
        let scheme = self.scheme();
        let products = rhs
            .iter()
            .zip(&shares)
            .map(|(b, a_i)| scheme.scale(b, a_i))
            .collect();
        let table = self.share_ciphertexts(products)?;
        self.sum_columns(&table)
    }

    /// Secure multiplication of a single pair.
    pub fn secure_multiply_one(
        &mut self,
        lhs: &S::Ciphertext,
        rhs: &S::Ciphertext,
    ) -> Result<S::Ciphertext> {
        self.secure_multiply(std::slice::from_ref(lhs), std::slice::from_ref(rhs))?
            .pop()
            .ok_or_else(|| Error::batch_mismatch(0, 1, 0))
    }
}
