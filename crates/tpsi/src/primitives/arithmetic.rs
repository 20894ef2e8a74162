use crate::{Error, Party, Result};
use num_bigint::BigUint;
use tpsi_traits::{MultiplicativeScheme, PartialDecrypter, ThresholdScheme};

/// How encrypted values are multiplied and inverted.
///
/// Algorithms that need products of encrypted values are generic over this
/// trait, so that they run both with additive schemes ([`Interactive`]) and
/// with schemes that multiply ciphertexts natively ([`Native`]).
pub trait Arithmetic<S: ThresholdScheme> {
    /// Pairwise products of two batches of encrypted values.
    fn multiply<K: PartialDecrypter<S>>(
        &self,
        party: &mut Party<'_, S, K>,
        lhs: &[S::Ciphertext],
        rhs: &[S::Ciphertext],
    ) -> Result<Vec<S::Ciphertext>>;

    /// Encryptions of `factor · x^{-1}` for a batch of encrypted `x`.
    fn invert<K: PartialDecrypter<S>>(
        &self,
        party: &mut Party<'_, S, K>,
        cts: &[S::Ciphertext],
        factor: &BigUint,
    ) -> Result<Vec<S::Ciphertext>>;
}

/// Products with [`Party::secure_multiply`] and inverses with
/// [`Party::masked_inverse`]; works with any threshold scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interactive;

/// Products with the multiplication of the scheme and inverses with
/// [`Party::secure_inverse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

impl<S: ThresholdScheme> Arithmetic<S> for Interactive {
    fn multiply<K: PartialDecrypter<S>>(
        &self,
        party: &mut Party<'_, S, K>,
        lhs: &[S::Ciphertext],
        rhs: &[S::Ciphertext],
    ) -> Result<Vec<S::Ciphertext>> {
        party.secure_multiply(lhs, rhs)
    }

    fn invert<K: PartialDecrypter<S>>(
        &self,
        party: &mut Party<'_, S, K>,
        cts: &[S::Ciphertext],
        factor: &BigUint,
    ) -> Result<Vec<S::Ciphertext>> {
        party.masked_inverse(cts, factor)
    }
}

impl<S: MultiplicativeScheme> Arithmetic<S> for Native {
    fn multiply<K: PartialDecrypter<S>>(
        &self,
        party: &mut Party<'_, S, K>,
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
        let scheme = party.scheme();
        lhs.iter()
            .zip(rhs)
            .map(|(a, b)| {
                let product = scheme.try_multiply(a, b).map_err(Error::scheme)?;
                scheme.refresh(product).map_err(Error::scheme)
            })
            .collect()
    }

    fn invert<K: PartialDecrypter<S>>(
        &self,
        party: &mut Party<'_, S, K>,
        cts: &[S::Ciphertext],
        factor: &BigUint,
    ) -> Result<Vec<S::Ciphertext>> {
        party.secure_inverse(cts, factor)
    }
}
