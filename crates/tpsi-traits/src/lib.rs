#![crate_name = "tpsi_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits describing the cryptosystems consumed by the tpsi library.
//!
//! The protocol crate never looks inside a ciphertext. It only needs the
//! operations listed here: encryption of field elements, homomorphic addition,
//! scaling by a public scalar, optionally a ciphertext-by-ciphertext product,
//! and a threshold decryption made of per-party partial decryptions that are
//! combined once every party has contributed.

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use std::fmt::Debug;

/// An additively homomorphic encryption scheme whose decryption key is split
/// among several parties.
///
/// The plaintext space is the ring of integers modulo
/// [`ThresholdScheme::plaintext_modulus`]. Implementations must be usable from
/// several threads at once, since every party of a local run holds a handle to
/// the same public key.
pub trait ThresholdScheme: Send + Sync {
    /// The ciphertext type. Ciphertexts are immutable values that can be
    /// copied and sent to other parties.
    type Ciphertext: Clone + Debug + PartialEq + Send + Sync;

    /// One party's contribution towards the decryption of one ciphertext.
    type DecryptionShare: Clone + Debug + Send + Sync;

    /// The error type returned by fallible operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The plaintext modulus N.
    fn plaintext_modulus(&self) -> &BigUint;

    /// Encrypt a plaintext in `[0, N)` with fresh randomness.
    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &BigUint,
        rng: &mut R,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Homomorphic addition of two ciphertexts.
    fn add(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext) -> Self::Ciphertext;

    /// Homomorphic multiplication by a public scalar.
    fn scale(&self, ct: &Self::Ciphertext, scalar: &BigUint) -> Self::Ciphertext;

    /// Homomorphic negation.
    fn negate(&self, ct: &Self::Ciphertext) -> Self::Ciphertext {
        let minus_one = self.plaintext_modulus() - 1u32;
        self.scale(ct, &minus_one)
    }

    /// Homomorphic subtraction.
    fn sub(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext) -> Self::Ciphertext {
        self.add(lhs, &self.negate(rhs))
    }

    /// Combine the decryption shares of every party for the ciphertext `ct`.
    ///
    /// The result is reduced modulo N.
    fn try_combine(
        &self,
        ct: &Self::Ciphertext,
        shares: &[Self::DecryptionShare],
    ) -> Result<BigUint, Self::Error>;
}

/// A threshold scheme that can also multiply two ciphertexts.
pub trait MultiplicativeScheme: ThresholdScheme {
    /// Homomorphic multiplication of two ciphertexts.
    fn try_multiply(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Re-randomize a ciphertext whose noise budget is running low.
    ///
    /// Schemes without a noise budget keep the default implementation.
    fn refresh(&self, ct: Self::Ciphertext) -> Result<Self::Ciphertext, Self::Error> {
        Ok(ct)
    }
}

/// A party's share of the decryption key.
pub trait PartialDecrypter<S: ThresholdScheme>: Send + Sync {
    /// Index of the party holding this share.
    fn party_index(&self) -> usize;

    /// Compute this party's partial decryption of `ct`.
    fn try_partial_decrypt(&self, ct: &S::Ciphertext) -> Result<S::DecryptionShare, S::Error>;
}
