//! Threshold Paillier cryptosystem with an n-of-n shared decryption exponent.
//!
//! Keys are produced by a trusted dealer: the modulus is `N = p·q`, the
//! generator is `g = N + 1` and the decryption exponent
//! `d = φ·(φ^{-1} mod N)` satisfies `d ≡ 0 mod φ` and `d ≡ 1 mod N`. It is
//! split additively modulo `N·φ` among the parties, so that the product of the
//! partial decryptions `c^{d_i}` is `c^d = 1 + m·N mod N²`.

use crate::ProtocolParameters;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::fmt;
use tpsi_math::zn::Modulus;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};
use tpsi_util::{generate_prime, sample_nonzero_below};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors of the threshold Paillier backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaillierError {
    /// Indicates that the plaintext is not below the modulus.
    #[error("Plaintext out of range: the plaintext must be below the modulus")]
    PlaintextOutOfRange,

    /// Indicates that the shares of some parties are missing.
    #[error("Missing decryption shares: {0} provided, {1} required")]
    MissingShares(usize, usize),

    /// Indicates that a party contributed several shares.
    #[error("Duplicate decryption share from party {0}")]
    DuplicateShare(usize),

    /// Indicates a share from an unknown party.
    #[error("Decryption share from unknown party {0}")]
    UnknownParty(usize),

    /// Indicates invalid key generation parameters.
    #[error("Invalid key parameters: {0}")]
    InvalidParameters(String),

    /// Indicates an arithmetic error.
    #[error("{0}")]
    Math(#[from] tpsi_math::Error),
}

/// A Paillier ciphertext, an element of `Z*_{N²}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaillierCiphertext(BigUint);

impl PaillierCiphertext {
    /// The ciphertext as an integer modulo N².
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

/// A partial decryption `c^{d_i} mod N²`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaillierDecryptionShare {
    index: usize,
    value: BigUint,
}

/// The public key of a threshold Paillier cryptosystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdPaillier {
    n: BigUint,
    n_squared: Modulus,
    parties: usize,
}

/// The share of the decryption exponent held by one party.
///
/// The exponent is stored as big-endian bytes, which are erased on drop.
/// Partial decryption converts it to a temporary [`BigUint`] whose buffer is
/// released without being overwritten.
#[derive(Clone)]
pub struct PaillierKeyShare {
    index: usize,
    exponent: Vec<u8>,
    n_squared: Modulus,
}

impl Zeroize for PaillierKeyShare {
    fn zeroize(&mut self) {
        self.exponent.zeroize();
    }
}

impl Drop for PaillierKeyShare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PaillierKeyShare {}

impl fmt::Debug for PaillierKeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaillierKeyShare")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl ThresholdPaillier {
    /// Generate a public key and one key share per party, with primes of
    /// `prime_bits` bits.
    pub fn generate<R: RngCore + CryptoRng>(
        parties: usize,
        prime_bits: usize,
        rng: &mut R,
    ) -> Result<(Self, Vec<PaillierKeyShare>), PaillierError> {
        if parties < 2 {
            return Err(PaillierError::InvalidParameters(format!(
                "{} parties, at least 2 required",
                parties
            )));
        }
        if prime_bits < 16 {
            return Err(PaillierError::InvalidParameters(format!(
                "{}-bit primes are too small",
                prime_bits
            )));
        }
        let p = generate_prime(prime_bits, rng);
        let q = loop {
            let q = generate_prime(prime_bits, rng);
            if q != p {
                break q;
            }
        };
        let n = &p * &q;
        let phi = (&p - 1u32) * (&q - 1u32);
        let d = &phi * Modulus::new(n.clone())?.inv(&phi)?;
        let order = &n * &phi;
        debug!(bits = n.bits(), parties, "Generated a Paillier modulus");

        let mut shares = (0..parties - 1)
            .map(|_| rng.gen_biguint_below(&order))
            .collect::<Vec<_>>();
        let sum = shares.iter().fold(BigUint::zero(), |acc, s| (acc + s) % &order);
        shares.push((&d + &order - sum) % &order);

        let n_squared = Modulus::new(&n * &n)?;
        let key_shares = shares
            .into_iter()
            .enumerate()
            .map(|(index, share)| PaillierKeyShare {
                index,
                exponent: share.to_bytes_be(),
                n_squared: n_squared.clone(),
            })
            .collect();
        Ok((
            Self {
                n,
                n_squared,
                parties,
            },
            key_shares,
        ))
    }

    /// A public key matching `parameters`.
    pub fn generate_for<R: RngCore + CryptoRng>(
        parameters: &ProtocolParameters,
        prime_bits: usize,
        rng: &mut R,
    ) -> Result<(Self, Vec<PaillierKeyShare>), PaillierError> {
        Self::generate(parameters.parties(), prime_bits, rng)
    }

    /// Number of parties sharing the decryption key.
    pub fn parties(&self) -> usize {
        self.parties
    }
}

impl ThresholdScheme for ThresholdPaillier {
    type Ciphertext = PaillierCiphertext;
    type DecryptionShare = PaillierDecryptionShare;
    type Error = PaillierError;

    fn plaintext_modulus(&self) -> &BigUint {
        &self.n
    }

    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &BigUint,
        rng: &mut R,
    ) -> Result<PaillierCiphertext, PaillierError> {
        if plaintext >= &self.n {
            return Err(PaillierError::PlaintextOutOfRange);
        }
        let r = sample_nonzero_below(&self.n, rng);
        let gm = self.n_squared.reduce(&(BigUint::one() + plaintext * &self.n));
        let rn = self.n_squared.pow(&r, &self.n);
        Ok(PaillierCiphertext(self.n_squared.mul(&gm, &rn)))
    }

    fn add(&self, lhs: &PaillierCiphertext, rhs: &PaillierCiphertext) -> PaillierCiphertext {
        PaillierCiphertext(self.n_squared.mul(&lhs.0, &rhs.0))
    }

    fn scale(&self, ct: &PaillierCiphertext, scalar: &BigUint) -> PaillierCiphertext {
        PaillierCiphertext(self.n_squared.pow(&ct.0, scalar))
    }

    fn try_combine(
        &self,
        _ct: &PaillierCiphertext,
        shares: &[PaillierDecryptionShare],
    ) -> Result<BigUint, PaillierError> {
        if shares.len() < self.parties {
            return Err(PaillierError::MissingShares(shares.len(), self.parties));
        }
        let mut seen = vec![false; self.parties];
        for share in shares {
            match seen.get_mut(share.index) {
                None => return Err(PaillierError::UnknownParty(share.index)),
                Some(true) => return Err(PaillierError::DuplicateShare(share.index)),
                Some(s) => *s = true,
            }
        }
        let product = shares
            .iter()
            .fold(BigUint::one(), |acc, s| self.n_squared.mul(&acc, &s.value));
        // product = 1 + m·N mod N²
        Ok(((product + self.n_squared.modulus() - 1u32) % self.n_squared.modulus()) / &self.n)
    }
}

impl PartialDecrypter<ThresholdPaillier> for PaillierKeyShare {
    fn party_index(&self) -> usize {
        self.index
    }

    fn try_partial_decrypt(
        &self,
        ct: &PaillierCiphertext,
    ) -> Result<PaillierDecryptionShare, PaillierError> {
        let value = self
            .n_squared
            .pow(&ct.0, &BigUint::from_bytes_be(&self.exponent));
        Ok(PaillierDecryptionShare {
            index: self.index,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PaillierError, ThresholdPaillier};
    use num_bigint::BigUint;
    use rand::{rngs::StdRng, SeedableRng};
    use tpsi_traits::{PartialDecrypter, ThresholdScheme};
    use zeroize::Zeroize;

    fn decrypt(
        scheme: &ThresholdPaillier,
        keys: &[super::PaillierKeyShare],
        ct: &super::PaillierCiphertext,
    ) -> Result<BigUint, PaillierError> {
        let shares = keys
            .iter()
            .map(|k| k.try_partial_decrypt(ct))
            .collect::<Result<Vec<_>, _>>()?;
        scheme.try_combine(ct, &shares)
    }

    #[test]
    fn homomorphic_operations() -> Result<(), PaillierError> {
        let mut rng = StdRng::seed_from_u64(0);
        let (scheme, keys) = ThresholdPaillier::generate(3, 128, &mut rng)?;
        assert_eq!(scheme.parties(), 3);
        assert_eq!(keys.len(), 3);
        let n = scheme.plaintext_modulus().clone();

        let a = scheme.try_encrypt(&BigUint::from(1234u32), &mut rng)?;
        let b = scheme.try_encrypt(&BigUint::from(766u32), &mut rng)?;
        assert_ne!(a, scheme.try_encrypt(&BigUint::from(1234u32), &mut rng)?);
        assert_eq!(decrypt(&scheme, &keys, &a)?, BigUint::from(1234u32));
        assert_eq!(decrypt(&scheme, &keys, &scheme.add(&a, &b))?, BigUint::from(2000u32));
        assert_eq!(
            decrypt(&scheme, &keys, &scheme.scale(&a, &BigUint::from(3u32)))?,
            BigUint::from(3702u32)
        );
        assert_eq!(decrypt(&scheme, &keys, &scheme.sub(&b, &a))?, &n - 468u32);
        assert_eq!(decrypt(&scheme, &keys, &scheme.negate(&a))?, &n - 1234u32);

        let top = scheme.try_encrypt(&(&n - 1u32), &mut rng)?;
        assert_eq!(decrypt(&scheme, &keys, &top)?, &n - 1u32);
        Ok(())
    }

    #[test]
    fn every_share_is_required() -> Result<(), PaillierError> {
        let mut rng = StdRng::seed_from_u64(1);
        let (scheme, keys) = ThresholdPaillier::generate(3, 64, &mut rng)?;
        let ct = scheme.try_encrypt(&BigUint::from(42u32), &mut rng)?;
        let shares = keys
            .iter()
            .map(|k| k.try_partial_decrypt(&ct))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(
            scheme.try_combine(&ct, &shares[..2]),
            Err(PaillierError::MissingShares(2, 3))
        );
        let duplicated = [shares[0].clone(), shares[1].clone(), shares[1].clone()];
        assert_eq!(
            scheme.try_combine(&ct, &duplicated),
            Err(PaillierError::DuplicateShare(1))
        );
        let mut reordered = shares.clone();
        reordered.reverse();
        assert_eq!(scheme.try_combine(&ct, &reordered)?, BigUint::from(42u32));
        Ok(())
    }

    #[test]
    fn invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            ThresholdPaillier::generate(1, 64, &mut rng),
            Err(PaillierError::InvalidParameters(_))
        ));
        let (scheme, _) = ThresholdPaillier::generate(2, 64, &mut rng).unwrap();
        let n = scheme.plaintext_modulus().clone();
        assert_eq!(
            scheme.try_encrypt(&n, &mut rng),
            Err(PaillierError::PlaintextOutOfRange)
        );
    }

    #[test]
    fn key_share_zeroize() {
        let mut rng = StdRng::seed_from_u64(3);
        let (_, mut keys) = ThresholdPaillier::generate(2, 64, &mut rng).unwrap();
        assert_eq!(keys[0].party_index(), 0);
        assert!(!keys[0].exponent.is_empty());
        keys[0].zeroize();
        assert!(keys[0].exponent.is_empty());
        assert!(!format!("{:?}", keys[1]).contains("exponent"));
    }
}
