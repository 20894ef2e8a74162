//! Test helpers: a transparent threshold scheme and a runner executing one
//! closure per party over an in-process star.
//!
//! The transparent scheme stores the plaintext in the clear, so tests of the
//! protocol layers can check intermediate values directly. Decryption shares
//! are weighted copies of the ciphertext with weights summing to one, so that
//! combining still requires the share of every party. Every combined
//! plaintext is recorded, so tests can check what the parties get to see.

use std::sync::{Arc, Mutex};

use crate::network::star;
use crate::{Party, ProtocolParameters, ProtocolParametersBuilder, Setting};
use num_bigint::BigUint;
use rand::{thread_rng, CryptoRng, RngCore};
use tpsi_math::zn::Modulus;
use tpsi_traits::{MultiplicativeScheme, PartialDecrypter, ThresholdScheme};

#[derive(Debug, thiserror::Error)]
pub enum TransparentError {
    #[error("Expected {0} decryption shares, found {1}")]
    WrongShareCount(usize, usize),
    #[error("Duplicate decryption share from party {0}")]
    DuplicateShare(usize),
}

#[derive(Debug)]
pub struct TransparentScheme {
    modulus: Modulus,
    parties: usize,
    openings: Mutex<Vec<BigUint>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransparentCiphertext(pub BigUint);

impl TransparentScheme {
    /// A scheme for `parties` parties over Z_p with p = 2^127 - 1.
    pub fn new(parties: usize) -> Self {
        let p = (BigUint::from(1u32) << 127) - 1u32;
        Self {
            modulus: Modulus::new(p).unwrap(),
            parties,
            openings: Mutex::new(vec![]),
        }
    }

    /// Every plaintext combined so far, in order.
    pub fn openings(&self) -> Vec<BigUint> {
        self.openings.lock().unwrap().clone()
    }
}

impl ThresholdScheme for TransparentScheme {
    type Ciphertext = TransparentCiphertext;
    type DecryptionShare = (usize, BigUint);
    type Error = TransparentError;

    fn plaintext_modulus(&self) -> &BigUint {
        self.modulus.modulus()
    }

    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &BigUint,
        _rng: &mut R,
    ) -> Result<TransparentCiphertext, TransparentError> {
        Ok(TransparentCiphertext(self.modulus.reduce(plaintext)))
    }

    fn add(
        &self,
        lhs: &TransparentCiphertext,
        rhs: &TransparentCiphertext,
    ) -> TransparentCiphertext {
        TransparentCiphertext(self.modulus.add(&lhs.0, &rhs.0))
    }

    fn scale(&self, ct: &TransparentCiphertext, scalar: &BigUint) -> TransparentCiphertext {
        TransparentCiphertext(self.modulus.mul(&ct.0, scalar))
    }

    fn try_combine(
        &self,
        _ct: &TransparentCiphertext,
        shares: &[(usize, BigUint)],
    ) -> Result<BigUint, TransparentError> {
        if shares.len() != self.parties {
            return Err(TransparentError::WrongShareCount(self.parties, shares.len()));
        }
        let mut seen = vec![false; self.parties];
        for (i, _) in shares {
            if *i >= self.parties || seen[*i] {
                return Err(TransparentError::DuplicateShare(*i));
            }
            seen[*i] = true;
        }
        let plaintext = self.modulus.sum(shares.iter().map(|(_, v)| v));
        self.openings.lock().unwrap().push(plaintext.clone());
        Ok(plaintext)
    }
}

impl MultiplicativeScheme for TransparentScheme {
    fn try_multiply(
        &self,
        lhs: &TransparentCiphertext,
        rhs: &TransparentCiphertext,
    ) -> Result<TransparentCiphertext, TransparentError> {
        Ok(TransparentCiphertext(self.modulus.mul(&lhs.0, &rhs.0)))
    }
}

#[derive(Debug)]
pub struct TransparentKey {
    index: usize,
    weight: BigUint,
    modulus: Modulus,
}

impl TransparentKey {
    /// Keys for every party, whose weights sum to one.
    pub fn generate(scheme: &TransparentScheme) -> Vec<Self> {
        let mut rng = thread_rng();
        let q = &scheme.modulus;
        let mut weights = q.random_vec(scheme.parties - 1, &mut rng);
        let rest = q.sub(&BigUint::from(1u32), &q.sum(&weights));
        weights.insert(0, rest);
        weights
            .into_iter()
            .enumerate()
            .map(|(index, weight)| Self {
                index,
                weight,
                modulus: q.clone(),
            })
            .collect()
    }
}

impl PartialDecrypter<TransparentScheme> for TransparentKey {
    fn party_index(&self) -> usize {
        self.index
    }

    fn try_partial_decrypt(
        &self,
        ct: &TransparentCiphertext,
    ) -> Result<(usize, BigUint), TransparentError> {
        Ok((self.index, self.modulus.mul(&ct.0, &self.weight)))
    }
}

pub fn parameters(parties: usize, threshold: usize, set_size: usize) -> ProtocolParameters {
    ProtocolParametersBuilder::new()
        .set_parties(parties)
        .set_threshold(threshold)
        .set_set_size(set_size)
        .build()
        .unwrap()
}

pub fn transparent_setting(
    parties: usize,
    threshold: usize,
    set_size: usize,
    index: usize,
) -> Setting<TransparentScheme> {
    Setting::new(
        parameters(parties, threshold, set_size),
        index,
        Arc::new(TransparentScheme::new(parties)),
    )
    .unwrap()
}

pub fn ct(v: u64) -> TransparentCiphertext {
    TransparentCiphertext(BigUint::from(v))
}

pub fn big(v: &[u64]) -> Vec<BigUint> {
    v.iter().map(|x| BigUint::from(*x)).collect()
}

/// Run `f` once per party, each on its own thread, and return the results
/// indexed by party.
pub fn run_transparent<T, F>(scheme: TransparentScheme, params: ProtocolParameters, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&mut Party<'_, TransparentScheme, TransparentKey>) -> T + Sync,
{
    let n = params.parties();
    assert_eq!(n, scheme.parties);
    let keys = TransparentKey::generate(&scheme);
    let scheme = Arc::new(scheme);
    let topologies = star::<TransparentScheme>(n).unwrap();
    std::thread::scope(|s| {
        let handles = topologies
            .into_iter()
            .zip(keys.iter())
            .map(|(topology, key)| {
                let setting = Setting::new(params, topology.index(), scheme.clone()).unwrap();
                let f = &f;
                s.spawn(move || {
                    let mut party = Party::new(&setting, &topology, key).unwrap();
                    f(&mut party)
                })
            })
            .collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Run `f` for three parties over the transparent scheme.
pub fn run_three<T, F>(f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&mut Party<'_, TransparentScheme, TransparentKey>) -> T + Sync,
{
    run_transparent(TransparentScheme::new(3), parameters(3, 2, 3), f)
}
