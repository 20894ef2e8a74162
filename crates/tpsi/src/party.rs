//! The execution context of one party.
//!
//! A [`Party`] bundles everything a party needs during a run: its setting,
//! its view of the network, its share of the decryption key and its private
//! randomness. The protocol layers are written as methods on it, spread over
//! the modules of this crate.

use crate::network::{Message, Topology};
use crate::{Error, Result, Setting};
use itertools::Itertools;
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tpsi_math::zn::Modulus;
use tpsi_traits::{PartialDecrypter, ThresholdScheme};
use tracing::debug;

/// One party of a run.
///
/// All the collective methods must be called by every party in the same
/// order and with batches of the same length.
pub struct Party<'a, S: ThresholdScheme, K: PartialDecrypter<S>> {
    setting: &'a Setting<S>,
    topology: &'a Topology<S>,
    key: &'a K,
    rng: ChaCha20Rng,
    round: usize,
    one: Option<S::Ciphertext>,
}

impl<'a, S: ThresholdScheme, K: PartialDecrypter<S>> Party<'a, S, K> {
    /// Create a party whose randomness is seeded from the operating system.
    pub fn new(setting: &'a Setting<S>, topology: &'a Topology<S>, key: &'a K) -> Result<Self> {
        Self::with_rng(setting, topology, key, ChaCha20Rng::from_entropy())
    }

    /// Create a party with deterministic randomness.
    pub fn with_seed(
        setting: &'a Setting<S>,
        topology: &'a Topology<S>,
        key: &'a K,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(setting, topology, key, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(
        setting: &'a Setting<S>,
        topology: &'a Topology<S>,
        key: &'a K,
        rng: ChaCha20Rng,
    ) -> Result<Self> {
        if topology.index() != setting.index() {
            return Err(Error::role_mismatch(setting.index(), "holder of this topology"));
        }
        if key.party_index() != setting.index() {
            return Err(Error::role_mismatch(setting.index(), "holder of this key share"));
        }
        Ok(Self {
            setting,
            topology,
            key,
            rng,
            round: 0,
            one: None,
        })
    }

    /// Index of this party.
    pub fn index(&self) -> usize {
        self.setting.index()
    }

    /// The setting of this party.
    pub fn setting(&self) -> &'a Setting<S> {
        self.setting
    }

    /// The cryptosystem.
    pub fn scheme(&self) -> &'a S {
        self.setting.scheme()
    }

    /// The plaintext modulus.
    pub fn modulus(&self) -> &'a Modulus {
        self.setting.modulus()
    }

    /// Number of exchanges performed so far.
    pub fn rounds(&self) -> usize {
        self.round
    }

    pub(crate) fn topology(&self) -> &'a Topology<S> {
        self.topology
    }

    pub(crate) fn key(&self) -> &'a K {
        self.key
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha20Rng {
        &mut self.rng
    }

    pub(crate) fn next_round(&mut self, step: &str) {
        self.round += 1;
        debug!(party = self.index(), round = self.round, "{}", step);
    }

    /// Encrypt values locally with fresh randomness.
    ///
    /// The resulting ciphertexts are known to this party only; they must be
    /// distributed before being combined with other parties' values.
    pub(crate) fn encrypt_vec(&mut self, values: &[BigUint]) -> Result<Vec<S::Ciphertext>> {
        let scheme = self.setting.scheme();
        values
            .iter()
            .map(|v| scheme.try_encrypt(v, &mut self.rng).map_err(Error::scheme))
            .collect()
    }

    /// Exchange one batch of ciphertexts per party. Every party receives the
    /// table of all the batches, indexed by party.
    pub fn share_ciphertexts(
        &mut self,
        own: Vec<S::Ciphertext>,
    ) -> Result<Vec<Vec<S::Ciphertext>>> {
        self.next_round("share ciphertexts");
        let expected = own.len();
        let table = self
            .topology
            .all_gather(Message::Ciphertexts(own))?
            .into_ciphertext_table(0)?;
        self.check_table(&table, expected)?;
        Ok(table)
    }

    /// Exchange one batch of field elements per party.
    pub fn share_plaintexts(&mut self, own: Vec<BigUint>) -> Result<Vec<Vec<BigUint>>> {
        self.next_round("share plaintexts");
        let expected = own.len();
        let table = self
            .topology
            .all_gather(Message::Plaintexts(own))?
            .into_plaintext_table(0)?;
        self.check_table(&table, expected)?;
        Ok(table)
    }

    fn check_table<T>(&self, table: &[Vec<T>], expected: usize) -> Result<()> {
        let parties = self.setting.parameters().parties();
        if table.len() != parties {
            return Err(Error::batch_mismatch(0, parties, table.len()));
        }
        if let Some((peer, row)) = table.iter().find_position(|row| row.len() != expected) {
            return Err(Error::batch_mismatch(peer, expected, row.len()));
        }
        Ok(())
    }

    /// Broadcast ciphertexts from party `origin`.
    pub fn publish_ciphertexts(
        &mut self,
        origin: usize,
        own: Option<Vec<S::Ciphertext>>,
    ) -> Result<Vec<S::Ciphertext>> {
        self.next_round("publish ciphertexts");
        self.topology
            .publish(origin, own.map(Message::Ciphertexts))?
            .into_ciphertexts(origin)
    }

    /// Broadcast field elements from party `origin`.
    pub fn publish_plaintexts(
        &mut self,
        origin: usize,
        own: Option<Vec<BigUint>>,
    ) -> Result<Vec<BigUint>> {
        self.next_round("publish plaintexts");
        self.topology
            .publish(origin, own.map(Message::Plaintexts))?
            .into_plaintexts(origin)
    }

    /// Encrypt `values` and exchange them with the other parties.
    pub fn encrypt_and_share(&mut self, values: &[BigUint]) -> Result<Vec<Vec<S::Ciphertext>>> {
        let own = self.encrypt_vec(values)?;
        self.share_ciphertexts(own)
    }

    /// Sum a table of ciphertexts column by column.
    pub fn sum_columns(&self, table: &[Vec<S::Ciphertext>]) -> Result<Vec<S::Ciphertext>> {
        let (first, rest) = table
            .split_first()
            .ok_or_else(|| Error::DefaultError("Cannot sum an empty table".to_string()))?;
        if let Some(row) = rest.iter().find(|row| row.len() != first.len()) {
            return Err(Error::TooFewValues(row.len(), first.len()));
        }
        let scheme = self.setting.scheme();
        Ok((0..first.len())
            .into_par_iter()
            .map(|j| {
                rest.iter()
                    .fold(first[j].clone(), |acc, row| scheme.add(&acc, &row[j]))
            })
            .collect())
    }

    /// Sum a non-empty slice of ciphertexts.
    pub fn sum(&self, cts: &[S::Ciphertext]) -> Result<S::Ciphertext> {
        let scheme = self.setting.scheme();
        let (first, rest) = cts
            .split_first()
            .ok_or_else(|| Error::DefaultError("Cannot sum no ciphertexts".to_string()))?;
        Ok(rest
            .iter()
            .fold(first.clone(), |acc, ct| scheme.add(&acc, ct)))
    }

    /// Values known to nobody: every party samples `count` values, encrypts
    /// and shares them, and the encrypted sums are returned together with the
    /// values sampled by this party.
    pub fn joint_encrypted_random(
        &mut self,
        count: usize,
    ) -> Result<(Vec<BigUint>, Vec<S::Ciphertext>)> {
        let own = self.modulus().random_vec(count, &mut self.rng);
        let table = self.encrypt_and_share(&own)?;
        let sums = self.sum_columns(&table)?;
        Ok((own, sums))
    }

    /// Public values that no party could choose: every party samples `count`
    /// values and all of them are summed.
    pub fn joint_public_random(&mut self, count: usize) -> Result<Vec<BigUint>> {
        let own = self.modulus().random_vec(count, &mut self.rng);
        let table = self.share_plaintexts(own)?;
        let q = self.modulus();
        Ok((0..count)
            .map(|j| q.sum(table.iter().map(|row| &row[j])))
            .collect())
    }

    /// The encryption of 1 shared by all the parties.
    ///
    /// It is created by the Coordinator the first time it is needed and is
    /// identical at every party afterwards.
    pub fn encrypted_one(&mut self) -> Result<S::Ciphertext> {
        if let Some(one) = &self.one {
            return Ok(one.clone());
        }
        let own = if self.setting.is_coordinator() {
            Some(self.encrypt_vec(&[BigUint::from(1u32)])?)
        } else {
            None
        };
        let one = self
            .publish_ciphertexts(0, own)?
            .pop()
            .ok_or_else(|| Error::batch_mismatch(0, 1, 0))?;
        self.one = Some(one.clone());
        Ok(one)
    }

    /// Encryptions of public constants, identical at every party.
    pub fn constants(&mut self, values: &[BigUint]) -> Result<Vec<S::Ciphertext>> {
        let one = self.encrypted_one()?;
        let scheme = self.setting.scheme();
        Ok(values.iter().map(|v| scheme.scale(&one, v)).collect())
    }

    /// Encryption of a public constant, identical at every party.
    pub fn constant(&mut self, value: &BigUint) -> Result<S::Ciphertext> {
        let one = self.encrypted_one()?;
        Ok(self.setting.scheme().scale(&one, value))
    }
}
