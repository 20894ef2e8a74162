use std::sync::Arc;

use num_bigint::BigUint;
use rand::{rngs::StdRng, CryptoRng, RngCore, SeedableRng};
use tpsi::network::{star, Topology};
use tpsi::paillier::{PaillierKeyShare, ThresholdPaillier};
use tpsi::{
    run_coordinator, run_coordinator_fhe, run_participant, run_participant_fhe, Outcome,
    ProtocolParameters, ProtocolParametersBuilder, Setting,
};
use tpsi_math::zn::Modulus;
use tpsi_traits::{MultiplicativeScheme, PartialDecrypter, ThresholdScheme};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn big(v: &[u64]) -> Vec<BigUint> {
    v.iter().map(|x| BigUint::from(*x)).collect()
}

fn parameters(parties: usize, threshold: usize, set_size: usize) -> ProtocolParameters {
    ProtocolParametersBuilder::new()
        .set_parties(parties)
        .set_threshold(threshold)
        .set_set_size(set_size)
        .build()
        .unwrap()
}

/// Sets of three parties sharing {2, 4, 6, 8}, with seven elements outside
/// the intersection and three per party.
fn sets() -> Vec<Vec<BigUint>> {
    vec![
        big(&[2, 4, 6, 8, 1, 3, 5]),
        big(&[2, 4, 6, 8, 1, 3, 7]),
        big(&[2, 4, 6, 8, 9, 10, 11]),
    ]
}

fn expected_intersection() -> Vec<Outcome> {
    [big(&[1, 3, 5]), big(&[1, 3, 7]), big(&[9, 10, 11])]
        .into_iter()
        .map(|unique| Outcome::Intersection {
            shared: big(&[2, 4, 6, 8]),
            unique,
        })
        .collect()
}

/// Run one party per thread over an in-process star network.
fn run<S, K, F>(
    scheme: S,
    keys: &[K],
    params: ProtocolParameters,
    sets: &[Vec<BigUint>],
    f: F,
) -> Vec<Outcome>
where
    S: ThresholdScheme,
    K: PartialDecrypter<S>,
    F: Fn(usize, &[BigUint], &K, &Setting<S>, &Topology<S>) -> tpsi::Result<Outcome> + Sync,
{
    let scheme = Arc::new(scheme);
    let topologies = star::<S>(params.parties()).unwrap();
    std::thread::scope(|s| {
        let handles = topologies
            .into_iter()
            .zip(keys)
            .zip(sets)
            .enumerate()
            .map(|(i, ((topology, key), items))| {
                let setting = Setting::new(params, i, scheme.clone()).unwrap();
                let f = &f;
                s.spawn(move || f(i, items.as_slice(), key, &setting, &topology))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    })
}

fn paillier_role(
    i: usize,
    items: &[BigUint],
    key: &PaillierKeyShare,
    setting: &Setting<ThresholdPaillier>,
    topology: &Topology<ThresholdPaillier>,
) -> tpsi::Result<Outcome> {
    if i == 0 {
        run_coordinator(items, key, setting, topology)
    } else {
        run_participant(items, key, setting, topology)
    }
}

#[test]
fn paillier_intersection() {
    init_tracing();
    let params = parameters(3, 7, 7);
    let mut rng = StdRng::seed_from_u64(7);
    let (scheme, keys) = ThresholdPaillier::generate_for(&params, 128, &mut rng).unwrap();
    let outcomes = run(scheme, &keys, params, &sets(), paillier_role);
    assert_eq!(outcomes, expected_intersection());
}

#[test]
fn paillier_cardinality_test_failure() {
    init_tracing();
    let params = parameters(3, 6, 7);
    let mut rng = StdRng::seed_from_u64(6);
    let (scheme, keys) = ThresholdPaillier::generate_for(&params, 128, &mut rng).unwrap();
    let outcomes = run(scheme, &keys, params, &sets(), paillier_role);
    assert!(outcomes
        .iter()
        .all(|o| *o == Outcome::CardinalityTestFailed));
}

/// A multiplicative scheme over Z_p that keeps plaintexts in the clear,
/// with decryption shares that are weighted copies summing to the value.
#[derive(Debug)]
struct ClearScheme {
    modulus: Modulus,
    parties: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("Expected {0} shares")]
struct ClearError(usize);

struct ClearKey {
    index: usize,
    weight: BigUint,
    modulus: Modulus,
}

impl ClearScheme {
    fn generate<R: RngCore + CryptoRng>(parties: usize, rng: &mut R) -> (Self, Vec<ClearKey>) {
        let modulus = Modulus::new((BigUint::from(1u32) << 127) - 1u32).unwrap();
        let mut weights = modulus.random_vec(parties - 1, rng);
        weights.push(modulus.sub(&BigUint::from(1u32), &modulus.sum(&weights)));
        let keys = weights
            .into_iter()
            .enumerate()
            .map(|(index, weight)| ClearKey {
                index,
                weight,
                modulus: modulus.clone(),
            })
            .collect();
        (Self { modulus, parties }, keys)
    }
}

impl ThresholdScheme for ClearScheme {
    type Ciphertext = BigUint;
    type DecryptionShare = BigUint;
    type Error = ClearError;

    fn plaintext_modulus(&self) -> &BigUint {
        self.modulus.modulus()
    }

    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &BigUint,
        _: &mut R,
    ) -> Result<BigUint, ClearError> {
        Ok(self.modulus.reduce(plaintext))
    }

    fn add(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        self.modulus.add(lhs, rhs)
    }

    fn scale(&self, ct: &BigUint, scalar: &BigUint) -> BigUint {
        self.modulus.mul(ct, scalar)
    }

    fn try_combine(&self, _: &BigUint, shares: &[BigUint]) -> Result<BigUint, ClearError> {
        if shares.len() != self.parties {
            return Err(ClearError(self.parties));
        }
        Ok(self.modulus.sum(shares))
    }
}

impl MultiplicativeScheme for ClearScheme {
    fn try_multiply(&self, lhs: &BigUint, rhs: &BigUint) -> Result<BigUint, ClearError> {
        Ok(self.modulus.mul(lhs, rhs))
    }
}

impl PartialDecrypter<ClearScheme> for ClearKey {
    fn party_index(&self) -> usize {
        self.index
    }

    fn try_partial_decrypt(&self, ct: &BigUint) -> Result<BigUint, ClearError> {
        Ok(self.modulus.mul(ct, &self.weight))
    }
}

fn run_fhe(threshold: usize) -> Vec<Outcome> {
    let mut rng = StdRng::seed_from_u64(threshold as u64);
    let (scheme, keys) = ClearScheme::generate(3, &mut rng);
    let params = parameters(3, threshold, 7);
    run(scheme, &keys, params, &sets(), |i, items, key, setting, topology| {
        if i == 0 {
            run_coordinator_fhe(items, key, setting, topology)
        } else {
            run_participant_fhe(items, key, setting, topology)
        }
    })
}

#[test]
fn multiplicative_intersection() {
    init_tracing();
    // Every party has three elements outside the intersection.
    assert_eq!(run_fhe(3), expected_intersection());
    assert_eq!(run_fhe(6), expected_intersection());
    assert!(run_fhe(2)
        .iter()
        .all(|o| *o == Outcome::CardinalityTestFailed));
}
