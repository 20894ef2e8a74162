//! Entry points of the protocol, one per role and per kind of cryptosystem.
//!
//! With an additively homomorphic scheme, the parties first run the
//! cardinality test and only extract the intersection if it passes. With a
//! scheme that multiplies ciphertexts, the extraction runs directly and fails
//! when some party has more than T elements outside the intersection.

use crate::intersection::Membership;
use crate::network::Topology;
use crate::primitives::{Interactive, Native};
use crate::{Error, Party, Result, Role, Setting};
use num_bigint::BigUint;
use tpsi_traits::{MultiplicativeScheme, PartialDecrypter, ThresholdScheme};
use tracing::info;

/// Result of a run for one party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The elements of this party, split by membership in the intersection.
    Intersection {
        /// Elements held by every party.
        shared: Vec<BigUint>,
        /// Elements missing from at least one other party.
        unique: Vec<BigUint>,
    },
    /// Too many elements lie outside the intersection; nothing else is
    /// learned.
    CardinalityTestFailed,
}

impl From<Option<Membership>> for Outcome {
    fn from(membership: Option<Membership>) -> Self {
        match membership {
            Some(Membership { shared, unique }) => Outcome::Intersection { shared, unique },
            None => Outcome::CardinalityTestFailed,
        }
    }
}

/// Run the protocol as the Coordinator with an additive scheme.
pub fn run_coordinator<S: ThresholdScheme, K: PartialDecrypter<S>>(
    items: &[BigUint],
    key: &K,
    setting: &Setting<S>,
    topology: &Topology<S>,
) -> Result<Outcome> {
    check_role(setting, topology, Role::Coordinator)?;
    run_additive(items, key, setting, topology)
}

/// Run the protocol as a Participant with an additive scheme.
pub fn run_participant<S: ThresholdScheme, K: PartialDecrypter<S>>(
    items: &[BigUint],
    key: &K,
    setting: &Setting<S>,
    topology: &Topology<S>,
) -> Result<Outcome> {
    check_role(setting, topology, Role::Participant)?;
    run_additive(items, key, setting, topology)
}

/// Run the protocol as the Coordinator with a multiplicative scheme.
pub fn run_coordinator_fhe<S: MultiplicativeScheme, K: PartialDecrypter<S>>(
    items: &[BigUint],
    key: &K,
    setting: &Setting<S>,
    topology: &Topology<S>,
) -> Result<Outcome> {
    check_role(setting, topology, Role::Coordinator)?;
    run_multiplicative(items, key, setting, topology)
}

/// Run the protocol as a Participant with a multiplicative scheme.
pub fn run_participant_fhe<S: MultiplicativeScheme, K: PartialDecrypter<S>>(
    items: &[BigUint],
    key: &K,
    setting: &Setting<S>,
    topology: &Topology<S>,
) -> Result<Outcome> {
    check_role(setting, topology, Role::Participant)?;
    run_multiplicative(items, key, setting, topology)
}

fn check_role<S: ThresholdScheme>(
    setting: &Setting<S>,
    topology: &Topology<S>,
    role: Role,
) -> Result<()> {
    let expected = match role {
        Role::Coordinator => "Coordinator",
        Role::Participant => "Participant",
    };
    if setting.role() != role {
        return Err(Error::role_mismatch(setting.index(), expected));
    }
    let parties = setting.parameters().parties();
    match topology {
        Topology::Coordinator { participants } if participants.len() + 1 != parties => Err(
            Error::batch_mismatch(0, parties - 1, participants.len()),
        ),
        Topology::Participant { index, .. } if *index >= parties => {
            Err(Error::role_mismatch(*index, expected))
        }
        _ if topology.index() != setting.index() => {
            Err(Error::role_mismatch(setting.index(), "holder of this topology"))
        }
        _ => Ok(()),
    }
}

fn run_additive<S: ThresholdScheme, K: PartialDecrypter<S>>(
    items: &[BigUint],
    key: &K,
    setting: &Setting<S>,
    topology: &Topology<S>,
) -> Result<Outcome> {
    setting.validate_items(items)?;
    let mut party = Party::new(setting, topology, key)?;
    info!(party = party.index(), "Starting the additive protocol");
    if !party.cardinality_test(items)? {
        info!(party = party.index(), "Cardinality test failed");
        return Ok(Outcome::CardinalityTestFailed);
    }
    let outcome = Outcome::from(party.intersect(items, &Interactive)?);
    info!(party = party.index(), rounds = party.rounds(), "Run complete");
    Ok(outcome)
}

fn run_multiplicative<S: MultiplicativeScheme, K: PartialDecrypter<S>>(
    items: &[BigUint],
    key: &K,
    setting: &Setting<S>,
    topology: &Topology<S>,
) -> Result<Outcome> {
    setting.validate_items(items)?;
    let mut party = Party::new(setting, topology, key)?;
    info!(party = party.index(), "Starting the multiplicative protocol");
    let outcome = Outcome::from(party.intersect(items, &Native)?);
    info!(party = party.index(), rounds = party.rounds(), "Run complete");
    Ok(outcome)
}
