//! Per-run configuration of a party.

use std::sync::Arc;

use crate::config::{validate_party_index, ProtocolParameters};
use crate::Result;
use num_bigint::BigUint;
use tpsi_math::zn::Modulus;
use tpsi_traits::ThresholdScheme;

/// Role of a party in the star network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Party 0, which relays every exchange and combines decryption shares.
    Coordinator,
    /// Any other party.
    Participant,
}

/// Immutable configuration of one party for one run: the public parameters,
/// the index of the party, and a handle to the cryptosystem.
#[derive(Debug)]
pub struct Setting<S: ThresholdScheme> {
    parameters: ProtocolParameters,
    index: usize,
    scheme: Arc<S>,
    modulus: Modulus,
}

impl<S: ThresholdScheme> Clone for Setting<S> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters,
            index: self.index,
            scheme: self.scheme.clone(),
            modulus: self.modulus.clone(),
        }
    }
}

impl<S: ThresholdScheme> Setting<S> {
    /// Create the setting of party `index`.
    pub fn new(parameters: ProtocolParameters, index: usize, scheme: Arc<S>) -> Result<Self> {
        validate_party_index(index, parameters.parties())?;
        let modulus = Modulus::new(scheme.plaintext_modulus().clone())?;
        Ok(Self {
            parameters,
            index,
            scheme,
            modulus,
        })
    }

    /// The public parameters.
    pub fn parameters(&self) -> &ProtocolParameters {
        &self.parameters
    }

    /// Index of this party; 0 is the Coordinator.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Role of this party.
    pub fn role(&self) -> Role {
        if self.index == 0 {
            Role::Coordinator
        } else {
            Role::Participant
        }
    }

    /// Returns whether this party is the Coordinator.
    pub fn is_coordinator(&self) -> bool {
        self.role() == Role::Coordinator
    }

    /// The cryptosystem.
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// The plaintext modulus N.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Check a private set against the parameters: it must have exactly m
    /// distinct items, all below N.
    pub fn validate_items(&self, items: &[BigUint]) -> Result<()> {
        if items.len() != self.parameters.set_size() {
            return Err(crate::Error::wrong_set_size(
                items.len(),
                self.parameters.set_size(),
            ));
        }
        if let Some(item) = items.iter().find(|a| *a >= self.modulus.modulus()) {
            return Err(crate::Error::item_out_of_range(item));
        }
        let mut sorted = items.to_vec();
        sorted.sort();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(crate::Error::duplicate_item(&w[0]));
        }
        Ok(())
    }
}
