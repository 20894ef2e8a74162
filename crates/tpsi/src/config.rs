//! Configuration and validation of the protocol parameters.

use crate::{Error, ParametersError, Result};
use serde::{Deserialize, Serialize};

/// Public parameters of a run: the number of parties n, the threshold T and
/// the set size m.
///
/// The cardinality condition checked by the protocol is that at most T
/// elements lie outside the intersection of the n sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    parties: usize,
    threshold: usize,
    set_size: usize,
}

impl ProtocolParameters {
    /// Number of parties n.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Threshold T.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of items m held by each party.
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    /// Side of the Hankel matrix used by the cardinality test, T + 1.
    pub fn hankel_size(&self) -> usize {
        self.threshold + 1
    }

    /// Number of sample points used to interpolate the rational function,
    /// 2T + 3.
    pub fn sample_count(&self) -> usize {
        2 * self.threshold + 3
    }
}

/// Builder for [`ProtocolParameters`].
#[derive(Debug)]
pub struct ProtocolParametersBuilder {
    parties: usize,
    threshold: usize,
    set_size: usize,
}

impl ProtocolParametersBuilder {
    /// Creates a new instance of the builder
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            parties: Default::default(),
            threshold: Default::default(),
            set_size: Default::default(),
        }
    }

    /// Sets the number of parties.
    pub fn set_parties(&mut self, parties: usize) -> &mut Self {
        self.parties = parties;
        self
    }

    /// Sets the threshold.
    pub fn set_threshold(&mut self, threshold: usize) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Sets the number of items per party.
    pub fn set_set_size(&mut self, set_size: usize) -> &mut Self {
        self.set_size = set_size;
        self
    }

    /// Build a new `ProtocolParameters`.
    pub fn build(&self) -> Result<ProtocolParameters> {
        validate_all_params(self.parties, self.threshold, self.set_size)?;
        Ok(ProtocolParameters {
            parties: self.parties,
            threshold: self.threshold,
            set_size: self.set_size,
        })
    }
}

/// Validates the number of parties.
pub fn validate_party_count(parties: usize) -> Result<()> {
    if parties < 2 {
        return Err(ParametersError::InvalidPartyCount(parties).into());
    }
    Ok(())
}

/// Validates the threshold against the set size.
///
/// At most `n·m` elements can lie outside the intersection, so a larger
/// threshold is meaningless.
pub fn validate_threshold(threshold: usize, parties: usize, set_size: usize) -> Result<()> {
    let max = parties * set_size;
    if threshold == 0 || threshold > max {
        return Err(ParametersError::InvalidThreshold(threshold, max).into());
    }
    Ok(())
}

/// Validates the set size.
pub fn validate_set_size(set_size: usize) -> Result<()> {
    if set_size == 0 {
        return Err(ParametersError::InvalidSetSize(set_size).into());
    }
    Ok(())
}

/// Validates all the protocol parameters.
pub fn validate_all_params(parties: usize, threshold: usize, set_size: usize) -> Result<()> {
    validate_party_count(parties)?;
    validate_set_size(set_size)?;
    validate_threshold(threshold, parties, set_size)?;
    Ok(())
}

/// Validates a party index.
pub fn validate_party_index(index: usize, parties: usize) -> Result<()> {
    if index >= parties {
        return Err(Error::ParametersError(ParametersError::InvalidPartyIndex(
            index, parties,
        )));
    }
    Ok(())
}
