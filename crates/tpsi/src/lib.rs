#![crate_name = "tpsi"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Multiparty threshold private set intersection.
//!
//! n parties, each holding a private set of m elements of Z_N, decide whether
//! at most T elements lie outside the common intersection and, if so, every
//! party learns which of its own elements are shared by all parties. All the
//! computation happens on ciphertexts of a threshold homomorphic cryptosystem
//! (see [`tpsi_traits`]); no party can decrypt on its own.
//!
//! The crate is layered:
//! - [`primitives`]: additive secret sharing, secure multiplication, zero
//!   test, threshold decryption and inversion of encrypted values;
//! - [`linalg`]: encrypted matrices and polynomials, masked matrix products;
//! - [`cardinality`]: the encrypted Hankel matrix and its singularity test;
//! - [`solver`]: recovery of linear relations from encrypted rows;
//! - [`intersection`]: extraction of the shared and unique elements;
//! - [`protocol`]: the entry points run by each party.
//!
//! Parties communicate over a star network ([`network`]) centered on the
//! Coordinator (party 0).

mod errors;

pub mod cardinality;
pub mod config;
pub mod intersection;
pub mod linalg;
pub mod network;
pub mod paillier;
pub mod party;
pub mod primitives;
pub mod protocol;
pub mod setting;
pub mod solver;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ProtocolParameters, ProtocolParametersBuilder};
pub use errors::{Error, ErrorCategory, ParametersError, Result};
pub use party::Party;
pub use protocol::{
    run_coordinator, run_coordinator_fhe, run_participant, run_participant_fhe, Outcome,
};
pub use setting::{Role, Setting};
