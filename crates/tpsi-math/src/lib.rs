#![crate_name = "tpsi_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Mathematical utilities for the tpsi library.
//!
//! Everything here works on plaintext values of the ring Z_N, where N is the
//! plaintext modulus of the threshold cryptosystem. N is not required to be
//! prime (a Paillier modulus is a product of two primes); operations that need
//! an inverse report [`Error::NotInvertible`] when it does not exist.

pub mod matrix;
pub mod poly;
pub mod zn;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Indicates an invalid modulus.
    #[error("Invalid modulus: modulus {0} should be at least 2")]
    InvalidModulus(num_bigint::BigUint),

    /// Indicates that a value has no inverse modulo N.
    #[error("{0} is not invertible modulo the plaintext modulus")]
    NotInvertible(num_bigint::BigUint),

    /// Indicates that the shapes of two operands do not match.
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// Expected shape.
        expected: (usize, usize),
        /// Found shape.
        found: (usize, usize),
    },
}
