//! Error types for the tpsi protocol.

use crate::network::MessageKind;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Indicates that an error from the underlying mathematical library was
    /// encountered.
    #[error("{0}")]
    MathError(#[from] tpsi_math::Error),

    /// Indicates a parameter error.
    #[error("{0}")]
    ParametersError(#[from] ParametersError),

    /// Indicates that too few values were provided.
    #[error("Too few values provided: {0} is below limit {1}")]
    TooFewValues(usize, usize),

    /// Indicates that an input is invalid.
    #[error("{0}")]
    UnspecifiedInput(String),

    /// Indicates an error reported by the cryptosystem.
    #[error("Cryptosystem error: {0}")]
    Scheme(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Indicates that the link to a peer was closed.
    #[error("Link to party {0} is closed")]
    LinkClosed(usize),

    /// Indicates that a message of the wrong kind was received.
    #[error("Unexpected message from party {peer}: expected {expected}, found {found}")]
    UnexpectedMessage {
        /// Party the message was received from.
        peer: usize,
        /// Expected kind.
        expected: MessageKind,
        /// Received kind.
        found: MessageKind,
    },

    /// Indicates an error in a step of the protocol.
    #[error("{0}")]
    DefaultError(String),
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParametersError {
    /// Indicates that the number of parties is invalid.
    #[error("Invalid number of parties: {0} is below 2")]
    InvalidPartyCount(usize),

    /// Indicates that the threshold is invalid.
    #[error("Invalid threshold: {0} should be between 1 and {1}")]
    InvalidThreshold(usize, usize),

    /// Indicates that the set size is invalid.
    #[error("Invalid set size: {0}")]
    InvalidSetSize(usize),

    /// Indicates that a party index is invalid.
    #[error("Invalid party index: {0} should be below {1}")]
    InvalidPartyIndex(usize, usize),
}

/// Coarse classification of the errors, used to decide how a failed run is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid parameters or inputs.
    Configuration,
    /// Failure inside the cryptosystem or during decryption.
    Cryptographic,
    /// Failure of the communication between parties.
    Network,
}

impl Error {
    /// The category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ParametersError(_)
            | Error::TooFewValues(..)
            | Error::UnspecifiedInput(_) => ErrorCategory::Configuration,
            Error::MathError(tpsi_math::Error::DimensionMismatch { .. }) => {
                ErrorCategory::Configuration
            }
            Error::MathError(_) | Error::Scheme(_) | Error::DefaultError(_) => {
                ErrorCategory::Cryptographic
            }
            Error::LinkClosed(_) | Error::UnexpectedMessage { .. } => ErrorCategory::Network,
        }
    }

    /// Wrap an error reported by the cryptosystem.
    pub fn scheme<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Scheme(Box::new(error))
    }

    /// Create a wrong set size error.
    pub fn wrong_set_size(provided: usize, expected: usize) -> Self {
        Self::UnspecifiedInput(format!(
            "Wrong set size: {} items provided, {} expected",
            provided, expected
        ))
    }

    /// Create a duplicate item error.
    pub fn duplicate_item<D: std::fmt::Display>(item: D) -> Self {
        Self::UnspecifiedInput(format!("Item {} appears more than once", item))
    }

    /// Create an out of range item error.
    pub fn item_out_of_range<D: std::fmt::Display>(item: D) -> Self {
        Self::UnspecifiedInput(format!(
            "Item {} is not below the plaintext modulus",
            item
        ))
    }

    /// Create a role mismatch error.
    pub fn role_mismatch(index: usize, expected: &str) -> Self {
        Self::UnspecifiedInput(format!(
            "Party {} cannot act as the {}",
            index, expected
        ))
    }

    /// Create a batch length mismatch error.
    pub fn batch_mismatch(peer: usize, expected: usize, found: usize) -> Self {
        Self::DefaultError(format!(
            "Party {} sent {} values, {} expected",
            peer, found, expected
        ))
    }

    /// Create a non-invertible evaluation error.
    pub fn not_invertible_at_sample(sample: usize) -> Self {
        Self::DefaultError(format!(
            "The root polynomial vanishes at sample point {}",
            sample
        ))
    }
}
