use std::fmt::{Display, Formatter};

use crate::{Error, Result};
use num_bigint::BigUint;
use tpsi_traits::ThresholdScheme;

/// The kind of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// See [`Message::Ciphertexts`].
    Ciphertexts,
    /// See [`Message::CiphertextTable`].
    CiphertextTable,
    /// See [`Message::DecryptionShares`].
    DecryptionShares,
    /// See [`Message::Plaintexts`].
    Plaintexts,
    /// See [`Message::PlaintextTable`].
    PlaintextTable,
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageKind::Ciphertexts => "ciphertexts",
            MessageKind::CiphertextTable => "ciphertext table",
            MessageKind::DecryptionShares => "decryption shares",
            MessageKind::Plaintexts => "plaintexts",
            MessageKind::PlaintextTable => "plaintext table",
        };
        f.write_str(name)
    }
}

/// A value exchanged between two parties.
#[derive(Debug)]
pub enum Message<S: ThresholdScheme> {
    /// A batch of ciphertexts.
    Ciphertexts(Vec<S::Ciphertext>),
    /// One batch of ciphertexts per party, indexed by party.
    CiphertextTable(Vec<Vec<S::Ciphertext>>),
    /// A batch of partial decryptions.
    DecryptionShares(Vec<S::DecryptionShare>),
    /// A batch of field elements.
    Plaintexts(Vec<BigUint>),
    /// One batch of field elements per party, indexed by party.
    PlaintextTable(Vec<Vec<BigUint>>),
}

impl<S: ThresholdScheme> Clone for Message<S> {
    fn clone(&self) -> Self {
        match self {
            Message::Ciphertexts(v) => Message::Ciphertexts(v.clone()),
            Message::CiphertextTable(v) => Message::CiphertextTable(v.clone()),
            Message::DecryptionShares(v) => Message::DecryptionShares(v.clone()),
            Message::Plaintexts(v) => Message::Plaintexts(v.clone()),
            Message::PlaintextTable(v) => Message::PlaintextTable(v.clone()),
        }
    }
}

impl<S: ThresholdScheme> Message<S> {
    /// The kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Ciphertexts(_) => MessageKind::Ciphertexts,
            Message::CiphertextTable(_) => MessageKind::CiphertextTable,
            Message::DecryptionShares(_) => MessageKind::DecryptionShares,
            Message::Plaintexts(_) => MessageKind::Plaintexts,
            Message::PlaintextTable(_) => MessageKind::PlaintextTable,
        }
    }

    fn unexpected(&self, peer: usize, expected: MessageKind) -> Error {
        Error::UnexpectedMessage {
            peer,
            expected,
            found: self.kind(),
        }
    }

    /// Extract a batch of ciphertexts received from `peer`.
    pub fn into_ciphertexts(self, peer: usize) -> Result<Vec<S::Ciphertext>> {
        match self {
            Message::Ciphertexts(v) => Ok(v),
            other => Err(other.unexpected(peer, MessageKind::Ciphertexts)),
        }
    }

    /// Extract a table of ciphertexts received from `peer`.
    pub fn into_ciphertext_table(self, peer: usize) -> Result<Vec<Vec<S::Ciphertext>>> {
        match self {
            Message::CiphertextTable(v) => Ok(v),
            other => Err(other.unexpected(peer, MessageKind::CiphertextTable)),
        }
    }

    /// Extract a batch of decryption shares received from `peer`.
    pub fn into_decryption_shares(self, peer: usize) -> Result<Vec<S::DecryptionShare>> {
        match self {
            Message::DecryptionShares(v) => Ok(v),
            other => Err(other.unexpected(peer, MessageKind::DecryptionShares)),
        }
    }

    /// Extract a batch of field elements received from `peer`.
    pub fn into_plaintexts(self, peer: usize) -> Result<Vec<BigUint>> {
        match self {
            Message::Plaintexts(v) => Ok(v),
            other => Err(other.unexpected(peer, MessageKind::Plaintexts)),
        }
    }

    /// Extract a table of field elements received from `peer`.
    pub fn into_plaintext_table(self, peer: usize) -> Result<Vec<Vec<BigUint>>> {
        match self {
            Message::PlaintextTable(v) => Ok(v),
            other => Err(other.unexpected(peer, MessageKind::PlaintextTable)),
        }
    }
}
