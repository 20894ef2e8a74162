use super::{Link, Message};
use crate::config::validate_party_count;
use crate::{Error, Result};
use tpsi_traits::ThresholdScheme;
use tracing::trace;

/// The view of the star network held by one party.
///
/// Every collective operation must be called by all the parties in the same
/// order; the Coordinator always visits the Participants in index order.
#[derive(Debug)]
pub enum Topology<S: ThresholdScheme> {
    /// The Coordinator holds one link per Participant, `participants[i]`
    /// talking to party `i + 1`.
    Coordinator {
        /// Links to the Participants.
        participants: Vec<Link<S>>,
    },
    /// A Participant holds a single link to the Coordinator.
    Participant {
        /// Index of the Participant.
        index: usize,
        /// Link to the Coordinator.
        coordinator: Link<S>,
    },
}

impl<S: ThresholdScheme> Topology<S> {
    /// Index of the party holding this view.
    pub fn index(&self) -> usize {
        match self {
            Topology::Coordinator { .. } => 0,
            Topology::Participant { index, .. } => *index,
        }
    }

    /// Collect one message from every party at the Coordinator.
    ///
    /// The Coordinator receives `Some` vector indexed by party, starting with
    /// its own message; Participants receive `None`.
    pub fn gather(&self, own: Message<S>) -> Result<Option<Vec<Message<S>>>> {
        match self {
            Topology::Coordinator { participants } => {
                let mut messages = Vec::with_capacity(participants.len() + 1);
                messages.push(own);
                for link in participants {
                    messages.push(link.recv()?);
                }
                trace!("Gathered {} messages", messages.len());
                Ok(Some(messages))
            }
            Topology::Participant { coordinator, .. } => {
                coordinator.send(own)?;
                Ok(None)
            }
        }
    }

    /// Send a message from the Coordinator to every Participant. Every party
    /// returns the message; only the Coordinator provides it.
    pub fn scatter(&self, message: Option<Message<S>>) -> Result<Message<S>> {
        match self {
            Topology::Coordinator { participants } => {
                let message = message.ok_or_else(|| {
                    Error::DefaultError("The Coordinator has nothing to scatter".to_string())
                })?;
                for link in participants {
                    link.send(message.clone())?;
                }
                Ok(message)
            }
            Topology::Participant { coordinator, .. } => coordinator.recv(),
        }
    }

    /// Gather one message per party and give the table to every party.
    ///
    /// Every party must send a message of the same kind, either
    /// [`Message::Ciphertexts`] or [`Message::Plaintexts`]; the result is the
    /// corresponding table, indexed by party.
    pub fn all_gather(&self, own: Message<S>) -> Result<Message<S>> {
        let table = match self.gather(own)? {
            Some(messages) => Some(Self::tabulate(messages)?),
            None => None,
        };
        self.scatter(table)
    }

    fn tabulate(messages: Vec<Message<S>>) -> Result<Message<S>> {
        let mut ciphertexts = vec![];
        let mut plaintexts = vec![];
        for (peer, message) in messages.into_iter().enumerate() {
            match message {
                Message::Ciphertexts(v) if plaintexts.is_empty() => ciphertexts.push(v),
                Message::Plaintexts(v) if ciphertexts.is_empty() => plaintexts.push(v),
                other => {
                    return Err(Error::UnexpectedMessage {
                        peer,
                        expected: if plaintexts.is_empty() {
                            super::MessageKind::Ciphertexts
                        } else {
                            super::MessageKind::Plaintexts
                        },
                        found: other.kind(),
                    })
                }
            }
        }
        if plaintexts.is_empty() {
            Ok(Message::CiphertextTable(ciphertexts))
        } else {
            Ok(Message::PlaintextTable(plaintexts))
        }
    }

    /// Broadcast a message from party `origin` to every party, through the
    /// Coordinator. Only `origin` provides the message.
    pub fn publish(&self, origin: usize, message: Option<Message<S>>) -> Result<Message<S>> {
        match self {
            Topology::Coordinator { participants } if origin > 0 => {
                let link = participants
                    .get(origin - 1)
                    .ok_or(Error::LinkClosed(origin))?;
                let message = link.recv()?;
                self.scatter(Some(message))
            }
            Topology::Participant { index, coordinator } if *index == origin => {
                let message = message.ok_or_else(|| {
                    Error::DefaultError(format!("Party {} has nothing to publish", origin))
                })?;
                coordinator.send(message)?;
                self.scatter(None)
            }
            _ => self.scatter(message),
        }
    }
}

/// Create the star network of `n` parties. The topology at position `i` is
/// the view of party `i`.
pub fn star<S: ThresholdScheme>(n: usize) -> Result<Vec<Topology<S>>> {
    validate_party_count(n)?;
    let (to_participants, to_coordinator): (Vec<_>, Vec<_>) =
        (1..n).map(|i| Link::pair(0, i)).unzip();
    let mut topologies = Vec::with_capacity(n);
    topologies.push(Topology::Coordinator {
        participants: to_participants,
    });
    topologies.extend(
        to_coordinator
            .into_iter()
            .enumerate()
            .map(|(i, coordinator)| Topology::Participant {
                index: i + 1,
                coordinator,
            }),
    );
    Ok(topologies)
}
