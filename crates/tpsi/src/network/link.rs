use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use super::Message;
use crate::{Error, Result};
use tpsi_traits::ThresholdScheme;

/// One end of a bidirectional rendezvous channel between two parties.
///
/// A send blocks until the peer receives the message. Dropping one end makes
/// every later operation on the other end fail with [`Error::LinkClosed`].
#[derive(Debug)]
pub struct Link<S: ThresholdScheme> {
    peer: usize,
    sender: SyncSender<Message<S>>,
    receiver: Receiver<Message<S>>,
}

impl<S: ThresholdScheme> Link<S> {
    /// Create a connected pair of links between parties `a` and `b`. The
    /// first link is held by `a` and talks to `b`.
    pub fn pair(a: usize, b: usize) -> (Self, Self) {
        let (to_b, from_a) = sync_channel(0);
        let (to_a, from_b) = sync_channel(0);
        (
            Self {
                peer: b,
                sender: to_b,
                receiver: from_b,
            },
            Self {
                peer: a,
                sender: to_a,
                receiver: from_a,
            },
        )
    }

    /// Index of the party at the other end.
    pub fn peer(&self) -> usize {
        self.peer
    }

    /// Send a message to the peer.
    pub fn send(&self, message: Message<S>) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| Error::LinkClosed(self.peer))
    }

    /// Receive the next message from the peer.
    pub fn recv(&self) -> Result<Message<S>> {
        self.receiver.recv().map_err(|_| Error::LinkClosed(self.peer))
    }
}

#[cfg(test)]
mod tests {
    use super::Link;
    use crate::network::Message;
    use crate::testing::TransparentScheme;
    use crate::Error;
    use num_bigint::BigUint;

    #[test]
    fn exchange() {
        let (a, b) = Link::<TransparentScheme>::pair(0, 1);
        assert_eq!(a.peer(), 1);
        assert_eq!(b.peer(), 0);
        std::thread::scope(|s| {
            s.spawn(move || a.send(Message::Plaintexts(vec![BigUint::from(5u32)])).unwrap());
            let m = b.recv().unwrap().into_plaintexts(0).unwrap();
            assert_eq!(m, vec![BigUint::from(5u32)]);
        });
    }

    #[test]
    fn closed() {
        let (a, b) = Link::<TransparentScheme>::pair(0, 1);
        drop(b);
        assert!(matches!(a.recv(), Err(Error::LinkClosed(1))));
        assert!(matches!(
            a.send(Message::Plaintexts(vec![])),
            Err(Error::LinkClosed(1))
        ));
    }
}
