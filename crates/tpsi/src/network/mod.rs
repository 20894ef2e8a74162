//! In-process star network connecting the parties of a run.
//!
//! The Coordinator (party 0) is connected to every Participant by a
//! rendezvous link; Participants never talk to each other directly. Every
//! collective step is expressed with the operations of [`Topology`], so that
//! protocol code is written once for both roles.

mod link;
mod messages;
mod topology;

pub use link::Link;
pub use messages::{Message, MessageKind};
pub use topology::{star, Topology};
