//! Session coordinator.
//!
//! Tracks which channel hosts a running game, which users are seated at a
//! tournament, and which games are blocked waiting for a player's message.
//! Every inbound message is offered here before command handling so a
//! waiting game sees its answer first.

mod actor;
mod ingress;

pub use actor::Actor;
pub use ingress::{Accept, Author, Filter, Mailbox, MailboxError, Message, Scope, WaitError};

pub struct Config {
    pub mailbox_size: usize,
}
