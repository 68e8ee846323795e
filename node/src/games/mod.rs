//! Async drivers for the wagering games.
//!
//! A driver owns one game instance for its whole life: it prompts players,
//! waits for their answers through the [coordinator], feeds them to the game
//! state machine and settles the result on the ledger. The engine opens the
//! channel's session before spawning a driver; the driver always closes it.

use crate::{
    coordinator::{self, Filter, WaitError},
    platform::{Inbound, Platform, Target},
};
use commonware_runtime::Clock;
use naocoin_execution::{casino::Outcome, Ledger, Settled, State};
use naocoin_types::ChannelId;
use prometheus_client::metrics::counter::Counter;
use std::{sync::Arc, time::Duration};
use tracing::warn;

pub mod highlow;
pub mod limited_rps;

/// Everything a game driver talks to.
pub struct Table<P: Platform, S: State> {
    pub platform: P,
    pub ledger: Arc<Ledger<S>>,
    pub coordinator: coordinator::Mailbox,
    pub channel: ChannelId,
    pub timeout: Duration,
    /// Command prefix; commands are never taken as game input.
    pub prefix: String,
    pub settled: Counter,
}

impl<P: Platform, S: State> Table<P, S> {
    /// Post to the game's channel.
    pub async fn announce(&self, text: String) {
        self.send(Target::Channel(self.channel), text).await;
    }

    pub async fn send(&self, target: Target, text: String) {
        if let Err(e) = self.platform.send(target, text).await {
            warn!(?e, ?target, "failed to send message");
        }
    }

    pub async fn wait<E: Clock>(&mut self, context: &E, filter: Filter) -> Result<Inbound, WaitError> {
        let timeout = self.timeout;
        self.coordinator.wait(context, filter, timeout).await
    }

    /// Apply `outcome` to the ledger. Returns `None` if the store failed.
    pub async fn settle(&self, outcome: &Outcome) -> Option<Settled> {
        match self.ledger.settle(outcome).await {
            Ok(settled) => {
                if settled != Settled::Unchanged {
                    self.settled.inc();
                }
                Some(settled)
            }
            Err(e) => {
                warn!(?e, ?outcome, channel = self.channel, "failed to settle game");
                self.announce("Something went wrong while settling the game.".to_string())
                    .await;
                None
            }
        }
    }

    /// Release the channel (and any tournament seats in it).
    pub async fn close(mut self) {
        if let Err(e) = self.coordinator.close(self.channel).await {
            warn!(?e, channel = self.channel, "failed to close session");
        }
    }
}
