use super::{
    ingress::{Author, Filter, Mailbox, Message, Scope},
    Config,
};
use crate::platform::Inbound;
use commonware_runtime::{Handle, Metrics, Spawner};
use futures::{
    channel::{mpsc, oneshot},
    StreamExt,
};
use naocoin_types::{casino::GameType, ChannelId, UserId};
use prometheus_client::metrics::{counter::Counter, gauge::Gauge};
use std::collections::HashMap;
use tracing::{debug, info, warn};

struct Waiter {
    filter: Filter,
    response: oneshot::Sender<Inbound>,
}

pub struct Actor<E: Spawner + Metrics> {
    context: E,
    mailbox: mpsc::Receiver<Message>,

    sessions: HashMap<ChannelId, GameType>,
    seats: HashMap<UserId, ChannelId>,
    waiters: Vec<Waiter>,

    active_sessions: Gauge,
    consumed: Counter,
}

impl<E: Spawner + Metrics> Actor<E> {
    pub fn new(context: E, config: Config) -> (Self, Mailbox) {
        // Create mailbox
        let (sender, mailbox) = mpsc::channel(config.mailbox_size);

        // Register metrics
        let active_sessions = Gauge::default();
        let consumed = Counter::default();
        context.register(
            "active_sessions",
            "Number of channels with a running game",
            active_sessions.clone(),
        );
        context.register(
            "consumed",
            "Number of messages consumed by waiting games",
            consumed.clone(),
        );

        (
            Self {
                context,
                mailbox,
                sessions: HashMap::new(),
                seats: HashMap::new(),
                waiters: Vec::new(),
                active_sessions,
                consumed,
            },
            Mailbox::new(sender),
        )
    }

    pub fn start(mut self) -> Handle<()> {
        self.context.spawn_ref()(self.run())
    }

    async fn run(mut self) {
        while let Some(message) = self.mailbox.next().await {
            match message {
                Message::Open {
                    channel,
                    game,
                    response,
                } => {
                    let opened = match self.sessions.get(&channel) {
                        Some(running) => {
                            debug!(channel, %running, "session already open");
                            false
                        }
                        None => {
                            self.sessions.insert(channel, game);
                            self.active_sessions.set(self.sessions.len() as i64);
                            info!(channel, %game, "opened session");
                            true
                        }
                    };
                    let _ = response.send(opened);
                }
                Message::Close { channel } => {
                    if let Some(game) = self.sessions.remove(&channel) {
                        info!(channel, %game, "closed session");
                    }
                    self.seats.retain(|_, seated| *seated != channel);
                    self.active_sessions.set(self.sessions.len() as i64);
                }
                Message::Seat {
                    channel,
                    user,
                    response,
                } => {
                    let seated = self.seat(channel, user);
                    let _ = response.send(seated);
                }
                Message::Expect { filter, response } => {
                    self.waiters.push(Waiter { filter, response });
                }
                Message::Deliver { message, response } => {
                    let consumed = self.deliver(message);
                    if consumed {
                        self.consumed.inc();
                    }
                    let _ = response.send(consumed);
                }
            }
        }
        warn!("mailbox closed");
    }

    fn seat(&mut self, channel: ChannelId, user: UserId) -> bool {
        if self.seats.contains_key(&user) {
            return false;
        }
        self.seats.insert(user, channel);
        true
    }

    /// Hand `message` to the oldest waiter whose filter accepts it.
    fn deliver(&mut self, message: Inbound) -> bool {
        self.waiters.retain(|waiter| !waiter.response.is_canceled());
        let mut index = 0;
        while index < self.waiters.len() {
            let waiter = &self.waiters[index];
            if !waiter.filter.matches(&message) {
                index += 1;
                continue;
            }
            if let Author::Unseated = waiter.filter.author {
                if self.seats.contains_key(&message.author) {
                    index += 1;
                    continue;
                }
            }
            let waiter = self.waiters.remove(index);
            let claimed_seat = match (waiter.filter.author, waiter.filter.scope) {
                (Author::Unseated, Scope::Channel(channel)) => {
                    self.seat(channel, message.author)
                }
                _ => false,
            };
            match waiter.response.send(message) {
                Ok(()) => return true,
                Err(returned) => {
                    // Waiter timed out between pruning and now.
                    if claimed_seat {
                        self.seats.remove(&returned.author);
                    }
                    return self.deliver(returned);
                }
            }
        }
        false
    }
}
