use crate::platform::Inbound;
use commonware_macros::select;
use commonware_runtime::Clock;
use futures::{
    channel::{mpsc, oneshot},
    SinkExt,
};
use naocoin_types::{casino::GameType, ChannelId, UserId};
use std::time::Duration;
use thiserror::Error;

/// Where an awaited message must be posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Channel(ChannelId),
    Direct,
}

/// Who may author an awaited message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Author {
    Only(UserId),
    /// Anyone not seated at a tournament. A match seats the author at the
    /// waiting channel.
    Unseated,
}

/// Which contents satisfy an awaited message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Accept {
    /// Anything that does not start with the given command prefix.
    Unprefixed(String),
    Exact(Vec<String>),
    IgnoreCase(Vec<String>),
}

/// Predicate over inbound messages a game is waiting on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub scope: Scope,
    pub author: Author,
    pub accept: Accept,
}

impl Filter {
    /// Whether `message` passes scope, content and (for [Author::Only]) author checks.
    pub fn matches(&self, message: &Inbound) -> bool {
        let scoped = match self.scope {
            Scope::Channel(channel) => !message.is_direct && message.channel == channel,
            Scope::Direct => message.is_direct,
        };
        if !scoped {
            return false;
        }
        if let Author::Only(user) = self.author {
            if message.author != user {
                return false;
            }
        }
        let content = message.content.trim();
        match &self.accept {
            Accept::Unprefixed(prefix) => !content.starts_with(prefix.as_str()),
            Accept::Exact(options) => options.iter().any(|o| o == content),
            Accept::IgnoreCase(options) => options.iter().any(|o| o.eq_ignore_ascii_case(content)),
        }
    }
}

pub enum Message {
    Open {
        channel: ChannelId,
        game: GameType,
        response: oneshot::Sender<bool>,
    },
    Close {
        channel: ChannelId,
    },
    Seat {
        channel: ChannelId,
        user: UserId,
        response: oneshot::Sender<bool>,
    },
    Expect {
        filter: Filter,
        response: oneshot::Sender<Inbound>,
    },
    Deliver {
        message: Inbound,
        response: oneshot::Sender<bool>,
    },
}

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("coordinator mailbox closed")]
    Closed,
    #[error("coordinator request canceled")]
    Canceled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitError {
    #[error("no response in time")]
    TimedOut,
    #[error("coordinator stopped")]
    Closed,
}

#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Message>,
}

impl Mailbox {
    pub(super) fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &mut self,
        message: impl FnOnce(oneshot::Sender<T>) -> Message,
    ) -> Result<T, MailboxError> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send(message(sender))
            .await
            .map_err(|_| MailboxError::Closed)?;
        receiver.await.map_err(|_| MailboxError::Canceled)
    }

    /// Claim `channel` for a new game session. Returns false if one is already running.
    pub async fn open(&mut self, channel: ChannelId, game: GameType) -> Result<bool, MailboxError> {
        self.request(|response| Message::Open {
            channel,
            game,
            response,
        })
        .await
    }

    /// Tear down the session in `channel` and release its seats.
    pub async fn close(&mut self, channel: ChannelId) -> Result<(), MailboxError> {
        self.sender
            .send(Message::Close { channel })
            .await
            .map_err(|_| MailboxError::Closed)
    }

    /// Seat `user` at the tournament in `channel`. Returns false if already seated anywhere.
    pub async fn seat(&mut self, channel: ChannelId, user: UserId) -> Result<bool, MailboxError> {
        self.request(|response| Message::Seat {
            channel,
            user,
            response,
        })
        .await
    }

    /// Offer an inbound message to waiting games. Returns true if one consumed it.
    pub async fn deliver(&mut self, message: Inbound) -> Result<bool, MailboxError> {
        self.request(|response| Message::Deliver { message, response })
            .await
    }

    /// Wait for the next message matching `filter`, for at most `timeout`.
    pub async fn wait<E: Clock>(
        &mut self,
        context: &E,
        filter: Filter,
        timeout: Duration,
    ) -> Result<Inbound, WaitError> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send(Message::Expect {
                filter,
                response: sender,
            })
            .await
            .map_err(|_| WaitError::Closed)?;
        select! {
            result = receiver => {
                result.map_err(|_| WaitError::Closed)
            },
            _ = context.sleep(timeout) => {
                Err(WaitError::TimedOut)
            },
        }
    }
}
