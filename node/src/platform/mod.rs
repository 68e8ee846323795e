//! Chat platform abstraction.
//!
//! The engine only needs to receive messages, send text and turn mentions into
//! user ids. Anything that can do that (a real chat service, the console, or a
//! test mock) implements [Platform].

use naocoin_types::{ChannelId, UserId};
use std::future::Future;

pub mod console;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::Mock;

/// A message observed on the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub author: UserId,
    pub channel: ChannelId,
    pub content: String,
    /// Sent privately to the bot rather than in a shared channel.
    pub is_direct: bool,
    pub is_bot: bool,
}

/// Where a reply goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Channel(ChannelId),
    Direct(UserId),
}

impl Target {
    /// Reply to wherever `message` came from.
    pub fn reply(message: &Inbound) -> Self {
        if message.is_direct {
            Target::Direct(message.author)
        } else {
            Target::Channel(message.channel)
        }
    }
}

/// Trait for interacting with a chat platform.
pub trait Platform: Clone + Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deliver `text` to `target`.
    fn send(
        &self,
        target: Target,
        text: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Resolve a mention written in a command argument to a user.
    fn resolve_mention(&self, mention: &str) -> Option<UserId>;

    /// Human readable name of a user.
    fn display_name(&self, user: UserId) -> String;

    /// Text that mentions (pings) a user.
    fn mention(&self, user: UserId) -> String {
        format!("<@{user}>")
    }
}

/// Parse `<@123>`, `<@!123>`, `@123` or `123`.
pub fn parse_mention(mention: &str) -> Option<UserId> {
    let trimmed = mention.trim();
    let inner = trimmed
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches('!'))
        .or_else(|| trimmed.strip_prefix('@'))
        .unwrap_or(trimmed);
    inner.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mention() {
        assert_eq!(parse_mention("<@42>"), Some(42));
        assert_eq!(parse_mention("<@!42>"), Some(42));
        assert_eq!(parse_mention("@42"), Some(42));
        assert_eq!(parse_mention(" 42 "), Some(42));
        assert_eq!(parse_mention("<@bob>"), None);
        assert_eq!(parse_mention("bob"), None);
    }

    #[test]
    fn test_reply_target() {
        let mut message = Inbound {
            author: 1,
            channel: 9,
            content: "!work".to_string(),
            is_direct: false,
            is_bot: false,
        };
        assert_eq!(Target::reply(&message), Target::Channel(9));
        message.is_direct = true;
        assert_eq!(Target::reply(&message), Target::Direct(1));
    }
}
