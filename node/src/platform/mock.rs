use super::{parse_mention, Inbound, Platform, Target};
use futures::channel::mpsc;
use naocoin_types::{ChannelId, UserId};
use std::sync::{Arc, Mutex};

/// A mock platform implementation for testing.
///
/// Every sent message is recorded; inbound messages are pushed with
/// [Mock::say] and [Mock::whisper].
#[derive(Clone)]
pub struct Mock {
    pub sent: Arc<Mutex<Vec<(Target, String)>>>,
    inbound: mpsc::UnboundedSender<Inbound>,
}

impl Mock {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Inbound>) {
        let (sender, receiver) = mpsc::unbounded();
        (
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                inbound: sender,
            },
            receiver,
        )
    }

    pub fn say(&self, author: UserId, channel: ChannelId, content: &str) {
        self.push(Inbound {
            author,
            channel,
            content: content.to_string(),
            is_direct: false,
            is_bot: false,
        });
    }

    pub fn whisper(&self, author: UserId, content: &str) {
        self.push(Inbound {
            author,
            channel: 0,
            content: content.to_string(),
            is_direct: true,
            is_bot: false,
        });
    }

    pub fn push(&self, message: Inbound) {
        self.inbound
            .unbounded_send(message)
            .expect("engine stopped");
    }

    /// Messages sent to `target`, oldest first.
    pub fn sent_to(&self, target: Target) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Whether any message to `target` contains `needle`.
    pub fn saw(&self, target: Target, needle: &str) -> bool {
        self.sent_to(target).iter().any(|text| text.contains(needle))
    }
}

impl Platform for Mock {
    type Error = std::io::Error;

    async fn send(&self, target: Target, text: String) -> Result<(), Self::Error> {
        self.sent.lock().unwrap().push((target, text));
        Ok(())
    }

    fn resolve_mention(&self, mention: &str) -> Option<UserId> {
        parse_mention(mention)
    }

    fn display_name(&self, user: UserId) -> String {
        format!("user{user}")
    }
}
