//! Line-oriented console transport.
//!
//! Each stdin line is one inbound message:
//!
//! ```text
//! <author> <channel> <content...>
//! <author> dm <content...>
//! ```
//!
//! Replies are written to stdout prefixed with `#<channel>` or `@<user>`.

use super::{parse_mention, Inbound, Platform, Target};
use futures::channel::mpsc;
use naocoin_types::UserId;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct Console;

impl Console {
    /// Start reading stdin on a dedicated thread.
    pub fn listen(&self) -> mpsc::UnboundedReceiver<Inbound> {
        let (sender, receiver) = mpsc::unbounded();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(?e, "failed to read stdin");
                        break;
                    }
                };
                let Some(message) = parse_line(&line) else {
                    debug!(line, "skipping malformed line");
                    continue;
                };
                if sender.unbounded_send(message).is_err() {
                    break;
                }
            }
        });
        receiver
    }
}

fn parse_line(line: &str) -> Option<Inbound> {
    let mut parts = line.trim().splitn(3, ' ');
    let author = parts.next()?.parse().ok()?;
    let channel = parts.next()?;
    let content = parts.next()?.trim().to_string();
    if content.is_empty() {
        return None;
    }
    let (channel, is_direct) = match channel {
        "dm" => (0, true),
        channel => (channel.parse().ok()?, false),
    };
    Some(Inbound {
        author,
        channel,
        content,
        is_direct,
        is_bot: false,
    })
}

impl Platform for Console {
    type Error = io::Error;

    async fn send(&self, target: Target, text: String) -> Result<(), Self::Error> {
        let prefix = match target {
            Target::Channel(channel) => format!("#{channel}"),
            Target::Direct(user) => format!("@{user}"),
        };
        let mut stdout = io::stdout().lock();
        for line in text.lines() {
            writeln!(stdout, "{prefix} {line}")?;
        }
        stdout.flush()
    }

    fn resolve_mention(&self, mention: &str) -> Option<UserId> {
        parse_mention(mention)
    }

    fn display_name(&self, user: UserId) -> String {
        format!("user{user}")
    }
}
