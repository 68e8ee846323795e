//! Command parsing.

use naocoin_types::casino::GameType;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show a rank card for the author or the mentioned user.
    Rank(Option<String>),
    Play { game: GameType, bet: i64 },
    Work,
    Give { target: String, amount: i64 },
}

/// Arguments did not fit the command; carries the usage line.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("usage: {0}")]
pub struct Usage(pub &'static str);

impl Command {
    /// Parse `content` if it starts with `prefix` and names a known command.
    ///
    /// Unknown commands yield `None`; known commands with bad arguments yield a [Usage].
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Self, Usage>> {
        let body = content.trim().strip_prefix(prefix)?;
        let mut args = body.split_whitespace();
        let name = args.next()?.to_lowercase();
        let args: Vec<&str> = args.collect();
        let command = match name.as_str() {
            "rank" => match args.as_slice() {
                [] => Ok(Command::Rank(None)),
                [user] => Ok(Command::Rank(Some(user.to_string()))),
                _ => Err(Usage("rank [user]")),
            },
            "work" => Ok(Command::Work),
            "give" => match args.as_slice() {
                [target, amount] => amount
                    .parse()
                    .map(|amount| Command::Give {
                        target: target.to_string(),
                        amount,
                    })
                    .map_err(|_| Usage("give <user> <amount>")),
                _ => Err(Usage("give <user> <amount>")),
            },
            "highlow" => bet(&args, GameType::HighLow, "highlow <bet>"),
            "limitedrps" => bet(&args, GameType::LimitedRps, "limitedrps <bet>"),
            _ => return None,
        };
        Some(command)
    }
}

fn bet(args: &[&str], game: GameType, usage: &'static str) -> Result<Command, Usage> {
    match args {
        [bet] => bet
            .parse()
            .map(|bet| Command::Play { game, bet })
            .map_err(|_| Usage(usage)),
        _ => Err(Usage(usage)),
    }
}
