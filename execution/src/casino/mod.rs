//! Wagering game rules.
//!
//! Each game is an explicit state machine that never waits on anything: the
//! caller feeds it player input (or a timeout) and reads back the next state.
//! Once a game reaches a terminal state it reports an [Outcome], which the
//! [crate::Ledger] turns into a balance change.
//!
//! - High/Low streak prediction ([highlow])
//! - Limited rock/paper/scissors tournament ([limited_rps])

pub mod highlow;
#[cfg(test)]
mod integration_tests;
pub mod limited_rps;

use naocoin_types::UserId;
use thiserror::Error;

/// Final result of a game, in the terms the ledger settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `payout` is the total return on `stake`; only `payout - stake` is credited.
    Win {
        player: UserId,
        stake: u64,
        payout: u64,
    },
    /// The stake is debited.
    Loss { player: UserId, stake: u64 },
    /// No balance changes (timeouts and aborted games).
    Void,
}

impl Outcome {
    /// Signed balance change this outcome applies to its player, saturating
    /// at the bounds of `i64`.
    pub fn net(&self) -> i64 {
        match *self {
            Outcome::Win { stake, payout, .. } => {
                i64::try_from(payout.saturating_sub(stake)).unwrap_or(i64::MAX)
            }
            Outcome::Loss { stake, .. } => i64::try_from(stake).map_or(i64::MIN, |s| -s),
            Outcome::Void => 0,
        }
    }
}

/// Error during game execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("bet must be a positive integer")]
    InvalidBet,
    #[error("insufficient coins: have {balance}, need {required}")]
    InsufficientFunds { balance: u64, required: u64 },
    #[error("not enough participants ({joined} joined)")]
    InsufficientParticipants { joined: usize },
    #[error("move not available in hand")]
    InvalidSelection,
    #[error("already joined")]
    AlreadyJoined,
    #[error("table is full")]
    TableFull,
    #[error("action not allowed in the current phase")]
    InvalidPhase,
}

/// Check a wager against the bettor's balance before any session is created.
pub fn validate_bet(bet: i64, balance: u64) -> Result<u64, GameError> {
    if bet <= 0 {
        return Err(GameError::InvalidBet);
    }
    let bet = bet as u64;
    if bet > balance {
        return Err(GameError::InsufficientFunds {
            balance,
            required: bet,
        });
    }
    Ok(bet)
}
