use super::Ledger;
use crate::{
    casino::Outcome,
    state::{Error, State},
};
use naocoin_types::{
    casino::{WORK_COOLDOWN_SECS, WORK_REWARD},
    UserId,
};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Time left before a cooldown-gated reward can be claimed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    pub remaining_secs: u64,
}

impl Cooldown {
    pub fn hours(&self) -> u64 {
        self.remaining_secs / 3_600
    }

    pub fn minutes(&self) -> u64 {
        (self.remaining_secs % 3_600) / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining_secs % 60
    }
}

impl fmt::Display for Cooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours(), self.minutes(), self.seconds())
    }
}

#[derive(Debug, Error)]
pub enum EconomyError {
    #[error("amount must be a positive integer")]
    InvalidAmount,
    #[error("insufficient coins: have {balance}, need {required}")]
    InsufficientFunds { balance: u64, required: u64 },
    #[error("still cooling down for {0}")]
    CooldownActive(Cooldown),
    #[error(transparent)]
    Storage(#[from] Error),
}

/// Balance change applied when a game settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settled {
    Credited { user: UserId, amount: u64, balance: u64 },
    Debited { user: UserId, amount: u64, balance: u64 },
    Unchanged,
}

fn positive(amount: i64) -> Result<u64, EconomyError> {
    if amount <= 0 {
        return Err(EconomyError::InvalidAmount);
    }
    Ok(amount as u64)
}

impl<S: State> Ledger<S> {
    /// Current coins of `user` (zero when the account does not exist yet).
    pub async fn balance(&self, user: UserId) -> u64 {
        self.get(user).await.map(|a| a.coins).unwrap_or(0)
    }

    /// Add coins. Returns the new balance.
    pub async fn credit(&self, user: UserId, amount: i64) -> Result<u64, EconomyError> {
        let amount = positive(amount)?;
        self.update(user, |account| {
            account.coins = account.coins.saturating_add(amount);
            Ok(account.coins)
        })
        .await
    }

    /// Remove coins if the balance covers them. Returns the new balance.
    pub async fn debit(&self, user: UserId, amount: i64) -> Result<u64, EconomyError> {
        let amount = positive(amount)?;
        self.update(user, |account| {
            if account.coins < amount {
                return Err(EconomyError::InsufficientFunds {
                    balance: account.coins,
                    required: amount,
                });
            }
            account.coins -= amount;
            Ok(account.coins)
        })
        .await
    }

    /// Move coins from `from` to `to`. Returns both new balances.
    ///
    /// Total coins across the two accounts are conserved and neither side is
    /// written unless the sender can cover the full amount.
    pub async fn transfer(
        &self,
        from: UserId,
        to: UserId,
        amount: i64,
    ) -> Result<(u64, u64), EconomyError> {
        let amount = positive(amount)?;
        if from == to {
            let balance = self.balance(from).await;
            if balance < amount {
                return Err(EconomyError::InsufficientFunds {
                    balance,
                    required: amount,
                });
            }
            return Ok((balance, balance));
        }
        let balances = self
            .update_pair(from, to, |sender, receiver| {
                if sender.coins < amount {
                    return Err(EconomyError::InsufficientFunds {
                        balance: sender.coins,
                        required: amount,
                    });
                }
                sender.coins -= amount;
                receiver.coins = receiver.coins.saturating_add(amount);
                Ok((sender.coins, receiver.coins))
            })
            .await?;
        info!(from, to, amount, "transferred coins");
        Ok(balances)
    }

    /// Pay the work reward if the cooldown since the last claim has elapsed.
    ///
    /// `now` is unix seconds. A claim exactly [WORK_COOLDOWN_SECS] after the
    /// previous one succeeds.
    pub async fn claim_work(&self, user: UserId, now: u64) -> Result<u64, EconomyError> {
        self.update(user, |account| {
            if let Some(last) = account.last_work {
                let elapsed = now.saturating_sub(last);
                if elapsed < WORK_COOLDOWN_SECS {
                    return Err(EconomyError::CooldownActive(Cooldown {
                        remaining_secs: WORK_COOLDOWN_SECS - elapsed,
                    }));
                }
            }
            account.coins = account.coins.saturating_add(WORK_REWARD);
            account.last_work = Some(now);
            Ok(account.coins)
        })
        .await
    }

    /// Apply the balance change of a finished game.
    ///
    /// Losses are clamped at the current balance so accounts never go negative
    /// when the player spent coins while the game was running.
    pub async fn settle(&self, outcome: &Outcome) -> Result<Settled, EconomyError> {
        match *outcome {
            Outcome::Void => Ok(Settled::Unchanged),
            Outcome::Win {
                player,
                stake,
                payout,
            } => {
                let amount = payout.saturating_sub(stake);
                if amount == 0 {
                    return Ok(Settled::Unchanged);
                }
                self.update(player, |account| {
                    account.coins = account.coins.saturating_add(amount);
                    Ok(Settled::Credited {
                        user: player,
                        amount,
                        balance: account.coins,
                    })
                })
                .await
            }
            Outcome::Loss { player, stake } => {
                self.update(player, |account| {
                    let amount = stake.min(account.coins);
                    if amount < stake {
                        warn!(
                            user = player,
                            stake,
                            balance = account.coins,
                            "loss exceeds balance, clamping"
                        );
                    }
                    account.coins -= amount;
                    Ok(Settled::Debited {
                        user: player,
                        amount,
                        balance: account.coins,
                    })
                })
                .await
            }
        }
    }
}
