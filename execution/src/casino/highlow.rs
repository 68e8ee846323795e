//! High/Low streak prediction.
//!
//! The player is shown a number in `[1, 100]` and predicts whether the next
//! one is higher or lower. Every correct guess doubles the pot; five in a row
//! ends the game at the maximum payout of `bet * 2^5`. A wrong guess loses the
//! bet, a timeout walks away with nothing won or lost.
//!
//! Next numbers are biased: three times out of four the draw is forced across
//! the current number, upwards below the midpoint and downwards at or above it.

use super::{validate_bet, GameError, Outcome};
use naocoin_types::{
    casino::{HIGHLOW_BIAS, HIGHLOW_MAX, HIGHLOW_MAX_STREAK, HIGHLOW_MIDPOINT, HIGHLOW_MIN},
    UserId,
};
use rand::Rng;
use std::str::FromStr;
use thiserror::Error;

/// Texts accepted as an answer (compared case-insensitively).
pub const ANSWERS: [&str; 4] = ["h", "higher", "l", "lower"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guess {
    Higher,
    Lower,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected higher or lower")]
pub struct InvalidGuess;

impl FromStr for Guess {
    type Err = InvalidGuess;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "higher" => Ok(Guess::Higher),
            "l" | "lower" => Ok(Guess::Lower),
            _ => Err(InvalidGuess),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    InRound,
    Won,
    Lost,
    TimedOut,
}

/// Result of a single guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    pub previous: u8,
    pub next: u8,
    pub correct: bool,
    pub streak: u8,
}

/// Draw the number that follows `current`.
pub fn next_number<R: Rng>(current: u8, rng: &mut R) -> u8 {
    let next = rng.gen_range(HIGHLOW_MIN..=HIGHLOW_MAX);
    if !rng.gen_bool(HIGHLOW_BIAS) {
        return next;
    }
    if current < HIGHLOW_MIDPOINT {
        rng.gen_range(current + 1..=HIGHLOW_MAX)
    } else {
        rng.gen_range(HIGHLOW_MIN..current)
    }
}

#[derive(Clone, Debug)]
pub struct HighLow {
    player: UserId,
    bet: u64,
    current: u8,
    streak: u8,
    phase: Phase,
}

impl HighLow {
    /// Validate the wager and deal the first number.
    pub fn start<R: Rng>(
        player: UserId,
        bet: i64,
        balance: u64,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let bet = validate_bet(bet, balance)?;
        Ok(Self::with_number(player, bet, rng.gen_range(HIGHLOW_MIN..=HIGHLOW_MAX)))
    }

    /// Start from a known number (the wager must already be validated).
    pub fn with_number(player: UserId, bet: u64, current: u8) -> Self {
        Self {
            player,
            bet,
            current,
            streak: 0,
            phase: Phase::InRound,
        }
    }

    pub fn player(&self) -> UserId {
        self.player
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn streak(&self) -> u8 {
        self.streak
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase != Phase::InRound
    }

    /// Draw the next number for the running round.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> u8 {
        next_number(self.current, rng)
    }

    /// Resolve `guess` against the drawn `next` number.
    ///
    /// Equal numbers are wrong for either guess.
    pub fn guess(&mut self, guess: Guess, next: u8) -> Result<Round, GameError> {
        if self.phase != Phase::InRound {
            return Err(GameError::InvalidPhase);
        }
        let previous = self.current;
        let correct = match guess {
            Guess::Higher => next > previous,
            Guess::Lower => next < previous,
        };
        if correct {
            self.streak += 1;
            self.current = next;
            if self.streak >= HIGHLOW_MAX_STREAK {
                self.phase = Phase::Won;
            }
        } else {
            self.phase = Phase::Lost;
        }
        Ok(Round {
            previous,
            next,
            correct,
            streak: self.streak,
        })
    }

    /// No answer arrived in time.
    pub fn time_out(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::InRound {
            return Err(GameError::InvalidPhase);
        }
        self.phase = Phase::TimedOut;
        Ok(())
    }

    /// Total return if the game were won at the current streak.
    pub fn payout(&self) -> u64 {
        self.bet.saturating_mul(1u64 << self.streak)
    }

    /// Balance change once the game is over (`None` while still running).
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::InRound => None,
            Phase::Won => Some(Outcome::Win {
                player: self.player,
                stake: self.bet,
                payout: self.payout(),
            }),
            Phase::Lost => Some(Outcome::Loss {
                player: self.player,
                stake: self.bet,
            }),
            Phase::TimedOut => Some(Outcome::Void),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_guess_parsing() {
        assert_eq!("H".parse::<Guess>(), Ok(Guess::Higher));
        assert_eq!("higher".parse::<Guess>(), Ok(Guess::Higher));
        assert_eq!("LoWeR".parse::<Guess>(), Ok(Guess::Lower));
        assert_eq!("l".parse::<Guess>(), Ok(Guess::Lower));
        assert!("maybe".parse::<Guess>().is_err());
        for answer in ANSWERS {
            assert!(answer.parse::<Guess>().is_ok());
        }
    }

    #[test]
    fn test_start_rejects_bad_bets() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            HighLow::start(1, 10, 0, &mut rng).unwrap_err(),
            GameError::InsufficientFunds {
                balance: 0,
                required: 10
            }
        );
        assert_eq!(
            HighLow::start(1, 0, 50, &mut rng).unwrap_err(),
            GameError::InvalidBet
        );
        let game = HighLow::start(1, 50, 50, &mut rng).unwrap();
        assert!((HIGHLOW_MIN..=HIGHLOW_MAX).contains(&game.current()));
        assert_eq!(game.phase(), Phase::InRound);
        assert!(game.outcome().is_none());
    }

    #[test]
    fn test_next_number_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for current in HIGHLOW_MIN..=HIGHLOW_MAX {
            for _ in 0..50 {
                let next = next_number(current, &mut rng);
                assert!((HIGHLOW_MIN..=HIGHLOW_MAX).contains(&next));
            }
        }
    }

    #[test]
    fn test_next_number_bias() {
        // Below the midpoint most draws land above, at or above it most land below.
        let mut rng = StdRng::seed_from_u64(2);
        let trials = 10_000;
        let higher = (0..trials)
            .filter(|_| next_number(20, &mut rng) > 20)
            .count();
        assert!(higher > trials * 85 / 100, "higher={higher}");

        let lower = (0..trials)
            .filter(|_| next_number(50, &mut rng) < 50)
            .count();
        assert!(lower > trials * 80 / 100, "lower={lower}");
    }

    #[test]
    fn test_correct_guess_extends_streak() {
        let mut game = HighLow::with_number(1, 10, 40);
        let round = game.guess(Guess::Higher, 70).unwrap();
        assert_eq!(
            round,
            Round {
                previous: 40,
                next: 70,
                correct: true,
                streak: 1
            }
        );
        assert_eq!(game.current(), 70);
        assert_eq!(game.payout(), 20);

        game.guess(Guess::Lower, 3).unwrap();
        assert_eq!(game.streak(), 2);
        assert_eq!(game.current(), 3);
        assert_eq!(game.phase(), Phase::InRound);
    }

    #[test]
    fn test_equal_number_loses() {
        let mut game = HighLow::with_number(1, 10, 40);
        assert!(!game.guess(Guess::Higher, 40).unwrap().correct);
        assert_eq!(game.phase(), Phase::Lost);

        let mut game = HighLow::with_number(1, 10, 40);
        assert!(!game.guess(Guess::Lower, 40).unwrap().correct);
        assert_eq!(game.phase(), Phase::Lost);
    }

    #[test]
    fn test_loss_forfeits_bet_at_any_streak() {
        for streak in 0..HIGHLOW_MAX_STREAK {
            let mut game = HighLow::with_number(1, 10, 1);
            for _ in 0..streak {
                let next = game.current() + 1;
                game.guess(Guess::Higher, next).unwrap();
            }
            game.guess(Guess::Lower, 100).unwrap();
            assert_eq!(
                game.outcome(),
                Some(Outcome::Loss {
                    player: 1,
                    stake: 10
                })
            );
        }
    }

    #[test]
    fn test_max_streak_wins() {
        let mut game = HighLow::with_number(7, 10, 1);
        for next in 2..=6 {
            game.guess(Guess::Higher, next).unwrap();
        }
        assert_eq!(game.phase(), Phase::Won);
        let outcome = game.outcome().unwrap();
        assert_eq!(
            outcome,
            Outcome::Win {
                player: 7,
                stake: 10,
                payout: 320
            }
        );
        assert_eq!(outcome.net(), 10 * 31);
        assert_eq!(
            game.guess(Guess::Higher, 99),
            Err(GameError::InvalidPhase)
        );
    }

    #[test]
    fn test_timeout_is_void() {
        let mut game = HighLow::with_number(1, 10, 50);
        game.guess(Guess::Lower, 10).unwrap();
        game.guess(Guess::Higher, 90).unwrap();
        game.time_out().unwrap();
        assert_eq!(game.phase(), Phase::TimedOut);
        assert_eq!(game.streak(), 2);
        assert_eq!(game.outcome(), Some(Outcome::Void));
        assert_eq!(game.time_out(), Err(GameError::InvalidPhase));
    }
}
