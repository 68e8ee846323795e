use std::{fmt, str::FromStr};
use thiserror::Error;

use super::{STARTING_MOVES_PER_KIND, STARTING_WILDS};

/// A single tournament move token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Move {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
    Wild = 3,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Rock, Move::Paper, Move::Scissors, Move::Wild];

    /// Cyclic dominance between base moves. Wildcards beat nothing here.
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Paper, Move::Rock) | (Move::Scissors, Move::Paper)
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Move::Rock => "✊",
            Move::Paper => "✋",
            Move::Scissors => "✌",
            Move::Wild => "*",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown move: {0}")]
pub struct UnknownMove(pub String);

impl FromStr for Move {
    type Err = UnknownMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "rock" | "r" | "✊" => Ok(Move::Rock),
            "paper" | "p" | "✋" => Ok(Move::Paper),
            "scissors" | "s" | "✌" | "✌️" => Ok(Move::Scissors),
            "wild" | "*" => Ok(Move::Wild),
            _ => Err(UnknownMove(trimmed.to_string())),
        }
    }
}

/// Remaining move tokens of a tournament participant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tokens {
    counts: [u8; 4],
}

impl Default for Tokens {
    fn default() -> Self {
        Self {
            counts: [
                STARTING_MOVES_PER_KIND,
                STARTING_MOVES_PER_KIND,
                STARTING_MOVES_PER_KIND,
                STARTING_WILDS,
            ],
        }
    }
}

impl Tokens {
    pub fn count(&self, mv: Move) -> u8 {
        self.counts[mv as usize]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Consume one token of `mv`. Returns false (and changes nothing) if none remain.
    pub fn take(&mut self, mv: Move) -> bool {
        let slot = &mut self.counts[mv as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for mv in Move::ALL {
            for _ in 0..self.count(mv) {
                if !first {
                    f.write_str(", ")?;
                }
                first = false;
                write!(f, "{mv}")?;
            }
        }
        if first {
            f.write_str("(none)")?;
        }
        Ok(())
    }
}
