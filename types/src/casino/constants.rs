/// Base xp required to reach level 2
pub const BASE_LEVEL_XP: u64 = 100;

/// Additional xp required per level already gained
pub const LEVEL_XP_STEP: u64 = 20;

/// Smallest xp gain per observed message
pub const MIN_MESSAGE_XP: u64 = 1;

/// Largest xp gain per observed message
pub const MAX_MESSAGE_XP: u64 = 10;

/// Coins granted on level-up
pub const LEVEL_UP_REWARD: u64 = 10;

/// Coins granted by a work claim
pub const WORK_REWARD: u64 = 5;

/// Seconds between work claims (2 hours)
pub const WORK_COOLDOWN_SECS: u64 = 2 * 60 * 60;

/// Seconds a game waits for a single response
pub const RESPONSE_TIMEOUT_SECS: u64 = 30;

/// Inclusive bounds of the high/low reference number
pub const HIGHLOW_MIN: u8 = 1;
pub const HIGHLOW_MAX: u8 = 100;

/// Numbers below this are biased upwards, the rest downwards
pub const HIGHLOW_MIDPOINT: u8 = 50;

/// Probability that the next number is forced across the current one
pub const HIGHLOW_BIAS: f64 = 0.75;

/// Consecutive correct guesses that end the game as a win
pub const HIGHLOW_MAX_STREAK: u8 = 5;

/// Tournament seat bounds (initiator included)
pub const TOURNAMENT_MIN_PLAYERS: usize = 2;
pub const TOURNAMENT_MAX_PLAYERS: usize = 4;

/// Stars each tournament participant starts with
pub const STARTING_STARS: u8 = 3;

/// Copies of each base move in a fresh hand
pub const STARTING_MOVES_PER_KIND: u8 = 3;

/// Wildcards in a fresh hand
pub const STARTING_WILDS: u8 = 3;

/// Exact text a user sends to join a tournament
pub const JOIN_TOKEN: &str = "join";

/// Tournament payout multiplier applied to the initiator's bet
pub const TOURNAMENT_PAYOUT_MULTIPLIER: u64 = 2;
