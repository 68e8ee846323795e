//! Limited rock/paper/scissors tournament.
//!
//! Two to four participants each start with three stars and a fixed hand of
//! move tokens (three of each base move plus three wildcards). Every round
//! robin pass pairs up all participants that still hold stars; the winner of
//! an exchange takes one star from the loser. When only one participant has
//! stars left (or nobody can play anymore) the participant with the most stars
//! wins `bet * 2`, funded by the initiator's bet alone.
//!
//! Exchange resolution is ordered: the first participant of a pairing wins
//! only with a base move that beats the second's. Every other mismatch,
//! wildcards included, goes to the second participant.

use super::{validate_bet, GameError, Outcome};
use naocoin_types::{
    casino::{
        Move, Tokens, STARTING_STARS, TOURNAMENT_MAX_PLAYERS, TOURNAMENT_MIN_PLAYERS,
        TOURNAMENT_PAYOUT_MULTIPLIER,
    },
    UserId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Joining,
    RoundRobin,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exchange {
    Draw,
    FirstWins,
    SecondWins,
}

/// Resolve a move exchange between the first and second participant of a pairing.
pub fn resolve(first: Move, second: Move) -> Exchange {
    if first == second {
        Exchange::Draw
    } else if first.beats(&second) {
        Exchange::FirstWins
    } else {
        Exchange::SecondWins
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entrant {
    pub user: UserId,
    pub stars: u8,
    pub tokens: Tokens,
}

impl Entrant {
    fn new(user: UserId) -> Self {
        Self {
            user,
            stars: STARTING_STARS,
            tokens: Tokens::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.stars > 0
    }

    fn can_play(&self) -> bool {
        self.is_active() && !self.tokens.is_empty()
    }
}

/// Seats (indices into [LimitedRps::entrants]) of one exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairing {
    pub first: usize,
    pub second: usize,
}

#[derive(Clone, Debug)]
pub struct LimitedRps {
    bet: u64,
    entrants: Vec<Entrant>,
    phase: Phase,

    pairs: Vec<Pairing>,
    cursor: usize,
    played_in_pass: bool,
}

impl LimitedRps {
    /// Open a table with the initiator seated. The initiator must cover the bet.
    pub fn open(initiator: UserId, bet: i64, balance: u64) -> Result<Self, GameError> {
        let bet = validate_bet(bet, balance)?;
        Ok(Self {
            bet,
            entrants: vec![Entrant::new(initiator)],
            phase: Phase::Joining,
            pairs: Vec::new(),
            cursor: 0,
            played_in_pass: false,
        })
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn initiator(&self) -> UserId {
        self.entrants[0].user
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn players(&self) -> Vec<UserId> {
        self.entrants.iter().map(|e| e.user).collect()
    }

    pub fn is_seated(&self, user: UserId) -> bool {
        self.entrants.iter().any(|e| e.user == user)
    }

    pub fn is_full(&self) -> bool {
        self.entrants.len() >= TOURNAMENT_MAX_PLAYERS
    }

    /// Participants still holding stars.
    pub fn active(&self) -> usize {
        self.entrants.iter().filter(|e| e.is_active()).count()
    }

    pub fn total_stars(&self) -> u32 {
        self.entrants.iter().map(|e| u32::from(e.stars)).sum()
    }

    /// Seat another participant. Returns the number of seats taken.
    pub fn join(&mut self, user: UserId) -> Result<usize, GameError> {
        if self.phase != Phase::Joining {
            return Err(GameError::InvalidPhase);
        }
        if self.is_seated(user) {
            return Err(GameError::AlreadyJoined);
        }
        if self.is_full() {
            return Err(GameError::TableFull);
        }
        self.entrants.push(Entrant::new(user));
        Ok(self.entrants.len())
    }

    /// Close joining and start the round robin.
    pub fn begin(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Joining {
            return Err(GameError::InvalidPhase);
        }
        let joined = self.entrants.len();
        if joined < TOURNAMENT_MIN_PLAYERS {
            return Err(GameError::InsufficientParticipants { joined });
        }
        self.pairs = (0..joined)
            .flat_map(|first| (first + 1..joined).map(move |second| Pairing { first, second }))
            .collect();
        self.phase = Phase::RoundRobin;
        Ok(())
    }

    /// Next pairing to play, or `None` once the tournament is settled.
    ///
    /// Pairs are visited in a stable order, skipping any where a side has no
    /// stars or no tokens left. A full pass without a playable pair settles.
    pub fn next_pairing(&mut self) -> Option<Pairing> {
        if self.phase != Phase::RoundRobin {
            return None;
        }
        loop {
            if self.active() <= 1 {
                self.phase = Phase::Settled;
                return None;
            }
            if self.cursor >= self.pairs.len() {
                if !self.played_in_pass {
                    self.phase = Phase::Settled;
                    return None;
                }
                self.cursor = 0;
                self.played_in_pass = false;
            }
            let pairing = self.pairs[self.cursor];
            self.cursor += 1;
            if self.entrants[pairing.first].can_play() && self.entrants[pairing.second].can_play()
            {
                self.played_in_pass = true;
                return Some(pairing);
            }
        }
    }

    /// Consume a token from a participant's hand.
    ///
    /// An unavailable move is rejected and consumes nothing.
    pub fn select(&mut self, seat: usize, mv: Move) -> Result<(), GameError> {
        if self.phase != Phase::RoundRobin {
            return Err(GameError::InvalidPhase);
        }
        let entrant = self
            .entrants
            .get_mut(seat)
            .ok_or(GameError::InvalidSelection)?;
        if !entrant.tokens.take(mv) {
            return Err(GameError::InvalidSelection);
        }
        Ok(())
    }

    /// Apply the result of an exchange (moves already taken with [Self::select]).
    pub fn play(&mut self, pairing: Pairing, first: Move, second: Move) -> Exchange {
        let exchange = resolve(first, second);
        let (winner, loser) = match exchange {
            Exchange::Draw => return exchange,
            Exchange::FirstWins => (pairing.first, pairing.second),
            Exchange::SecondWins => (pairing.second, pairing.first),
        };
        self.entrants[winner].stars += 1;
        self.entrants[loser].stars -= 1;
        exchange
    }

    /// First participant holding the most stars.
    pub fn winner(&self) -> Option<UserId> {
        if self.phase != Phase::Settled {
            return None;
        }
        let mut best: Option<&Entrant> = None;
        for entrant in &self.entrants {
            if best.map_or(true, |b| entrant.stars > b.stars) {
                best = Some(entrant);
            }
        }
        best.map(|e| e.user)
    }

    /// Balance change once settled. Only the winner is paid.
    pub fn outcome(&self) -> Option<Outcome> {
        let player = self.winner()?;
        Some(Outcome::Win {
            player,
            stake: self.bet,
            payout: self.bet.saturating_mul(TOURNAMENT_PAYOUT_MULTIPLIER),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use naocoin_types::casino::{STARTING_MOVES_PER_KIND, STARTING_WILDS};
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    fn table(players: &[UserId]) -> LimitedRps {
        let mut game = LimitedRps::open(players[0], 10, 100).unwrap();
        for &player in &players[1..] {
            game.join(player).unwrap();
        }
        game.begin().unwrap();
        game
    }

    fn exchange(game: &mut LimitedRps, pairing: Pairing, first: Move, second: Move) -> Exchange {
        game.select(pairing.first, first).unwrap();
        game.select(pairing.second, second).unwrap();
        game.play(pairing, first, second)
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(Move::Rock, Move::Scissors), Exchange::FirstWins);
        assert_eq!(resolve(Move::Paper, Move::Rock), Exchange::FirstWins);
        assert_eq!(resolve(Move::Scissors, Move::Paper), Exchange::FirstWins);
        assert_eq!(resolve(Move::Scissors, Move::Rock), Exchange::SecondWins);
        for mv in Move::ALL {
            assert_eq!(resolve(mv, mv), Exchange::Draw);
        }
        assert_eq!(resolve(Move::Wild, Move::Rock), Exchange::SecondWins);
        assert_eq!(resolve(Move::Rock, Move::Wild), Exchange::SecondWins);
    }

    #[test]
    fn test_open_requires_funds() {
        assert_eq!(
            LimitedRps::open(1, 10, 5).unwrap_err(),
            GameError::InsufficientFunds {
                balance: 5,
                required: 10
            }
        );
        assert_eq!(LimitedRps::open(1, -1, 5).unwrap_err(), GameError::InvalidBet);
    }

    #[test]
    fn test_join_rules() {
        let mut game = LimitedRps::open(1, 10, 100).unwrap();
        assert_eq!(game.join(1), Err(GameError::AlreadyJoined));
        assert_eq!(game.join(2), Ok(2));
        assert_eq!(game.join(3), Ok(3));
        assert_eq!(game.join(4), Ok(4));
        assert!(game.is_full());
        assert_eq!(game.join(5), Err(GameError::TableFull));
        assert_eq!(game.players(), vec![1, 2, 3, 4]);

        game.begin().unwrap();
        assert_eq!(game.join(6), Err(GameError::InvalidPhase));
    }

    #[test]
    fn test_begin_needs_two() {
        let mut game = LimitedRps::open(1, 10, 100).unwrap();
        assert_eq!(
            game.begin(),
            Err(GameError::InsufficientParticipants { joined: 1 })
        );
        assert_eq!(game.phase(), Phase::Joining);
    }

    #[test]
    fn test_pairings_stable_order() {
        let mut game = table(&[1, 2, 3]);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let pairing = game.next_pairing().unwrap();
            seen.push((pairing.first, pairing.second));
            exchange(&mut game, pairing, Move::Rock, Move::Rock);
        }
        assert_eq!(seen, vec![(0, 1), (0, 2), (1, 2)]);
        // Next pass starts over.
        assert_eq!(game.next_pairing(), Some(Pairing { first: 0, second: 1 }));
    }

    #[test]
    fn test_select_rejects_spent_tokens() {
        let mut game = table(&[1, 2]);
        for _ in 0..STARTING_WILDS {
            game.select(0, Move::Wild).unwrap();
        }
        assert_eq!(game.select(0, Move::Wild), Err(GameError::InvalidSelection));
        assert_eq!(game.entrants()[0].tokens.count(Move::Wild), 0);
        assert_eq!(
            game.entrants()[0].tokens.count(Move::Rock),
            STARTING_MOVES_PER_KIND
        );
        assert_eq!(game.select(9, Move::Rock), Err(GameError::InvalidSelection));
    }

    #[test]
    fn test_win_transfers_one_star() {
        let mut game = table(&[1, 2]);
        let pairing = game.next_pairing().unwrap();
        assert_eq!(
            exchange(&mut game, pairing, Move::Paper, Move::Rock),
            Exchange::FirstWins
        );
        assert_eq!(game.entrants()[0].stars, 4);
        assert_eq!(game.entrants()[1].stars, 2);
        assert_eq!(game.total_stars(), 6);
    }

    #[test]
    fn test_elimination_settles() {
        let mut game = table(&[1, 2]);
        for _ in 0..3 {
            let pairing = game.next_pairing().unwrap();
            exchange(&mut game, pairing, Move::Rock, Move::Scissors);
        }
        assert_eq!(game.next_pairing(), None);
        assert_eq!(game.phase(), Phase::Settled);
        assert_eq!(game.winner(), Some(1));
        assert_eq!(
            game.outcome(),
            Some(Outcome::Win {
                player: 1,
                stake: 10,
                payout: 20
            })
        );
    }

    #[test]
    fn test_non_initiator_can_win() {
        let mut game = table(&[1, 2]);
        for _ in 0..3 {
            let pairing = game.next_pairing().unwrap();
            exchange(&mut game, pairing, Move::Scissors, Move::Rock);
        }
        assert_eq!(game.next_pairing(), None);
        assert_eq!(game.winner(), Some(2));
        assert_eq!(game.outcome().unwrap().net(), 10);
    }

    #[test]
    fn test_exhausted_hands_settle_with_first_maximum() {
        let mut game = table(&[1, 2]);
        // Twelve draws use up both hands without changing stars.
        for mv in Move::ALL {
            for _ in 0..3 {
                let pairing = game.next_pairing().unwrap();
                assert_eq!(exchange(&mut game, pairing, mv, mv), Exchange::Draw);
            }
        }
        assert_eq!(game.next_pairing(), None);
        assert_eq!(game.phase(), Phase::Settled);
        // Tie: first seat wins.
        assert_eq!(game.winner(), Some(1));
    }

    #[test]
    fn test_eliminated_players_are_skipped() {
        let mut game = table(&[1, 2, 3]);
        // Seat 0 beats seat 1 once per pass; the other pairs draw.
        for pass in 0..3 {
            let pairing = game.next_pairing().unwrap();
            assert_eq!(pairing, Pairing { first: 0, second: 1 });
            exchange(&mut game, pairing, Move::Rock, Move::Scissors);
            if pass == 2 {
                break;
            }
            let pairing = game.next_pairing().unwrap();
            exchange(&mut game, pairing, Move::Paper, Move::Paper);
            let pairing = game.next_pairing().unwrap();
            exchange(&mut game, pairing, Move::Wild, Move::Wild);
        }
        assert!(!game.entrants()[1].is_active());
        assert_eq!(game.active(), 2);

        for _ in 0..2 {
            let pairing = game.next_pairing().unwrap();
            assert_eq!(pairing, Pairing { first: 0, second: 2 });
            exchange(&mut game, pairing, Move::Scissors, Move::Scissors);
        }
        assert_eq!(game.entrants().len(), 3);
    }

    #[test]
    fn test_random_tournaments_conserve_stars_and_terminate() {
        let mut rng = StdRng::seed_from_u64(11);
        for players in 2..=4 {
            for _ in 0..200 {
                let ids: Vec<UserId> = (1..=players as UserId).collect();
                let mut game = table(&ids);
                let initial = game.total_stars();
                assert_eq!(initial, 3 * players as u32);

                let mut active = game.active();
                let mut exchanges = 0;
                while let Some(pairing) = game.next_pairing() {
                    let first = pick(&game, pairing.first, &mut rng);
                    let second = pick(&game, pairing.second, &mut rng);
                    exchange(&mut game, pairing, first, second);
                    assert_eq!(game.total_stars(), initial);
                    assert!(game.active() <= active);
                    active = game.active();
                    exchanges += 1;
                    assert!(exchanges <= 12 * players);
                }
                assert_eq!(game.phase(), Phase::Settled);
                let winner = game.winner().unwrap();
                let best = game.entrants().iter().map(|e| e.stars).max().unwrap();
                let first_best = game.entrants().iter().find(|e| e.stars == best).unwrap();
                assert_eq!(winner, first_best.user);
            }
        }
    }

    fn pick(game: &LimitedRps, seat: usize, rng: &mut StdRng) -> Move {
        let tokens = game.entrants()[seat].tokens;
        let available: Vec<Move> = Move::ALL
            .into_iter()
            .filter(|mv| tokens.count(*mv) > 0)
            .collect();
        *available.choose(rng).unwrap()
    }
}
