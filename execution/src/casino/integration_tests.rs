//! Integration tests for game settlement.
//!
//! These tests drive each game from its wager check through play to the
//! ledger update it produces.

#[cfg(test)]
mod tests {
    use crate::casino::{
        highlow::{Guess, HighLow},
        limited_rps::LimitedRps,
        GameError, Outcome,
    };
    use crate::mocks::funded;
    use crate::Settled;
    use futures::executor::block_on;
    use naocoin_types::casino::Move;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_highlow_without_coins_is_rejected() {
        block_on(async {
            let ledger = funded(&[]).await;
            let mut rng = StdRng::seed_from_u64(0);
            let balance = ledger.balance(1).await;
            let err = HighLow::start(1, 10, balance, &mut rng).unwrap_err();
            assert_eq!(
                err,
                GameError::InsufficientFunds {
                    balance: 0,
                    required: 10
                }
            );
            assert_eq!(ledger.balance(1).await, 0);
        });
    }

    #[test]
    fn test_highlow_timeout_leaves_balance() {
        block_on(async {
            let ledger = funded(&[(1, 100)]).await;
            let mut game = HighLow::with_number(1, 10, 40);
            game.guess(Guess::Higher, 60).unwrap();
            game.guess(Guess::Lower, 20).unwrap();
            game.time_out().unwrap();

            let settled = ledger.settle(&game.outcome().unwrap()).await.unwrap();
            assert_eq!(settled, Settled::Unchanged);
            assert_eq!(ledger.balance(1).await, 100);
        });
    }

    #[test]
    fn test_highlow_win_credits_net() {
        block_on(async {
            let ledger = funded(&[(1, 10)]).await;
            let mut game = HighLow::with_number(1, 10, 1);
            for next in [2, 3, 4, 5, 6] {
                game.guess(Guess::Higher, next).unwrap();
            }
            let settled = ledger.settle(&game.outcome().unwrap()).await.unwrap();
            assert_eq!(
                settled,
                Settled::Credited {
                    user: 1,
                    amount: 310,
                    balance: 320
                }
            );
        });
    }

    #[test]
    fn test_highlow_loss_debits_bet() {
        block_on(async {
            let ledger = funded(&[(1, 25)]).await;
            let mut game = HighLow::with_number(1, 10, 80);
            game.guess(Guess::Lower, 30).unwrap();
            game.guess(Guess::Lower, 30).unwrap();
            assert_eq!(
                game.outcome(),
                Some(Outcome::Loss {
                    player: 1,
                    stake: 10
                })
            );
            ledger.settle(&game.outcome().unwrap()).await.unwrap();
            assert_eq!(ledger.balance(1).await, 15);
        });
    }

    #[test]
    fn test_tournament_pays_only_winner() {
        block_on(async {
            let ledger = funded(&[(1, 100), (2, 0)]).await;
            let balance = ledger.balance(1).await;
            let mut game = LimitedRps::open(1, 10, balance).unwrap();
            // Joiners need no coins.
            game.join(2).unwrap();
            game.begin().unwrap();

            while let Some(pairing) = game.next_pairing() {
                game.select(pairing.first, Move::Rock).unwrap();
                game.select(pairing.second, Move::Scissors).unwrap();
                game.play(pairing, Move::Rock, Move::Scissors);
            }
            let outcome = game.outcome().unwrap();
            ledger.settle(&outcome).await.unwrap();
            assert_eq!(ledger.balance(1).await, 110);
            assert_eq!(ledger.balance(2).await, 0);
        });
    }

    #[test]
    fn test_tournament_without_opponents_changes_nothing() {
        block_on(async {
            let ledger = funded(&[(1, 100)]).await;
            let mut game = LimitedRps::open(1, 10, 100).unwrap();
            assert_eq!(
                game.begin(),
                Err(GameError::InsufficientParticipants { joined: 1 })
            );
            assert!(game.outcome().is_none());
            assert_eq!(ledger.balance(1).await, 100);
        });
    }
}
