use super::Ledger;
use crate::state::{Error, State};
use naocoin_types::{
    casino::{Progress, MAX_MESSAGE_XP, MIN_MESSAGE_XP},
    UserId,
};
use rand::Rng;
use tracing::debug;

/// Draw the xp awarded for a single message.
pub fn roll_xp<R: Rng>(rng: &mut R) -> u64 {
    rng.gen_range(MIN_MESSAGE_XP..=MAX_MESSAGE_XP)
}

impl<S: State> Ledger<S> {
    /// Credit `gain` xp for an observed message, creating the account on first activity.
    pub async fn observe(&self, user: UserId, gain: u64) -> Result<Progress, Error> {
        let progress = self
            .update(user, |account| Ok::<_, Error>(account.gain_xp(gain)))
            .await?;
        if let Progress::LeveledUp { level, reward } = progress {
            debug!(user, level, reward, "level up");
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Memory;
    use futures::executor::block_on;
    use naocoin_types::casino::{required_xp, Account, LEVEL_UP_REWARD};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_roll_xp_bounds() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen = [false; 11];
        for _ in 0..1_000 {
            let xp = roll_xp(&mut rng);
            assert!((MIN_MESSAGE_XP..=MAX_MESSAGE_XP).contains(&xp));
            seen[xp as usize] = true;
        }
        assert!(seen[1..].iter().all(|s| *s));
    }

    #[test]
    fn test_first_activity_creates_account() {
        block_on(async {
            let ledger = Ledger::new(Memory::default());
            assert!(ledger.get(5).await.is_none());

            let progress = ledger.observe(5, 4).await.unwrap();
            assert_eq!(progress, Progress::Gained { xp: 4 });

            let account = ledger.get(5).await.unwrap();
            assert_eq!(
                account,
                Account {
                    xp: 4,
                    level: 1,
                    coins: 0,
                    last_work: None,
                }
            );
        });
    }

    #[test]
    fn test_level_up_on_threshold() {
        block_on(async {
            let ledger = Ledger::new(Memory::default());
            for _ in 0..9 {
                ledger.observe(1, 10).await.unwrap();
            }
            assert_eq!(ledger.get(1).await.unwrap().xp, 90);

            let progress = ledger.observe(1, 10).await.unwrap();
            assert_eq!(
                progress,
                Progress::LeveledUp {
                    level: 2,
                    reward: LEVEL_UP_REWARD
                }
            );
            let account = ledger.get(1).await.unwrap();
            assert_eq!(account.xp, 0);
            assert_eq!(account.coins, LEVEL_UP_REWARD);
            assert_eq!(account.xp_to_next_level(), required_xp(2));
        });
    }
}
