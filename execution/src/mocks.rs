use crate::{Ledger, Memory, State};
use naocoin_types::{casino::Account, UserId};

/// Creates an in-memory ledger with the given starting balances
pub async fn funded(balances: &[(UserId, u64)]) -> Ledger<Memory> {
    let mut state = Memory::default();
    for &(user, coins) in balances {
        state
            .insert(
                user,
                Account {
                    coins,
                    ..Default::default()
                },
            )
            .await
            .expect("memory insert cannot fail");
    }
    Ledger::new(state)
}
