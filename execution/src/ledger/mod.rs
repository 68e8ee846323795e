//! Account ledger.
//!
//! The ledger owns the account [State] and serializes every read-modify-write
//! behind a single lock, so concurrent tasks touching the same account never
//! overwrite each other's updates. Progression and economy rules are layered
//! on top in their own modules.

use crate::state::{Error, State};
use futures::lock::Mutex;
use naocoin_types::{casino::Account, UserId};

mod economy;
mod progression;

pub use economy::{Cooldown, EconomyError, Settled};
pub use progression::roll_xp;

pub struct Ledger<S: State> {
    state: Mutex<S>,
}

impl<S: State> Ledger<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Read an account without creating it.
    pub async fn get(&self, user: UserId) -> Option<Account> {
        self.state.lock().await.get(user)
    }

    /// Atomically load (or create) an account, apply `f`, and persist the result.
    ///
    /// If `f` fails nothing is written.
    pub async fn update<T, E, F>(&self, user: UserId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Account) -> Result<T, E>,
        E: From<Error>,
    {
        let mut state = self.state.lock().await;
        let mut account = state.get(user).unwrap_or_default();
        let result = f(&mut account)?;
        state.insert(user, account).await?;
        Ok(result)
    }

    /// Like [Ledger::update] but over two distinct accounts, persisted together.
    pub async fn update_pair<T, E, F>(&self, first: UserId, second: UserId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Account, &mut Account) -> Result<T, E>,
        E: From<Error>,
    {
        debug_assert_ne!(first, second, "update_pair requires distinct accounts");
        let mut state = self.state.lock().await;
        let mut a = state.get(first).unwrap_or_default();
        let mut b = state.get(second).unwrap_or_default();
        let result = f(&mut a, &mut b)?;
        state.apply(vec![(first, a), (second, b)]).await?;
        Ok(result)
    }
}
