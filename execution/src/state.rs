use commonware_runtime::{Clock, Metrics, Storage};
use commonware_storage::metadata::Metadata;
use commonware_utils::sequence::U64;
use naocoin_types::{casino::Account, UserId};
use std::{collections::HashMap, future::Future};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Durable mapping from user to [Account].
///
/// Lookups are served from memory; writes may have to reach disk before they
/// resolve. A write that fails leaves every touched account as it was.
pub trait State: Send + 'static {
    fn get(&self, user: UserId) -> Option<Account>;
    fn insert(
        &mut self,
        user: UserId,
        account: Account,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn apply(
        &mut self,
        changes: Vec<(UserId, Account)>,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        async move {
            for (user, account) in changes {
                self.insert(user, account).await?;
            }
            Ok(())
        }
    }
}

/// Previous values of the accounts a pending write touches.
pub(crate) struct Undo(Vec<(UserId, Option<Account>)>);

impl Undo {
    pub(crate) fn capture<S: State + ?Sized>(state: &S, changes: &[(UserId, Account)]) -> Self {
        Self(
            changes
                .iter()
                .map(|(user, _)| (*user, state.get(*user)))
                .collect(),
        )
    }

    /// Hand each account back to `restore`, latest write first.
    pub(crate) fn restore(self, mut restore: impl FnMut(UserId, Option<Account>)) {
        for (user, previous) in self.0.into_iter().rev() {
            restore(user, previous);
        }
    }
}

impl<E: Clock + Storage + Metrics + Send + 'static> State for Metadata<E, U64, Account> {
    fn get(&self, user: UserId) -> Option<Account> {
        Metadata::get(self, &U64::from(user)).cloned()
    }

    async fn insert(&mut self, user: UserId, account: Account) -> Result<(), Error> {
        self.apply(vec![(user, account)]).await
    }

    async fn apply(&mut self, changes: Vec<(UserId, Account)>) -> Result<(), Error> {
        let undo = Undo::capture(&*self, &changes);
        for (user, account) in changes {
            self.put(U64::from(user), account);
        }
        if let Err(e) = self.sync().await {
            warn!(?e, "failed to sync accounts, rolling back");
            undo.restore(|user, previous| match previous {
                Some(account) => self.put(U64::from(user), account),
                None => {
                    self.remove(&U64::from(user));
                }
            });
            return Err(Error::Storage(e.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct Memory {
    state: HashMap<UserId, Account>,
}

impl State for Memory {
    fn get(&self, user: UserId) -> Option<Account> {
        self.state.get(&user).cloned()
    }

    async fn insert(&mut self, user: UserId, account: Account) -> Result<(), Error> {
        self.state.insert(user, account);
        Ok(())
    }
}
