pub mod casino;
pub mod ledger;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod state;

pub use ledger::{roll_xp, Cooldown, EconomyError, Ledger, Settled};
pub use state::{Error, Memory, State};
