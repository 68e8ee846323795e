mod account;
mod constants;
mod game;
mod tournament;

pub use account::*;
pub use constants::*;
pub use game::*;
pub use tournament::*;
