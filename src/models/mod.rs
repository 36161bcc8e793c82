// src/models/mod.rs
pub mod game;
pub mod protocol;

pub use game::{Action, Game, GameState, Mark};
pub use protocol::{Batch, BatchHeader, BatchList, Transaction, TransactionHeader};
