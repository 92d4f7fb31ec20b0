//! Core game logic: sides, cells, the board engine with its cascade rules, and
//! a checked game state facade.

mod board;
mod cell;
mod player;
mod state;

pub use board::{Board, Notifier};
pub use cell::Cell;
pub use player::Side;
pub use state::GameState;
