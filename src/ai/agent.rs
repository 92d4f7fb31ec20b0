use crate::game::{Board, Side};

/// Universal interface for anything that picks moves: search engines, random
/// movers, front ends relaying a human's choice.
pub trait Agent {
    /// Pick a square (row-major index) for `side` to play on `board`.
    /// Assumes the game is not over and it is `side`'s turn.
    fn select_move(&mut self, board: &Board, side: Side) -> usize;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
