use super::{Board, Side};
use crate::error::{ConfigError, MoveError};

/// A game in progress: one real board plus checked move application.
///
/// This is the surface the front ends and player shells talk to. Unlike
/// [`Board::add_spot`], [`GameState::make_move`] validates the move and leaves
/// the board untouched when it is rejected.
#[derive(Debug)]
pub struct GameState {
    board: Board,
}

impl GameState {
    /// Start a game on an empty `size` x `size` board.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        Ok(GameState {
            board: Board::new(size)?,
        })
    }

    /// Continue a game from an existing position.
    pub fn from_board(board: Board) -> Self {
        GameState { board }
    }

    /// Read-only view of the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side whose turn it is.
    pub fn current_player(&self) -> Side {
        self.board.whose_move()
    }

    pub fn winner(&self) -> Option<Side> {
        self.board.winner()
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Squares the side to move may play, empty once the game is won.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_moves(self.current_player())
    }

    /// True iff `side` may add a spot at `row`, `col` right now.
    pub fn is_legal_move(&self, side: Side, row: usize, col: usize) -> bool {
        self.check_move(side, row, col).is_ok()
    }

    pub fn is_legal_to_move(&self, side: Side) -> bool {
        self.board.is_legal_to_move(side)
    }

    fn check_move(&self, side: Side, row: usize, col: usize) -> Result<(), MoveError> {
        if let Some(winner) = self.winner() {
            return Err(MoveError::GameOver(winner));
        }
        if !self.board.exists(row, col) {
            return Err(MoveError::OutOfBounds {
                row,
                col,
                size: self.board.size(),
            });
        }
        if self.current_player() != side {
            return Err(MoveError::NotYourTurn(side));
        }
        match self.board.get(row, col).owner() {
            Some(owner) if owner != side => Err(MoveError::Occupied { row, col, owner }),
            _ => Ok(()),
        }
    }

    /// Add a spot for `side` at `row`, `col`, resolving all explosions.
    pub fn make_move(&mut self, side: Side, row: usize, col: usize) -> Result<(), MoveError> {
        self.check_move(side, row, col)?;
        self.board.add_spot(side, row, col);
        Ok(())
    }

    /// Undo the last move.
    pub fn undo(&mut self) {
        self.board.undo();
    }

    /// Start over on an empty board of `size`.
    pub fn new_game(&mut self, size: usize) -> Result<(), ConfigError> {
        self.board.clear(size)
    }

    /// Register a callback fired after every settled change to the board.
    pub fn subscribe(&mut self, notify: impl FnMut(&Board) + 'static) {
        self.board.set_notifier(notify);
    }
}
