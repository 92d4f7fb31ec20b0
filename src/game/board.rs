use std::collections::VecDeque;
use std::fmt;

use log::trace;

use super::{Cell, Side};
use crate::error::ConfigError;

/// Callback fired after every externally visible change to a [`Board`].
pub type Notifier = Box<dyn FnMut(&Board)>;

/// An N x N chain-reaction board.
///
/// Squares are addressed either by 1-based (row, col) or by a 0-based square
/// number in row-major order: square `n` is at row `n / N + 1`, column
/// `n % N + 1`.
///
/// Every completed move appends a snapshot of the settled board to the undo
/// history. Cloning a board copies its cells only: the clone starts with an
/// empty history and no notifier, which is what search scratch boards need.
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    history: Vec<Vec<Cell>>,
    notifier: Option<Notifier>,
}

/// Orthogonal neighbors of square `n` in row-major order.
fn neighbors(size: usize, n: usize) -> impl Iterator<Item = usize> {
    let (row, col) = (n / size, n % size);
    let up = (row > 0).then(|| n - size);
    let left = (col > 0).then(|| n - 1);
    let right = (col + 1 < size).then(|| n + 1);
    let down = (row + 1 < size).then(|| n + size);
    [up, left, right, down].into_iter().flatten()
}

impl Board {
    /// Create an empty board with `size` squares on a side.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidSize(size));
        }
        Ok(Board {
            size,
            cells: vec![Cell::EMPTY; size * size],
            history: Vec::new(),
            notifier: None,
        })
    }

    /// Number of rows (and of columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// All squares in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Contents of the square at `row`, `col` (1-based).
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.sq_num(row, col)]
    }

    /// Contents of square number `n`.
    pub fn get_index(&self, n: usize) -> Cell {
        self.cells[n]
    }

    pub fn exists(&self, row: usize, col: usize) -> bool {
        (1..=self.size).contains(&row) && (1..=self.size).contains(&col)
    }

    pub fn exists_index(&self, n: usize) -> bool {
        n < self.cells.len()
    }

    /// Row number (1-based) of square `n`.
    pub fn row(&self, n: usize) -> usize {
        n / self.size + 1
    }

    /// Column number (1-based) of square `n`.
    pub fn col(&self, n: usize) -> usize {
        n % self.size + 1
    }

    /// Square number of `row`, `col`.
    pub fn sq_num(&self, row: usize, col: usize) -> usize {
        (col - 1) + (row - 1) * self.size
    }

    /// Move text for square `n`, e.g. `"2 3"`.
    pub fn move_string(&self, n: usize) -> String {
        format!("{} {}", self.row(n), self.col(n))
    }

    /// Number of orthogonal neighbors of `row`, `col`: 2 in a corner, 3 on an
    /// edge, 4 inside. A square holding more spots than this is overfull.
    pub fn capacity(&self, row: usize, col: usize) -> usize {
        self.capacity_index(self.sq_num(row, col))
    }

    pub fn capacity_index(&self, n: usize) -> usize {
        neighbors(self.size, n).count()
    }

    /// Total spots on the board.
    pub fn num_pieces(&self) -> usize {
        self.cells.iter().map(Cell::spots).sum()
    }

    /// Number of squares owned by `side`.
    pub fn num_of_side(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.owner() == Some(side))
            .count()
    }

    /// The side that would move next, derived from spot parity. Once the game
    /// is won this names the loser, so it is no substitute for [`Board::winner`].
    pub fn whose_move(&self) -> Side {
        if (self.num_pieces() + self.size) % 2 == 0 {
            Side::Red
        } else {
            Side::Blue
        }
    }

    /// True iff the square at `row`, `col` is empty or already `side`'s.
    pub fn is_legal(&self, side: Side, row: usize, col: usize) -> bool {
        self.is_legal_index(side, self.sq_num(row, col))
    }

    pub fn is_legal_index(&self, side: Side, n: usize) -> bool {
        self.cells[n].accepts(side)
    }

    /// True iff it is `side`'s turn and nobody has won yet.
    pub fn is_legal_to_move(&self, side: Side) -> bool {
        self.whose_move() == side && self.winner().is_none()
    }

    /// Squares `side` may add a spot to, in row-major order.
    pub fn legal_moves(&self, side: Side) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&n| self.is_legal_index(side, n))
            .collect()
    }

    /// The side owning every square, if there is one.
    pub fn winner(&self) -> Option<Side> {
        let first = self.cells[0].owner()?;
        self.cells
            .iter()
            .all(|cell| cell.owner() == Some(first))
            .then_some(first)
    }

    /// Add a spot for `side` at `row`, `col` and resolve any explosions.
    /// Assumes `is_legal(side, row, col)`.
    pub fn add_spot(&mut self, side: Side, row: usize, col: usize) {
        self.add_spot_index(side, self.sq_num(row, col));
    }

    /// Add a spot for `side` at square `n` and resolve any explosions.
    /// Assumes `is_legal_index(side, n)`.
    pub fn add_spot_index(&mut self, side: Side, n: usize) {
        debug_assert!(
            self.is_legal_index(side, n),
            "{} may not play square {}",
            side.name(),
            self.move_string(n)
        );
        let spots = self.cells[n].spots() + 1;
        self.cells[n] = Cell::new(side, spots);
        if spots > self.capacity_index(n) {
            self.jump(side, n);
        }
        self.history.push(self.cells.clone());
        self.announce();
    }

    /// Resolve all explosions, starting from square `start`.
    ///
    /// The work queue may hold stale entries; a square that is no longer
    /// overfull when popped is skipped. Once a side owns the whole board, no
    /// more neighbors are queued, but whatever is already queued still runs.
    fn jump(&mut self, side: Side, start: usize) {
        let mut work = VecDeque::from([start]);
        while let Some(sq) = work.pop_front() {
            if self.cells[sq].spots() <= self.capacity_index(sq) {
                continue;
            }
            trace!("explode {} ({} spots)", self.move_string(sq), self.cells[sq].spots());
            self.cells[sq] = Cell::new(side, 1);
            for nb in neighbors(self.size, sq) {
                let spots = self.cells[nb].spots() + 1;
                self.cells[nb] = Cell::new(side, spots);
            }
            if self.winner().is_none() {
                work.extend(neighbors(self.size, sq));
            }
        }
    }

    /// Set the square at `row`, `col` to `spots` spots of `side` (no owner if
    /// `spots` is 0). Leaves the undo history alone.
    pub fn set(&mut self, row: usize, col: usize, spots: usize, side: Side) {
        let n = self.sq_num(row, col);
        self.cells[n] = Cell::new(side, spots);
        self.announce();
    }

    /// Reset to an empty board with `size` squares on a side and clear the
    /// undo history.
    pub fn clear(&mut self, size: usize) -> Result<(), ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidSize(size));
        }
        self.size = size;
        self.cells = vec![Cell::EMPTY; size * size];
        self.history.clear();
        self.announce();
        Ok(())
    }

    /// Copy the contents of `other` into this board and clear the undo
    /// history. The notifier is kept.
    pub fn copy_from(&mut self, other: &Board) {
        self.size = other.size;
        self.cells.clone_from(&other.cells);
        self.history.clear();
        self.announce();
    }

    /// Undo the last move. With at most one recorded move, this resets to
    /// the empty board.
    pub fn undo(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
            if let Some(previous) = self.history.last() {
                self.cells.clone_from(previous);
            }
        } else {
            self.history.clear();
            self.cells.fill(Cell::EMPTY);
        }
        self.announce();
    }

    /// Number of moves that can currently be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Install `notify` and fire it once for the current contents.
    pub fn set_notifier(&mut self, notify: impl FnMut(&Board) + 'static) {
        self.notifier = Some(Box::new(notify));
        self.announce();
    }

    fn announce(&mut self) {
        if let Some(mut notify) = self.notifier.take() {
            notify(&*self);
            self.notifier = Some(notify);
        }
    }

    /// Human-readable rendition with row numbers down the left and column
    /// numbers along the bottom.
    pub fn display_string(&self) -> String {
        let mut out = String::new();
        for row in 1..=self.size {
            let line: Vec<String> = (1..=self.size)
                .map(|col| cell_text(self.get(row, col)))
                .collect();
            out.push_str(&format!("{:2} {}\n", row, line.join(" ")));
        }
        out.push_str("  ");
        for col in 1..=self.size {
            out.push_str(&format!("{:3}", col));
        }
        out
    }
}

fn cell_text(cell: Cell) -> String {
    let tag = cell.owner().map_or('-', Side::symbol);
    format!("{}{}", cell.spots(), tag)
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Board {
            size: self.size,
            cells: self.cells.clone(),
            history: Vec::new(),
            notifier: None,
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("cells", &self.cells)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

/// Dump format: a `===` line, one indented line per row, then `===`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "===")?;
        for (n, cell) in self.cells.iter().enumerate() {
            if n % self.size == 0 {
                write!(f, "\n    ")?;
            }
            write!(f, "{} ", cell_text(*cell))?;
        }
        write!(f, "\n===")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn board_with(size: usize, cells: &[(usize, usize, usize, Side)]) -> Board {
        let mut board = Board::new(size).unwrap();
        for &(row, col, spots, side) in cells {
            board.set(row, col, spots, side);
        }
        board
    }

    fn spots_grid(board: &Board) -> Vec<usize> {
        board.cells().iter().map(Cell::spots).collect()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.size(), 4);
        assert!(board.cells().iter().all(|cell| *cell == Cell::EMPTY));
        assert_eq!(board.num_pieces(), 0);
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Board::new(0), Err(ConfigError::InvalidSize(0))));
        let mut board = Board::new(3).unwrap();
        assert!(board.clear(0).is_err());
        assert_eq!(board.size(), 3);
    }

    #[test]
    fn test_addressing_agrees() {
        let board = Board::new(5).unwrap();
        for n in 0..25 {
            let (row, col) = (board.row(n), board.col(n));
            assert!(board.exists(row, col));
            assert_eq!(board.sq_num(row, col), n);
        }
        assert_eq!(board.sq_num(1, 1), 0);
        assert_eq!(board.sq_num(2, 1), 5);
        assert!(!board.exists(0, 1));
        assert!(!board.exists(1, 6));
        assert!(board.exists_index(24));
        assert!(!board.exists_index(25));
        assert_eq!(board.move_string(7), "2 3");
    }

    #[test]
    fn test_capacity_by_position() {
        for size in 2..=8 {
            let board = Board::new(size).unwrap();
            assert_eq!(board.capacity(1, 1), 2);
            assert_eq!(board.capacity(1, size), 2);
            assert_eq!(board.capacity(size, 1), 2);
            assert_eq!(board.capacity(size, size), 2);
            if size > 2 {
                assert_eq!(board.capacity(1, 2), 3);
                assert_eq!(board.capacity(2, 1), 3);
                assert_eq!(board.capacity(size, 2), 3);
                assert_eq!(board.capacity(2, size), 3);
                assert_eq!(board.capacity(2, 2), 4);
            }
            let total: usize = (0..size * size).map(|n| board.capacity_index(n)).sum();
            assert_eq!(total, 4 * size * (size - 1));
        }
    }

    #[test]
    fn test_whose_move_parity() {
        let mut board = Board::new(2).unwrap();
        assert_eq!(board.whose_move(), Side::Red);
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(board.whose_move(), Side::Blue);
        board.add_spot(Side::Blue, 2, 2);
        assert_eq!(board.whose_move(), Side::Red);

        // Odd sizes start with Blue.
        assert_eq!(Board::new(3).unwrap().whose_move(), Side::Blue);
    }

    #[test]
    fn test_legality_is_ownership() {
        let board = board_with(
            3,
            &[(1, 1, 2, Side::Red), (2, 2, 1, Side::Blue), (3, 3, 3, Side::Red)],
        );
        for n in 0..9 {
            let cell = board.get_index(n);
            for side in [Side::Red, Side::Blue] {
                let expected = cell.is_empty() || cell.owner() == Some(side);
                assert_eq!(board.is_legal(side, board.row(n), board.col(n)), expected);
            }
        }
        assert_eq!(board.legal_moves(Side::Blue), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(board.legal_moves(Side::Red), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_is_legal_to_move() {
        let mut board = Board::new(2).unwrap();
        assert!(board.is_legal_to_move(Side::Red));
        assert!(!board.is_legal_to_move(Side::Blue));
        for (row, col) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            board.set(row, col, 1, Side::Red);
        }
        assert_eq!(board.winner(), Some(Side::Red));
        assert!(!board.is_legal_to_move(board.whose_move()));
    }

    #[test]
    fn test_winner_requires_full_ownership() {
        let mut board = Board::new(2).unwrap();
        assert_eq!(board.winner(), None);
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(board.winner(), None);

        let board = board_with(
            2,
            &[
                (1, 1, 1, Side::Blue),
                (1, 2, 2, Side::Blue),
                (2, 1, 1, Side::Blue),
                (2, 2, 1, Side::Blue),
            ],
        );
        assert_eq!(board.winner(), Some(Side::Blue));
        assert_eq!(board.num_of_side(Side::Blue), 4);
        assert_eq!(board.num_of_side(Side::Red), 0);
    }

    #[test]
    fn test_add_spot_without_explosion() {
        let mut board = Board::new(3).unwrap();
        board.add_spot(Side::Blue, 2, 2);
        board.add_spot(Side::Blue, 2, 2);
        assert_eq!(board.get(2, 2), Cell::new(Side::Blue, 2));
        assert_eq!(board.num_pieces(), 2);
    }

    #[test]
    fn test_corner_not_overfull_at_capacity() {
        let mut board = Board::new(3).unwrap();
        board.add_spot(Side::Red, 1, 1);
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(board.get(1, 1), Cell::new(Side::Red, 2));
        assert_eq!(board.get(1, 2), Cell::EMPTY);
    }

    #[test]
    fn test_single_explosion_conserves_spots() {
        let mut board = board_with(3, &[(1, 1, 2, Side::Red), (3, 3, 1, Side::Blue)]);
        let before = board.num_pieces();
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(board.num_pieces(), before + 1);
        assert_eq!(board.get(1, 1), Cell::new(Side::Red, 1));
        assert_eq!(board.get(1, 2), Cell::new(Side::Red, 1));
        assert_eq!(board.get(2, 1), Cell::new(Side::Red, 1));
        assert_eq!(board.get(3, 3), Cell::new(Side::Blue, 1));
    }

    #[test]
    fn test_explosion_captures_neighbors() {
        let mut board = board_with(
            3,
            &[(1, 2, 3, Side::Red), (1, 1, 1, Side::Blue), (2, 2, 2, Side::Blue)],
        );
        board.add_spot(Side::Red, 1, 2);
        assert_eq!(board.get(1, 2), Cell::new(Side::Red, 1));
        assert_eq!(board.get(1, 1), Cell::new(Side::Red, 2));
        assert_eq!(board.get(1, 3), Cell::new(Side::Red, 1));
        assert_eq!(board.get(2, 2), Cell::new(Side::Red, 3));
    }

    #[test]
    fn test_chained_explosions_skip_stale_entries() {
        // (1,1) and (2,2) are each queued twice; the second visit must be a no-op.
        let mut board = board_with(
            3,
            &[
                (1, 1, 2, Side::Red),
                (1, 2, 3, Side::Red),
                (2, 1, 3, Side::Red),
                (2, 2, 3, Side::Red),
                (3, 3, 1, Side::Blue),
            ],
        );
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(spots_grid(&board), vec![1, 3, 1, 3, 1, 1, 1, 1, 1]);
        assert_eq!(board.get(3, 3), Cell::new(Side::Blue, 1));
        assert_eq!(board.num_of_side(Side::Red), 8);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_win_stops_new_propagation_but_drains_queue() {
        let mut board = board_with(
            2,
            &[
                (1, 1, 2, Side::Red),
                (1, 2, 2, Side::Red),
                (2, 1, 2, Side::Red),
                (2, 2, 2, Side::Blue),
            ],
        );
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(board.winner(), Some(Side::Red));
        // (2,1) was already queued and still explodes; nothing new is queued
        // after the win, so (1,1) and (2,2) are left overfull.
        assert_eq!(spots_grid(&board), vec![3, 1, 1, 4]);
        assert!(board.get(2, 2).spots() > board.capacity(2, 2));
    }

    #[test]
    fn test_excess_spots_discarded() {
        // A corner forced to 4 spots resets to 1 and hands out only 2.
        let mut board = board_with(2, &[(1, 1, 3, Side::Red), (2, 2, 1, Side::Blue)]);
        board.add_spot(Side::Red, 1, 1);
        assert_eq!(board.get(1, 1), Cell::new(Side::Red, 1));
        assert_eq!(board.get(1, 2), Cell::new(Side::Red, 1));
        assert_eq!(board.get(2, 1), Cell::new(Side::Red, 1));
        assert_eq!(board.num_pieces(), 4);
    }

    #[test]
    fn test_one_by_one_board() {
        let mut board = Board::new(1).unwrap();
        assert_eq!(board.capacity(1, 1), 0);
        board.add_spot(Side::Blue, 1, 1);
        assert_eq!(board.get(1, 1), Cell::new(Side::Blue, 1));
        assert_eq!(board.winner(), Some(Side::Blue));
    }

    #[test]
    fn test_undo_restores_previous_positions() {
        let mut board = Board::new(3).unwrap();
        let moves = [
            (Side::Blue, 1, 1),
            (Side::Red, 3, 3),
            (Side::Blue, 1, 1),
            (Side::Red, 3, 3),
            (Side::Blue, 1, 1),
            (Side::Red, 2, 2),
        ];
        let mut before = Vec::new();
        for &(side, row, col) in &moves {
            before.push(board.clone());
            board.add_spot(side, row, col);
        }
        assert_eq!(board.history_len(), moves.len());
        while let Some(expected) = before.pop() {
            board.undo();
            assert_eq!(board, expected);
        }
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_undo_with_no_moves_empties_board() {
        let mut board = board_with(2, &[(1, 1, 1, Side::Red)]);
        board.undo();
        assert_eq!(board, Board::new(2).unwrap());
    }

    #[test]
    fn test_clear_resets_size_and_history() {
        let mut board = Board::new(2).unwrap();
        board.add_spot(Side::Red, 1, 1);
        board.clear(4).unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.cells().len(), 16);
        assert_eq!(board.num_pieces(), 0);
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_clone_has_fresh_history() {
        let mut board = Board::new(2).unwrap();
        board.add_spot(Side::Red, 1, 1);
        board.add_spot(Side::Blue, 2, 2);
        let mut copy = board.clone();
        assert_eq!(copy, board);
        assert_eq!(copy.history_len(), 0);
        copy.add_spot(Side::Red, 1, 1);
        assert_ne!(copy, board);
        assert_eq!(board.history_len(), 2);
    }

    #[test]
    fn test_copy_from_overwrites_contents() {
        let source = board_with(3, &[(2, 3, 2, Side::Blue)]);
        let mut target = Board::new(3).unwrap();
        target.add_spot(Side::Red, 1, 1);
        target.copy_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.history_len(), 0);
    }

    #[test]
    fn test_notifier_fires_once_per_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut board = Board::new(2).unwrap();
        let sink = Rc::clone(&seen);
        board.set_notifier(move |b| sink.borrow_mut().push(b.num_pieces()));
        assert_eq!(*seen.borrow(), vec![0]);

        board.set(1, 1, 2, Side::Red);
        board.set(2, 2, 1, Side::Blue);
        // Explodes into (1,2) and (2,1); only the settled board is reported.
        board.add_spot(Side::Red, 1, 1);
        board.undo();
        board.clear(2).unwrap();
        assert_eq!(*seen.borrow(), vec![0, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn test_clone_does_not_notify() {
        let count = Rc::new(RefCell::new(0));
        let mut board = Board::new(2).unwrap();
        let counter = Rc::clone(&count);
        board.set_notifier(move |_| *counter.borrow_mut() += 1);
        let mut copy = board.clone();
        copy.add_spot(Side::Red, 1, 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_dump_format() {
        let board = board_with(2, &[(1, 1, 1, Side::Red), (2, 2, 2, Side::Blue)]);
        assert_eq!(board.to_string(), "===\n    1r 0- \n    0- 2b \n===");
    }

    #[test]
    fn test_display_string() {
        let board = board_with(2, &[(1, 2, 1, Side::Red)]);
        assert_eq!(board.display_string(), " 1 0- 1r\n 2 0- 0-\n    1  2");
    }
}
