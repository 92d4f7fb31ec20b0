use log::debug;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::game::{Board, Side};

/// Plies searched by [`MinimaxAgent::default`].
pub const DEFAULT_DEPTH: usize = 4;

/// Score of a board wholly owned by Red (negated for Blue).
pub const WINNING_VALUE: i32 = 1_000_000;

/// Trait for scoring a position. Positive values favor Red.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board) -> i32;
}

/// Square-count difference, or a fixed winning value once one side owns the
/// whole board.
#[derive(Debug, Clone, Copy)]
pub struct MaterialHeuristic {
    winning_value: i32,
}

impl MaterialHeuristic {
    pub fn new(winning_value: i32) -> Self {
        MaterialHeuristic { winning_value }
    }
}

impl Default for MaterialHeuristic {
    fn default() -> Self {
        Self::new(WINNING_VALUE)
    }
}

impl Heuristic for MaterialHeuristic {
    fn evaluate(&self, board: &Board) -> i32 {
        let total = board.cells().len();
        let red = board.num_of_side(Side::Red);
        let blue = board.num_of_side(Side::Blue);
        if red == total {
            self.winning_value
        } else if blue == total {
            -self.winning_value
        } else {
            red as i32 - blue as i32
        }
    }
}

/// Search settings, loadable from the `[search]` table of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub depth: usize,
    pub winning_value: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            winning_value: WINNING_VALUE,
        }
    }
}

/// Result of a search from one root position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best square for the side to move; `None` when the root was evaluated
    /// statically (depth 0 or a finished game).
    pub best_move: Option<usize>,
    /// Minimax value of the root, from Red's point of view.
    pub score: i32,
    /// Positions visited, root included.
    pub nodes: u64,
}

/// Minimax search with alpha-beta pruning to a fixed `depth`, with `side`
/// to move at the root. Red maximizes, Blue minimizes.
///
/// Children are explored in row-major order on scratch copies of the board;
/// `board` itself is never touched. The root move is replaced only by a
/// strictly better one, so among equal scores the first square wins.
pub fn search(board: &Board, side: Side, depth: usize, heuristic: &dyn Heuristic) -> SearchOutcome {
    let mut search = Search {
        heuristic,
        nodes: 0,
    };
    let (score, best_move) = search.min_max(board, side, depth, i32::MIN, i32::MAX);
    debug!(
        "{} depth {}: score {} move {:?} ({} nodes)",
        side.name(),
        depth,
        score,
        best_move.map(|n| board.move_string(n)),
        search.nodes
    );
    SearchOutcome {
        best_move,
        score,
        nodes: search.nodes,
    }
}

/// Pick a move for `side` on `board` and return it as (row, col).
///
/// Assumes the game is not over. With `depth` 0 no move is ranked and the
/// first legal square is returned.
pub fn choose_move(
    board: &Board,
    side: Side,
    depth: usize,
    heuristic: &dyn Heuristic,
) -> (usize, usize) {
    let n = best_square(board, side, depth, heuristic);
    (board.row(n), board.col(n))
}

fn best_square(board: &Board, side: Side, depth: usize, heuristic: &dyn Heuristic) -> usize {
    let legal = board.legal_moves(side);
    assert!(!legal.is_empty(), "No legal moves available");
    search(board, side, depth, heuristic)
        .best_move
        .unwrap_or(legal[0])
}

struct Search<'a> {
    heuristic: &'a dyn Heuristic,
    nodes: u64,
}

impl Search<'_> {
    fn min_max(
        &mut self,
        board: &Board,
        side: Side,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<usize>) {
        self.nodes += 1;
        if depth == 0 || board.winner().is_some() {
            return (self.heuristic.evaluate(board), None);
        }

        let maximizing = side == Side::Red;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for n in board.legal_moves(side) {
            let mut next = board.clone();
            next.add_spot_index(side, n);
            let (score, _) = self.min_max(&next, side.other(), depth - 1, alpha, beta);
            let improves = if maximizing { score > best } else { score < best };
            if !improves {
                continue;
            }
            best = score;
            best_move = Some(n);
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        (best, best_move)
    }
}

/// Agent that plays the move found by [`search`].
pub struct MinimaxAgent {
    depth: usize,
    heuristic: Box<dyn Heuristic>,
}

impl MinimaxAgent {
    pub fn new(depth: usize) -> Self {
        MinimaxAgent {
            depth,
            heuristic: Box::new(MaterialHeuristic::default()),
        }
    }

    pub fn with_heuristic(depth: usize, heuristic: Box<dyn Heuristic>) -> Self {
        MinimaxAgent { depth, heuristic }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::with_heuristic(
            config.depth,
            Box::new(MaterialHeuristic::new(config.winning_value)),
        )
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, board: &Board, side: Side) -> usize {
        best_square(board, side, self.depth, self.heuristic.as_ref())
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}
