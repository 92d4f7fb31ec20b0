use log::info;
use serde::{Deserialize, Serialize};

use crate::ai::{Agent, MinimaxAgent, RandomAgent, SearchConfig};
use crate::config::AppConfig;
use crate::error::{ConfigError, MoveError};
use crate::game::{Board, GameState, Side};

/// Which kind of automated player sits on a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Minimax,
    Random,
}

impl AgentKind {
    /// Parse the names used on the command line and in config files.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "minimax" => Some(AgentKind::Minimax),
            "random" => Some(AgentKind::Random),
            _ => None,
        }
    }

    /// Build an agent of this kind. `seed` only affects random agents.
    pub fn build(self, search: &SearchConfig, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            AgentKind::Minimax => Box::new(MinimaxAgent::from_config(search)),
            AgentKind::Random => Box::new(match seed {
                Some(seed) => RandomAgent::with_seed(seed),
                None => RandomAgent::new(),
            }),
        }
    }
}

/// Session configuration, the `[game]` table of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub red: AgentKind,
    pub blue: AgentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub max_moves: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            red: AgentKind::Minimax,
            blue: AgentKind::Random,
            seed: None,
            max_moves: 10_000,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    /// `None` if the move cap was hit first.
    pub winner: Option<Side>,
    pub moves: usize,
}

/// One game between two agents on a real board.
pub struct Session {
    state: GameState,
    red: Box<dyn Agent>,
    blue: Box<dyn Agent>,
    max_moves: usize,
    moves: usize,
}

impl Session {
    pub fn new(state: GameState, red: Box<dyn Agent>, blue: Box<dyn Agent>, max_moves: usize) -> Self {
        Session {
            state,
            red,
            blue,
            max_moves,
            moves: 0,
        }
    }

    /// Build the board and both agents from a validated configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let game = &config.game;
        let state = GameState::new(config.board.size)?;
        let red = game.red.build(&config.search, game.seed);
        let blue = game
            .blue
            .build(&config.search, game.seed.map(|seed| seed.wrapping_add(1)));
        Ok(Session::new(state, red, blue, game.max_moves))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Moves played so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Register a callback fired after each settled board change.
    pub fn subscribe(&mut self, notify: impl FnMut(&Board) + 'static) {
        self.state.subscribe(notify);
    }

    /// Ask the side to move for a move and apply it. Returns the side and
    /// square played, or `None` if the game is already over.
    pub fn step(&mut self) -> Result<Option<(Side, usize)>, MoveError> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        let side = self.state.current_player();
        let agent = match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        };
        let board = self.state.board();
        let n = agent.select_move(board, side);
        let (row, col) = (board.row(n), board.col(n));
        info!("{} ({}) plays {} {}", side.name(), agent.name(), row, col);
        self.state.make_move(side, row, col)?;
        self.moves += 1;
        Ok(Some((side, n)))
    }

    /// Play until someone wins or the move cap is reached.
    pub fn run(&mut self) -> Result<GameSummary, MoveError> {
        while self.moves < self.max_moves {
            if self.step()?.is_none() {
                break;
            }
        }
        let winner = self.state.winner();
        match winner {
            Some(side) => info!("{} wins after {} moves", side.name(), self.moves),
            None => info!("stopped after {} moves with no winner", self.moves),
        }
        Ok(GameSummary {
            winner,
            moves: self.moves,
        })
    }
}
