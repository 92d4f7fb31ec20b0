mod agent;
pub mod minimax;
mod random;

pub use agent::Agent;
pub use minimax::{
    choose_move, search, Heuristic, MaterialHeuristic, MinimaxAgent, SearchConfig, SearchOutcome,
};
pub use random::RandomAgent;
