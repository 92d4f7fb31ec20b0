//! # Chain Reaction
//!
//! A two-player chain-reaction grid game. Players take turns adding spots to
//! squares they own (or empty ones); a square holding more spots than it has
//! neighbors explodes into them, capturing them, possibly setting off more
//! explosions. A player wins by owning every square.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: sides, cells, the board engine, checked game state
//! - [`ai`]: Agent trait, alpha-beta minimax search, random agent
//! - [`session`]: Drives a game between two agents
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
