//! # Game Implementations Module
//!
//! Implementations of all supported games. Each game implements the
//! `GameState` trait to give the minimax engine a consistent interface,
//! and ships its heuristic `Evaluator` alongside the rules.
//!
//! ## Supported Games
//! - **Connect 4**: gravity-drop connection game on a 6x7 grid
//! - **TicTacToe**: free placement on a 3x3 grid, any full line wins
//! - **Checkers**: 8x8 diagonal game with men, kings, and forced jumps
//!
//! ## Adding New Games
//! To add a new game, create a new module and implement:
//! 1. A move type carrying the data of one move
//! 2. A game state type with the `GameState` trait
//! 3. A `Display` rendering of the board
//! 4. An `Evaluator` with the game's heuristic

pub mod checkers;
pub mod connect4;
pub mod tictactoe;
