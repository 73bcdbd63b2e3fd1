//! # Game Wrapper Module - Unified Game Interface
//!
//! The abstraction layer that lets the minimax engine and the match
//! runner work with any supported game through a single type. Each game
//! keeps its own state and move types; the wrappers dispatch to them.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │ Minimax Engine  │◄──►│   GameWrapper    │◄──►│  Game-Specific   │
//! │                 │    │   MoveWrapper    │    │ Implementations  │
//! │ • Generic search│    │ EvaluatorWrapper │    │ • Connect4State  │
//! │ • Diagnostics   │    │                  │    │ • TicTacToeState │
//! │ • Evaluators    │    │ • Unified API    │    │ • CheckersState  │
//! └─────────────────┘    └──────────────────┘    └──────────────────┘
//! ```
//!
//! Enums rather than trait objects: no heap indirection, compile-time
//! checking that every game supports every operation, and pattern
//! matching where a caller needs game-specific handling. Pairing a move
//! with the wrong game is a programming error and panics.

use crate::games::checkers::{CheckersEvaluator, CheckersMove, CheckersState};
use crate::games::connect4::{Connect4Evaluator, Connect4Move, Connect4State};
use crate::games::tictactoe::{TicTacToeEvaluator, TicTacToeMove, TicTacToeState};
use crate::{Evaluator, GameState, InvalidMove, MoveResult, Player};
use serde::Serialize;
use std::fmt;

/// Wrapper enum for all supported game states.
#[derive(Debug, Clone)]
pub enum GameWrapper {
    /// Connect 4: gravity drops on a 6x7 grid, four in a row wins.
    Connect4(Connect4State),
    /// TicTacToe: free placement on a 3x3 grid, any full line wins.
    TicTacToe(TicTacToeState),
    /// Checkers: 8x8 diagonal game with men, kings, and forced jumps.
    Checkers(CheckersState),
}

/// Wrapper enum for all supported move types.
///
/// Moves implement `Eq` and `Hash` for use as map keys, and `Serialize`
/// so search diagnostics over wrapped games can be exported whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum MoveWrapper {
    /// Connect4 move: the column to drop into.
    Connect4(Connect4Move),
    /// TicTacToe move: the cell index to claim.
    TicTacToe(TicTacToeMove),
    /// Checkers move: the visited path plus captured squares.
    Checkers(CheckersMove),
}

impl fmt::Display for MoveWrapper {
    /// Compact per-game representation for logs and match records.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveWrapper::Connect4(m) => write!(f, "C4({})", m.0),
            MoveWrapper::TicTacToe(m) => write!(f, "TTT({})", m.0),
            MoveWrapper::Checkers(m) => write!(f, "Ck({})", m),
        }
    }
}

impl fmt::Display for GameWrapper {
    /// Delegates to the specific game's board rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameWrapper::Connect4(g) => write!(f, "{}", g),
            GameWrapper::TicTacToe(g) => write!(f, "{}", g),
            GameWrapper::Checkers(g) => write!(f, "{}", g),
        }
    }
}

macro_rules! impl_game_dispatch {
    ($($variant:ident),*) => {
        impl GameState for GameWrapper {
            type Move = MoveWrapper;

            fn valid_moves(&self, player: Player) -> Vec<Self::Move> {
                match self {
                    $(GameWrapper::$variant(g) => g
                        .valid_moves(player)
                        .into_iter()
                        .map(MoveWrapper::$variant)
                        .collect(),)*
                }
            }

            fn drop_piece(&mut self, mv: &Self::Move, player: Player) -> Result<MoveResult, InvalidMove> {
                match (self, mv) {
                    $((GameWrapper::$variant(g), MoveWrapper::$variant(m)) => g.drop_piece(m, player),)*
                    _ => panic!("Mismatched game and move types"),
                }
            }

            fn game_over(&self) -> (bool, Option<Player>) {
                match self {
                    $(GameWrapper::$variant(g) => g.game_over(),)*
                }
            }
        }

        impl GameWrapper {
            /// Board dimensions as (rows, cols).
            pub fn board_size(&self) -> (usize, usize) {
                match self {
                    $(GameWrapper::$variant(g) => (g.rows(), g.cols()),)*
                }
            }
        }
    };
}

impl_game_dispatch!(Connect4, TicTacToe, Checkers);

/// Pairs each game with its heuristic, so engines over [`GameWrapper`]
/// can be assembled without knowing which game is inside.
pub enum EvaluatorWrapper {
    Connect4(Connect4Evaluator),
    TicTacToe(TicTacToeEvaluator),
    Checkers(CheckersEvaluator),
}

impl EvaluatorWrapper {
    /// The evaluator matching the wrapped game.
    pub fn for_game(game: &GameWrapper) -> Self {
        match game {
            GameWrapper::Connect4(_) => EvaluatorWrapper::Connect4(Connect4Evaluator),
            GameWrapper::TicTacToe(_) => EvaluatorWrapper::TicTacToe(TicTacToeEvaluator),
            GameWrapper::Checkers(_) => EvaluatorWrapper::Checkers(CheckersEvaluator),
        }
    }
}

impl Evaluator<GameWrapper> for EvaluatorWrapper {
    fn evaluate(&self, state: &GameWrapper, player: Player) -> i32 {
        match (self, state) {
            (EvaluatorWrapper::Connect4(e), GameWrapper::Connect4(g)) => e.evaluate(g, player),
            (EvaluatorWrapper::TicTacToe(e), GameWrapper::TicTacToe(g)) => e.evaluate(g, player),
            (EvaluatorWrapper::Checkers(e), GameWrapper::Checkers(g)) => e.evaluate(g, player),
            _ => panic!("Mismatched game and evaluator types"),
        }
    }
}
