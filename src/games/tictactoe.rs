use crate::{Evaluator, GameState, InvalidMove, MoveResult, Player};
use serde::Serialize;
use std::fmt;

const SIZE: usize = 3;

/// A TicTacToe move: the 0-based cell index, row-major.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct TicTacToeMove(pub usize);

#[derive(Debug, Clone)]
pub struct TicTacToeState {
    board: Vec<i32>,
}

impl TicTacToeState {
    pub fn new() -> Self {
        TicTacToeState {
            board: vec![0; SIZE * SIZE],
        }
    }

    pub fn rows(&self) -> usize {
        SIZE
    }

    pub fn cols(&self) -> usize {
        SIZE
    }

    pub fn reset(&mut self) {
        self.board.fill(0);
    }

    pub fn is_empty(&self) -> bool {
        self.board.iter().all(|&cell| cell == 0)
    }

    pub fn is_legal(&self, mv: &TicTacToeMove) -> bool {
        mv.0 < SIZE * SIZE && self.board[mv.0] == 0
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        TicTacToeState::new()
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..SIZE {
            write!(f, "|")?;
            for c in 0..SIZE {
                let symbol = match self.board[r * SIZE + c] {
                    1 => "X",
                    2 => "O",
                    _ => ".",
                };
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", symbol)?;
            }
            writeln!(f, "|")?;
        }
        for c in 0..SIZE {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}

impl GameState for TicTacToeState {
    type Move = TicTacToeMove;

    fn valid_moves(&self, _player: Player) -> Vec<Self::Move> {
        (0..SIZE * SIZE)
            .filter(|&i| self.board[i] == 0)
            .map(TicTacToeMove)
            .collect()
    }

    fn drop_piece(&mut self, mv: &Self::Move, player: Player) -> Result<MoveResult, InvalidMove> {
        if mv.0 >= SIZE * SIZE {
            return Err(InvalidMove::InvalidCell(mv.0));
        }
        if self.board[mv.0] != 0 {
            return Err(InvalidMove::CellOccupied(mv.0));
        }
        self.board[mv.0] = player.token();
        Ok(MoveResult {
            row: mv.0 / SIZE,
            col: mv.0 % SIZE,
            player,
        })
    }

    fn game_over(&self) -> (bool, Option<Player>) {
        for player in [Player::One, Player::Two] {
            if minimax_shared::check_line_win(&self.board, SIZE, SIZE, player.token(), SIZE) {
                return (true, Some(player));
            }
        }
        if self.board.iter().all(|&cell| cell != 0) {
            return (true, None);
        }
        (false, None)
    }
}

/// Heuristic for [`TicTacToeState`]. Decided games score +/-50 (0 for a
/// draw); otherwise each of the eight lines contributes 10 for two own
/// pieces with an open cell, 3 for one own piece with two open cells, or
/// -12 for two opposing pieces with an open cell, plus 4 for holding the
/// center (-4 when the opponent holds it).
pub struct TicTacToeEvaluator;

impl Evaluator<TicTacToeState> for TicTacToeEvaluator {
    fn evaluate(&self, state: &TicTacToeState, player: Player) -> i32 {
        let (over, winner) = state.game_over();
        if over {
            return match winner {
                Some(w) if w == player => 50,
                Some(_) => -50,
                None => 0,
            };
        }

        let mut score = 0;
        minimax_shared::scan_windows(&state.board, SIZE, SIZE, player.token(), SIZE, |own, opp, empty| {
            if own == 2 && empty == 1 {
                score += 10;
            } else if own == 1 && empty == 2 {
                score += 3;
            } else if opp == 2 && empty == 1 {
                score -= 12;
            }
        });

        let center = state.board[SIZE * SIZE / 2];
        if center == player.token() {
            score += 4;
        } else if center == player.opponent().token() {
            score -= 4;
        }
        score
    }
}
