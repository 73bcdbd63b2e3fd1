//! # Connect 4 Game Implementation
//!
//! Gravity-drop game on a rows x cols grid (6x7 by default). Pieces fall
//! to the lowest open cell of their column and the first player to line
//! up four in a row, column, or diagonal wins. The board fills up with
//! no line for a draw.

use crate::{Evaluator, GameState, InvalidMove, MoveResult, Player};
use serde::Serialize;
use std::fmt;

/// Number of pieces in a row needed to win.
const LINE_SIZE: usize = 4;

/// A Connect 4 move: the 0-based column to drop a piece into.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Connect4Move(pub usize);

/// The complete state of a Connect 4 game.
///
/// The board is a flat row-major vector holding 1 for Player One's
/// pieces, 2 for Player Two's, and 0 for empty cells. Row 0 is the top
/// of the board, so dropped pieces settle on the highest-indexed empty
/// row of their column.
#[derive(Debug, Clone)]
pub struct Connect4State {
    board: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            write!(f, "|")?;
            for c in 0..self.cols {
                let symbol = match self.board[r * self.cols + c] {
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
        for c in 0..self.cols {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}

impl GameState for Connect4State {
    type Move = Connect4Move; // Column to drop a piece

    fn valid_moves(&self, _player: Player) -> Vec<Self::Move> {
        // Any open column is available to either player.
        (0..self.cols)
            .filter(|&c| self.board[c] == 0)
            .map(Connect4Move)
            .collect()
    }

    fn drop_piece(&mut self, mv: &Self::Move, player: Player) -> Result<MoveResult, InvalidMove> {
        let col = mv.0;
        if col >= self.cols {
            return Err(InvalidMove::InvalidColumn(col));
        }
        if self.board[col] != 0 {
            return Err(InvalidMove::ColumnFull(col));
        }
        for r in (0..self.rows).rev() {
            let idx = r * self.cols + col;
            if self.board[idx] == 0 {
                self.board[idx] = player.token();
                return Ok(MoveResult { row: r, col, player });
            }
        }
        Err(InvalidMove::ColumnFull(col))
    }

    fn game_over(&self) -> (bool, Option<Player>) {
        for player in [Player::One, Player::Two] {
            if minimax_shared::check_line_win(&self.board, self.cols, self.rows, player.token(), LINE_SIZE) {
                return (true, Some(player));
            }
        }
        if (0..self.cols).all(|c| self.board[c] != 0) {
            return (true, None);
        }
        (false, None)
    }
}

impl Connect4State {
    /// Creates an empty board with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Connect4State {
            board: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Clears the board back to the starting position.
    pub fn reset(&mut self) {
        self.board.fill(0);
    }

    /// True while no piece has been placed.
    pub fn is_empty(&self) -> bool {
        self.board.iter().all(|&cell| cell == 0)
    }

    /// A move is legal while its column exists and the top cell of that
    /// column is still open.
    pub fn is_legal(&self, mv: &Connect4Move) -> bool {
        mv.0 < self.cols && self.board[mv.0] == 0
    }
}

impl Default for Connect4State {
    fn default() -> Self {
        Connect4State::new(6, 7)
    }
}

/// Heuristic for [`Connect4State`]: the difference between the two
/// players' positional scores. A positional score awards 3 per piece in
/// the center column, then sums pattern scores over every four-cell
/// window: 100 for a completed line, 5 for three pieces with an open
/// cell, 2 for two pieces with two open cells, and -4 whenever the
/// opponent holds three with an open cell.
pub struct Connect4Evaluator;

impl Evaluator<Connect4State> for Connect4Evaluator {
    fn evaluate(&self, state: &Connect4State, player: Player) -> i32 {
        score_position(state, player) - score_position(state, player.opponent())
    }
}

fn score_position(state: &Connect4State, player: Player) -> i32 {
    let token = player.token();
    let center = state.cols / 2;
    let mut score = 0;
    for r in 0..state.rows {
        if state.board[r * state.cols + center] == token {
            score += 3;
        }
    }
    minimax_shared::scan_windows(
        &state.board,
        state.cols,
        state.rows,
        token,
        LINE_SIZE,
        |own, opp, empty| {
            if own == 4 {
                score += 100;
            } else if own == 3 && empty == 1 {
                score += 5;
            } else if own == 2 && empty == 2 {
                score += 2;
            }
            if opp == 3 && empty == 1 {
                score -= 4;
            }
        },
    );
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Connect4State::default();
        assert_eq!(game.rows(), 6);
        assert_eq!(game.cols(), 7);
        assert!(game.is_empty());
        assert_eq!(game.valid_moves(Player::One).len(), 7);
        assert_eq!(game.game_over(), (false, None));
    }

    #[test]
    fn test_gravity_stacks_pieces() {
        let mut game = Connect4State::default();
        let first = game.drop_piece(&Connect4Move(3), Player::One).unwrap();
        assert_eq!((first.row, first.col, first.player), (5, 3, Player::One));
        let second = game.drop_piece(&Connect4Move(3), Player::Two).unwrap();
        assert_eq!((second.row, second.col, second.player), (4, 3, Player::Two));
        assert!(!game.is_empty());
    }

    #[test]
    fn test_rejected_moves_leave_the_state_alone() {
        let mut game = Connect4State::default();
        assert_eq!(
            game.drop_piece(&Connect4Move(7), Player::One),
            Err(InvalidMove::InvalidColumn(7))
        );
        assert!(game.is_empty());

        for _ in 0..3 {
            game.drop_piece(&Connect4Move(0), Player::One).unwrap();
            game.drop_piece(&Connect4Move(0), Player::Two).unwrap();
        }
        assert!(!game.is_legal(&Connect4Move(0)));
        assert_eq!(
            game.drop_piece(&Connect4Move(0), Player::One),
            Err(InvalidMove::ColumnFull(0))
        );
        assert_eq!(game.valid_moves(Player::One).len(), 6);
    }

    #[test]
    fn test_win_condition_horizontal() {
        let mut game = Connect4State::default();
        // One claims the bottom row, Two stacks on top.
        for c in 0..3 {
            game.drop_piece(&Connect4Move(c), Player::One).unwrap();
            game.drop_piece(&Connect4Move(c), Player::Two).unwrap();
        }
        game.drop_piece(&Connect4Move(3), Player::One).unwrap();
        assert_eq!(game.game_over(), (true, Some(Player::One)));
    }

    #[test]
    fn test_win_condition_vertical() {
        let mut game = Connect4State::default();
        for _ in 0..3 {
            game.drop_piece(&Connect4Move(0), Player::One).unwrap();
            game.drop_piece(&Connect4Move(1), Player::Two).unwrap();
        }
        game.drop_piece(&Connect4Move(0), Player::One).unwrap();
        assert_eq!(game.game_over(), (true, Some(Player::One)));
    }

    #[test]
    fn test_win_condition_diagonal() {
        let mut game = Connect4State::default();
        // Staircase for One from (5,0) up to (2,3).
        game.drop_piece(&Connect4Move(0), Player::One).unwrap();
        game.drop_piece(&Connect4Move(1), Player::Two).unwrap();
        game.drop_piece(&Connect4Move(1), Player::One).unwrap();
        game.drop_piece(&Connect4Move(2), Player::Two).unwrap();
        game.drop_piece(&Connect4Move(2), Player::One).unwrap();
        game.drop_piece(&Connect4Move(3), Player::Two).unwrap();
        game.drop_piece(&Connect4Move(2), Player::One).unwrap();
        game.drop_piece(&Connect4Move(3), Player::Two).unwrap();
        game.drop_piece(&Connect4Move(3), Player::One).unwrap();
        game.drop_piece(&Connect4Move(6), Player::Two).unwrap();
        game.drop_piece(&Connect4Move(3), Player::One).unwrap();
        assert_eq!(game.game_over(), (true, Some(Player::One)));
    }

    #[test]
    fn test_draw_when_board_fills_without_a_line() {
        let mut game = Connect4State::default();
        // Stripe pattern with no four-in-a-row in any direction.
        for r in 0..6 {
            for c in 0..7 {
                let one = (c % 4 < 2) == (r % 2 == 0);
                game.board[r * 7 + c] = if one { 1 } else { 2 };
            }
        }
        assert_eq!(game.game_over(), (true, None));
        assert!(game.valid_moves(Player::One).is_empty());

        game.reset();
        assert!(game.is_empty());
        assert_eq!(game.game_over(), (false, None));
    }

    #[test]
    fn test_evaluator_counts_center_pieces() {
        let mut game = Connect4State::default();
        game.drop_piece(&Connect4Move(3), Player::One).unwrap();
        assert_eq!(Connect4Evaluator.evaluate(&game, Player::One), 3);
        assert_eq!(Connect4Evaluator.evaluate(&game, Player::Two), -3);
    }

    #[test]
    fn test_evaluator_rewards_an_open_three() {
        let mut game = Connect4State::default();
        for c in 0..3 {
            game.drop_piece(&Connect4Move(c), Player::One).unwrap();
        }
        // One scores 5 for the open three plus 2 for the open two inside
        // it; Two's side of the difference carries the -4 threat penalty.
        assert_eq!(Connect4Evaluator.evaluate(&game, Player::One), 11);
        assert_eq!(Connect4Evaluator.evaluate(&game, Player::Two), -11);
    }

    #[test]
    fn test_evaluator_scores_a_completed_line() {
        let mut game = Connect4State::default();
        for c in 0..4 {
            game.drop_piece(&Connect4Move(c), Player::One).unwrap();
        }
        // 100 for the line, 5 and 2 for its open sub-windows, 3 for the
        // center-column piece, and Two's -4 threat penalty.
        assert_eq!(Connect4Evaluator.evaluate(&game, Player::One), 114);
    }

    #[test]
    fn test_display_renders_grid_with_footer() {
        let mut game = Connect4State::new(2, 3);
        game.drop_piece(&Connect4Move(1), Player::One).unwrap();
        game.drop_piece(&Connect4Move(1), Player::Two).unwrap();
        assert_eq!(game.to_string(), "|. O .|\n|. X .|\n 0 1 2");
    }
}
