//! # Checkers Game Implementation
//!
//! Diagonal jump game on an 8x8 board. Men move one step diagonally
//! toward the opposing side, kings move in all four diagonal directions,
//! and any available capture must be taken. Captures chain: a piece that
//! can keep jumping from its landing square must continue, and a man
//! reaching the far row mid-chain promotes and carries on as a king.
//! A player with no pieces or no legal moves loses.

use crate::{Evaluator, GameState, InvalidMove, MoveResult, Player};
use serde::Serialize;
use std::fmt;

const EMPTY: i32 = 0;
const ONE_MAN: i32 = 1;
const TWO_MAN: i32 = 2;
const ONE_KING: i32 = 3;
const TWO_KING: i32 = 4;

const KING_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const UP_DIRS: [(i32, i32); 2] = [(-1, -1), (-1, 1)];
const DOWN_DIRS: [(i32, i32); 2] = [(1, -1), (1, 1)];

/// A checkers move: every square the piece visits plus the squares of
/// the pieces it captures along the way.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct CheckersMove {
    /// Visited squares in order, the starting square first.
    pub path: Vec<(usize, usize)>,
    /// Captured squares in jump order; empty for a plain step.
    pub captures: Vec<(usize, usize)>,
    /// Whether the moving man comes out of this move as a king.
    pub promotes: bool,
}

impl fmt::Display for CheckersMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (r, c)) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "({},{})", r, c)?;
        }
        if !self.captures.is_empty() {
            write!(f, " x{}", self.captures.len())?;
        }
        Ok(())
    }
}

/// The complete state of a checkers game.
///
/// The board is a flat row-major vector: 0 for empty squares, 1 and 2
/// for Player One's and Player Two's men, 3 and 4 for their kings. Two
/// starts on the top three rows moving down, One on the bottom three
/// rows moving up, both on the dark squares where `(r + c) % 2 == 1`.
#[derive(Debug, Clone)]
pub struct CheckersState {
    board: Vec<i32>,
    rows: usize,
    cols: usize,
    move_count: u32,
}

fn owner(piece: i32) -> Option<Player> {
    match piece {
        ONE_MAN | ONE_KING => Some(Player::One),
        TWO_MAN | TWO_KING => Some(Player::Two),
        _ => None,
    }
}

fn is_king(piece: i32) -> bool {
    piece == ONE_KING || piece == TWO_KING
}

fn promoted(piece: i32) -> i32 {
    match piece {
        ONE_MAN => ONE_KING,
        TWO_MAN => TWO_KING,
        other => other,
    }
}

fn directions(piece: i32) -> &'static [(i32, i32)] {
    if is_king(piece) {
        &KING_DIRS
    } else if owner(piece) == Some(Player::One) {
        &UP_DIRS
    } else {
        &DOWN_DIRS
    }
}

impl fmt::Display for CheckersState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            write!(f, "|")?;
            for c in 0..self.cols {
                let symbol = match self.board[r * self.cols + c] {
                    ONE_MAN => "x",
                    TWO_MAN => "o",
                    ONE_KING => "X",
                    TWO_KING => "O",
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

impl GameState for CheckersState {
    type Move = CheckersMove;

    /// Capture moves are mandatory: whenever any piece of `player` can
    /// jump, only jump moves are returned. Pieces are scanned in
    /// row-major order.
    fn valid_moves(&self, player: Player) -> Vec<Self::Move> {
        let mut captures = Vec::new();
        let mut simples = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let piece = self.board[r * self.cols + c];
                if owner(piece) != Some(player) {
                    continue;
                }
                captures.extend(self.capture_sequences(&self.board, r, c, piece, player));
                simples.extend(self.simple_moves(r, c, piece));
            }
        }
        if captures.is_empty() {
            simples
        } else {
            captures
        }
    }

    fn drop_piece(&mut self, mv: &Self::Move, player: Player) -> Result<MoveResult, InvalidMove> {
        if mv.path.len() < 2 {
            return Err(InvalidMove::ShortPath);
        }
        for &(r, c) in mv.path.iter().chain(mv.captures.iter()) {
            if r >= self.rows || c >= self.cols {
                return Err(InvalidMove::OffBoard(r, c));
            }
        }
        let (origin_r, origin_c) = mv.path[0];
        let piece = self.board[origin_r * self.cols + origin_c];
        if owner(piece) != Some(player) {
            return Err(InvalidMove::NotOwnPiece(origin_r, origin_c));
        }

        self.board[origin_r * self.cols + origin_c] = EMPTY;
        for &(r, c) in &mv.captures {
            self.board[r * self.cols + c] = EMPTY;
        }
        let (end_r, end_c) = mv.path[mv.path.len() - 1];
        let mut final_piece = if is_king(piece) { piece } else { player.token() };
        if mv.promotes || self.will_promote(final_piece, end_r) {
            final_piece = promoted(final_piece);
        }
        self.board[end_r * self.cols + end_c] = final_piece;
        self.move_count += 1;
        Ok(MoveResult { row: end_r, col: end_c, player })
    }

    fn game_over(&self) -> (bool, Option<Player>) {
        if self.check_win(Player::One) {
            return (true, Some(Player::One));
        }
        if self.check_win(Player::Two) {
            return (true, Some(Player::Two));
        }
        if self.check_draw() {
            return (true, None);
        }
        (false, None)
    }
}

impl CheckersState {
    /// Creates a board in the standard starting position.
    pub fn new() -> Self {
        let mut state = CheckersState {
            board: vec![EMPTY; 8 * 8],
            rows: 8,
            cols: 8,
            move_count: 0,
        };
        state.reset();
        state
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Restores the starting position: Two's men on the dark squares of
    /// the top three rows, One's on the dark squares of the bottom three.
    pub fn reset(&mut self) {
        self.board.fill(EMPTY);
        for r in 0..3 {
            for c in 0..self.cols {
                if (r + c) % 2 == 1 {
                    self.board[r * self.cols + c] = TWO_MAN;
                }
            }
        }
        for r in self.rows - 3..self.rows {
            for c in 0..self.cols {
                if (r + c) % 2 == 1 {
                    self.board[r * self.cols + c] = ONE_MAN;
                }
            }
        }
        self.move_count = 0;
    }

    /// True while no move has been played from the starting position.
    pub fn is_initial(&self) -> bool {
        self.move_count == 0
    }

    fn will_promote(&self, piece: i32, row: usize) -> bool {
        if is_king(piece) {
            return false;
        }
        match owner(piece) {
            Some(Player::One) => row == 0,
            Some(Player::Two) => row == self.rows - 1,
            None => false,
        }
    }

    /// Enumerates every jump chain for the piece at `(r, c)` on `grid`,
    /// depth-first. Each chain extends as far as it can: a single jump
    /// is only produced when no further jump exists from its landing
    /// square. Jumped pieces are cleared from a scratch grid so a chain
    /// cannot capture the same piece twice, and a man reaching the far
    /// row mid-chain continues with king directions.
    fn capture_sequences(
        &self,
        grid: &[i32],
        r: usize,
        c: usize,
        piece: i32,
        player: Player,
    ) -> Vec<CheckersMove> {
        let mut moves = Vec::new();
        for &(dr, dc) in directions(piece) {
            let land_r = r as i32 + 2 * dr;
            let land_c = c as i32 + 2 * dc;
            if land_r < 0 || land_r >= self.rows as i32 || land_c < 0 || land_c >= self.cols as i32 {
                continue;
            }
            let land_r = land_r as usize;
            let land_c = land_c as usize;
            let mid_r = (r as i32 + dr) as usize;
            let mid_c = (c as i32 + dc) as usize;
            if owner(grid[mid_r * self.cols + mid_c]) != Some(player.opponent()) {
                continue;
            }
            if grid[land_r * self.cols + land_c] != EMPTY {
                continue;
            }

            let mut scratch = grid.to_vec();
            scratch[r * self.cols + c] = EMPTY;
            scratch[mid_r * self.cols + mid_c] = EMPTY;
            let promotes_here = self.will_promote(piece, land_r);
            let next_piece = if promotes_here { promoted(piece) } else { piece };
            scratch[land_r * self.cols + land_c] = next_piece;

            let continuations = self.capture_sequences(&scratch, land_r, land_c, next_piece, player);
            if continuations.is_empty() {
                moves.push(CheckersMove {
                    path: vec![(r, c), (land_r, land_c)],
                    captures: vec![(mid_r, mid_c)],
                    promotes: promotes_here,
                });
            } else {
                for seq in continuations {
                    let mut path = vec![(r, c)];
                    path.extend(seq.path);
                    let mut captures = vec![(mid_r, mid_c)];
                    captures.extend(seq.captures);
                    moves.push(CheckersMove {
                        path,
                        captures,
                        promotes: promotes_here || seq.promotes,
                    });
                }
            }
        }
        moves
    }

    /// One-step diagonal moves for the piece at `(r, c)`.
    fn simple_moves(&self, r: usize, c: usize, piece: i32) -> Vec<CheckersMove> {
        let mut moves = Vec::new();
        for &(dr, dc) in directions(piece) {
            let nr = r as i32 + dr;
            let nc = c as i32 + dc;
            if nr < 0 || nr >= self.rows as i32 || nc < 0 || nc >= self.cols as i32 {
                continue;
            }
            let nr = nr as usize;
            let nc = nc as usize;
            if self.board[nr * self.cols + nc] != EMPTY {
                continue;
            }
            moves.push(CheckersMove {
                path: vec![(r, c), (nr, nc)],
                captures: Vec::new(),
                promotes: self.will_promote(piece, nr),
            });
        }
        moves
    }

    /// `player` has won once the opponent has no piece or no move left.
    fn check_win(&self, player: Player) -> bool {
        let opponent = player.opponent();
        let pieces = self
            .board
            .iter()
            .filter(|&&piece| owner(piece) == Some(opponent))
            .count();
        pieces == 0 || self.valid_moves(opponent).is_empty()
    }

    fn check_draw(&self) -> bool {
        self.valid_moves(Player::One).is_empty() && self.valid_moves(Player::Two).is_empty()
    }
}

impl Default for CheckersState {
    fn default() -> Self {
        CheckersState::new()
    }
}

/// Heuristic for [`CheckersState`]. Decided games dominate everything at
/// +/-10000; otherwise the score is the difference of the two sides'
/// sums of material (60 per man, 100 per king), advancement (2 per row
/// covered toward the promotion row, kings included), mobility (6 per
/// legal move), and central control (5 per piece in the middle 4x4).
pub struct CheckersEvaluator;

impl Evaluator<CheckersState> for CheckersEvaluator {
    fn evaluate(&self, state: &CheckersState, player: Player) -> i32 {
        let (over, winner) = state.game_over();
        if over {
            return match winner {
                Some(w) if w == player => 10_000,
                Some(_) => -10_000,
                None => 0,
            };
        }
        side_score(state, player) - side_score(state, player.opponent())
    }
}

fn side_score(state: &CheckersState, player: Player) -> i32 {
    let mut score = 0;
    for r in 0..state.rows {
        for c in 0..state.cols {
            let piece = state.board[r * state.cols + c];
            if owner(piece) != Some(player) {
                continue;
            }
            score += if is_king(piece) { 100 } else { 60 };
            let toward_promotion = match player {
                Player::One => state.rows - 1 - r,
                Player::Two => r,
            };
            score += 2 * toward_promotion as i32;
            if (2..6).contains(&r) && (2..6).contains(&c) {
                score += 5;
            }
        }
    }
    score + 6 * state.valid_moves(player).len() as i32
}
