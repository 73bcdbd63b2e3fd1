#![no_std]

/// Checks for a line win in a grid-based game (Connect4, TicTacToe, etc.)
///
/// # Arguments
/// * `board` - The board data as a flat row-major slice
/// * `width` - Board width
/// * `height` - Board height
/// * `player` - The cell value to check for (e.g., 1 or 2)
/// * `line_size` - Number of consecutive pieces needed to win
pub fn check_line_win(board: &[i32], width: usize, height: usize, player: i32, line_size: usize) -> bool {
    let w = width as i32;
    let h = height as i32;
    let n = line_size as i32;

    // Helper to get cell value
    let get_cell = |x: i32, y: i32| -> i32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            return 0;
        }
        let idx = (y * w + x) as usize;
        if idx < board.len() {
            board[idx]
        } else {
            0
        }
    };

    // Horizontal
    for y in 0..h {
        for x in 0..=(w - n) {
            let mut match_len = 0;
            for k in 0..n {
                if get_cell(x + k, y) == player {
                    match_len += 1;
                } else {
                    break;
                }
            }
            if match_len == n {
                return true;
            }
        }
    }

    // Vertical
    for x in 0..w {
        for y in 0..=(h - n) {
            let mut match_len = 0;
            for k in 0..n {
                if get_cell(x, y + k) == player {
                    match_len += 1;
                } else {
                    break;
                }
            }
            if match_len == n {
                return true;
            }
        }
    }

    // Diagonal (TL-BR)
    for y in 0..=(h - n) {
        for x in 0..=(w - n) {
            let mut match_len = 0;
            for k in 0..n {
                if get_cell(x + k, y + k) == player {
                    match_len += 1;
                } else {
                    break;
                }
            }
            if match_len == n {
                return true;
            }
        }
    }

    // Diagonal (TR-BL)
    for y in 0..=(h - n) {
        for x in (n - 1)..w {
            let mut match_len = 0;
            for k in 0..n {
                if get_cell(x - k, y + k) == player {
                    match_len += 1;
                } else {
                    break;
                }
            }
            if match_len == n {
                return true;
            }
        }
    }

    false
}

/// Visits every `line_size` window of the board in all four line
/// orientations, reporting how many cells belong to `player`, how many
/// to any opposing piece, and how many are empty.
///
/// Heuristic evaluators sum pattern scores over these counts. Opposing
/// cells are any non-zero value other than `player`, so boards that
/// encode several piece kinds per side still count correctly.
pub fn scan_windows<F>(board: &[i32], width: usize, height: usize, player: i32, line_size: usize, mut visit: F)
where
    F: FnMut(usize, usize, usize),
{
    let w = width as i32;
    let h = height as i32;
    let n = line_size as i32;

    let get_cell = |x: i32, y: i32| -> i32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            return 0;
        }
        let idx = (y * w + x) as usize;
        if idx < board.len() {
            board[idx]
        } else {
            0
        }
    };

    // One window per (start, direction) pair whose far end stays on the
    // board; (-1, 1) covers the TR-BL diagonals.
    for y in 0..h {
        for x in 0..w {
            for &(dx, dy) in &[(1, 0), (0, 1), (1, 1), (-1, 1)] {
                let end_x = x + (n - 1) * dx;
                let end_y = y + (n - 1) * dy;
                if end_x < 0 || end_x >= w || end_y < 0 || end_y >= h {
                    continue;
                }
                let mut own = 0usize;
                let mut opp = 0usize;
                let mut empty = 0usize;
                for k in 0..n {
                    let v = get_cell(x + k * dx, y + k * dy);
                    if v == player {
                        own += 1;
                    } else if v == 0 {
                        empty += 1;
                    } else {
                        opp += 1;
                    }
                }
                visit(own, opp, empty);
            }
        }
    }
}
