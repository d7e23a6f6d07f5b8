use super::board::Board;
use super::types::{GameResult, WinningLine};

/// Rows, then columns, then the two diagonals. Order decides which line is
/// reported when more than one is complete.
pub const LINES: [WinningLine; 8] = [
    WinningLine::new([0, 1, 2]),
    WinningLine::new([3, 4, 5]),
    WinningLine::new([6, 7, 8]),
    WinningLine::new([0, 3, 6]),
    WinningLine::new([1, 4, 7]),
    WinningLine::new([2, 5, 8]),
    WinningLine::new([0, 4, 8]),
    WinningLine::new([2, 4, 6]),
];

pub fn check_win_with_line(board: &Board) -> Option<WinningLine> {
    let cells = board.cells();
    LINES.iter().copied().find(|line| {
        let [a, b, c] = line.cells;
        !cells[a].is_empty() && cells[a] == cells[b] && cells[a] == cells[c]
    })
}

pub fn evaluate(board: &Board) -> GameResult {
    if let Some(line) = check_win_with_line(board)
        && let Some(mark) = board.cells()[line.cells[0]].mark()
    {
        return GameResult::Win { mark, line };
    }

    if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::InProgress
    }
}
