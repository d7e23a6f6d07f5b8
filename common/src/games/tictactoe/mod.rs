mod board;
mod bot_controller;
mod broadcaster;
mod game_state;
mod session;
mod settings;
mod types;
mod win_detector;

pub use board::Board;
pub use bot_controller::{BotInput, calculate_minimax_move, calculate_move, score_moves};
pub use broadcaster::{GameBroadcaster, GameOverNotification};
pub use game_state::{GameSnapshot, Scoreboard, TicTacToeGameState};
pub use session::{TicTacToeSession, TicTacToeSessionSettings, TicTacToeSessionState};
pub use settings::TicTacToeSettings;
pub use types::{BOARD_SIDE, BotType, CELL_COUNT, Cell, GameMode, GameResult, Mark, Position, WinningLine};
pub use win_detector::{LINES, check_win_with_line, evaluate};

/// Best move for `computer_mark`, or `None` when the board is full.
pub fn best_move(board: &Board, computer_mark: Mark) -> Option<usize> {
    calculate_minimax_move(board, computer_mark)
}
