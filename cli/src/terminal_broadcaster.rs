use common::games::tictactoe::{
    BOARD_SIDE, Board, GameBroadcaster, GameMode, GameOverNotification, GameResult, GameSnapshot,
};

#[derive(Clone, Default)]
pub struct TerminalBroadcaster;

impl TerminalBroadcaster {
    pub fn new() -> Self {
        Self
    }
}

/// Empty cells show their index so the player knows what to type.
pub fn render_board(board: &Board) -> String {
    board
        .cells()
        .chunks(BOARD_SIDE)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell.mark() {
                    Some(mark) => mark.to_string(),
                    None => (row * BOARD_SIDE + col).to_string(),
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n--+---+--\n")
}

pub fn status_line(snapshot: &GameSnapshot) -> String {
    let vs_computer = snapshot.mode == GameMode::VsComputer;
    match snapshot.result {
        GameResult::Draw => "Draw game!".to_string(),
        GameResult::Win { mark, .. } if !vs_computer => format!("Player {} wins!", mark),
        GameResult::Win { mark, .. } if mark == snapshot.computer_mark => {
            "Computer won!".to_string()
        }
        GameResult::Win { .. } => "You won!".to_string(),
        GameResult::InProgress if snapshot.is_computer_turn => {
            "Computer is thinking...".to_string()
        }
        GameResult::InProgress if vs_computer => {
            format!("Your turn ({})", snapshot.current_mark)
        }
        GameResult::InProgress => format!("Player {}'s turn", snapshot.current_mark),
    }
}

impl GameBroadcaster for TerminalBroadcaster {
    async fn broadcast_state(&self, state: GameSnapshot) {
        println!(
            "\nGame {} ({})\n{}\n{}",
            state.game_number,
            state.mode,
            render_board(&state.board),
            status_line(&state)
        );
    }

    async fn broadcast_game_over(&self, notification: GameOverNotification) {
        if let GameResult::Win { line, .. } = notification.result {
            println!("Winning line: {} (from {} to {})", line, line.start(), line.end());
        }
        let score = notification.scoreboard;
        println!(
            "Score: X {} / O {} / draws {}. Type r to play again or q to quit.",
            score.x_wins, score.o_wins, score.draws
        );
    }
}
