use common::config::Validate;
use common::games::tictactoe::{
    Board, BotType, GameMode, GameResult, Mark, Position, TicTacToeSettings, best_move, evaluate,
    score_moves,
};

pub fn parse_board(board: &str) -> Result<Board, String> {
    board.parse::<Board>()
}

pub fn evaluate_command(board: &Board) -> String {
    match evaluate(board) {
        GameResult::InProgress => "in progress".to_string(),
        GameResult::Draw => "draw".to_string(),
        GameResult::Win { mark, line } => format!("win {} {}", mark, line),
    }
}

pub fn best_move_command(board: &Board, computer_mark: Mark, explain: bool) -> String {
    let mut output = String::new();

    if explain {
        for (index, score) in score_moves(board, computer_mark) {
            output.push_str(&format!(
                "cell {} {}: score {}\n",
                index,
                Position::from_index(index),
                score
            ));
        }
    }

    match best_move(board, computer_mark) {
        Some(index) => output.push_str(&format!("{} {}", index, Position::from_index(index))),
        None => output.push_str("none"),
    }

    output
}

/// Applies `play` flags on top of the configured settings and validates the result.
pub fn play_settings(
    base: &TicTacToeSettings,
    pvp: bool,
    bot: Option<BotType>,
    delay_ms: Option<u64>,
    seed: Option<u64>,
) -> Result<TicTacToeSettings, String> {
    let mut settings = base.clone();
    if pvp {
        settings.mode = GameMode::Pvp;
    }
    if let Some(bot) = bot {
        settings.bot_type = bot;
    }
    if let Some(delay_ms) = delay_ms {
        settings.thinking_delay_ms = delay_ms;
    }
    if seed.is_some() {
        settings.seed = seed;
    }
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_output() {
        let board = parse_board("XOXOXOO_X").unwrap();
        assert_eq!(evaluate_command(&board), "win X 0-4-8");
        assert_eq!(evaluate_command(&parse_board("_________").unwrap()), "in progress");
        assert_eq!(evaluate_command(&parse_board("XOXXOOOXX").unwrap()), "draw");
    }

    #[test]
    fn test_best_move_output() {
        let board = parse_board("XX__O____").unwrap();
        assert_eq!(best_move_command(&board, Mark::O, false), "2 (0, 2)");

        let full = parse_board("XOXXOOOXX").unwrap();
        assert_eq!(best_move_command(&full, Mark::O, false), "none");
    }

    #[test]
    fn test_best_move_explain_lists_every_empty_cell() {
        let board = parse_board("XOXOXO_X_").unwrap();
        let output = best_move_command(&board, Mark::O, true);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("cell 6 (2, 0)"));
        assert!(lines[1].starts_with("cell 8 (2, 2)"));
    }

    #[test]
    fn test_play_settings_applies_overrides() {
        let base = TicTacToeSettings::default();
        let settings = play_settings(&base, true, Some(BotType::Random), Some(0), Some(7)).unwrap();
        assert_eq!(settings.mode, GameMode::Pvp);
        assert_eq!(settings.bot_type, BotType::Random);
        assert_eq!(settings.thinking_delay_ms, 0);
        assert_eq!(settings.seed, Some(7));

        assert_eq!(play_settings(&base, false, None, None, None).unwrap(), base);
    }

    #[test]
    fn test_play_settings_rejects_out_of_range_delay() {
        let base = TicTacToeSettings::default();
        let result = play_settings(&base, false, None, Some(3_600_000), None);
        assert!(result.unwrap_err().contains("thinking_delay_ms"));
    }
}
