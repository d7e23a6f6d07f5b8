use super::board::Board;
use super::bot_controller::BotInput;
use super::types::{GameMode, GameResult, Mark, WinningLine};
use super::win_detector::evaluate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    fn record(&mut self, result: &GameResult) {
        match result {
            GameResult::Win { mark: Mark::X, .. } => self.x_wins += 1,
            GameResult::Win { mark: Mark::O, .. } => self.o_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::InProgress => {}
        }
    }
}

/// Read-only copy of the game handed to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_number: u64,
    pub board: Board,
    pub mode: GameMode,
    pub current_mark: Mark,
    pub computer_mark: Mark,
    pub result: GameResult,
    pub last_move: Option<usize>,
    pub is_computer_turn: bool,
    pub scoreboard: Scoreboard,
}

#[derive(Debug, Clone)]
pub struct TicTacToeGameState {
    pub board: Board,
    pub mode: GameMode,
    pub human_mark: Mark,
    pub computer_mark: Mark,
    pub current_mark: Mark,
    pub result: GameResult,
    pub last_move: Option<usize>,
    pub game_number: u64,
    pub scoreboard: Scoreboard,
}

impl TicTacToeGameState {
    pub fn new(mode: GameMode, human_mark: Mark) -> Self {
        Self {
            board: Board::new(),
            mode,
            human_mark,
            computer_mark: human_mark.opponent(),
            current_mark: Mark::X,
            result: GameResult::InProgress,
            last_move: None,
            game_number: 1,
            scoreboard: Scoreboard::default(),
        }
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::VsComputer
            && self.result == GameResult::InProgress
            && self.current_mark == self.computer_mark
    }

    pub fn place_mark(&mut self, index: usize) -> Result<(), String> {
        if self.result.is_over() {
            return Err("Game is already over".to_string());
        }

        if self.is_computer_turn() {
            return Err("Not your turn".to_string());
        }

        self.apply_move(index)
    }

    pub fn apply_computer_move(&mut self, index: usize) -> Result<(), String> {
        if !self.is_computer_turn() {
            return Err("Not the computer's turn".to_string());
        }

        self.apply_move(index)
    }

    fn apply_move(&mut self, index: usize) -> Result<(), String> {
        self.board.place(index, self.current_mark)?;
        self.last_move = Some(index);

        self.check_game_over();

        if self.result == GameResult::InProgress {
            self.current_mark = self.current_mark.opponent();
        }

        Ok(())
    }

    fn check_game_over(&mut self) {
        self.result = evaluate(&self.board);
        self.scoreboard.record(&self.result);
    }

    pub fn winner(&self) -> Option<Mark> {
        self.result.winner()
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        match self.result {
            GameResult::Win { line, .. } => Some(line),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_mark = Mark::X;
        self.result = GameResult::InProgress;
        self.last_move = None;
        self.game_number += 1;
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn bot_input(&self) -> BotInput {
        BotInput {
            board: self.board,
            bot_mark: self.computer_mark,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_number: self.game_number,
            board: self.board,
            mode: self.mode,
            current_mark: self.current_mark,
            computer_mark: self.computer_mark,
            result: self.result,
            last_move: self.last_move,
            is_computer_turn: self.is_computer_turn(),
            scoreboard: self.scoreboard,
        }
    }
}
