use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIDE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" | "x" => Ok(Mark::X),
            "O" | "o" => Ok(Mark::O),
            _ => Err(format!("Invalid mark '{}', expected X or O", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }

    pub fn as_char(&self) -> char {
        match self.mark() {
            Some(mark) => mark.as_char(),
            None => '_',
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            row: index / BOARD_SIDE,
            col: index % BOARD_SIDE,
        }
    }

    pub fn to_index(&self) -> usize {
        self.row * BOARD_SIDE + self.col
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the eight winning triples, cells in ascending index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WinningLine {
    pub cells: [usize; 3],
}

impl WinningLine {
    pub const fn new(cells: [usize; 3]) -> Self {
        Self { cells }
    }

    pub fn start(&self) -> Position {
        Position::from_index(self.cells[0])
    }

    pub fn end(&self) -> Position {
        Position::from_index(self.cells[2])
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }
}

impl fmt::Display for WinningLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.cells;
        write!(f, "{}-{}-{}", a, b, c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win { mark: Mark, line: WinningLine },
    Draw,
}

impl GameResult {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameResult::Win { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::InProgress => write!(f, "in progress"),
            GameResult::Win { mark, line } => write!(f, "{} wins on {}", mark, line),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    VsComputer,
    Pvp,
}

impl GameMode {
    pub fn toggled(&self) -> GameMode {
        match self {
            GameMode::VsComputer => GameMode::Pvp,
            GameMode::Pvp => GameMode::VsComputer,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::VsComputer => write!(f, "vs computer"),
            GameMode::Pvp => write!(f, "player vs player"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotType {
    #[default]
    Minimax,
    Random,
}

impl std::str::FromStr for BotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(BotType::Minimax),
            "random" => Ok(BotType::Random),
            _ => Err(format!("Unknown bot type '{}', expected minimax or random", s)),
        }
    }
}
