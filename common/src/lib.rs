pub mod config;
pub mod games;
pub mod logger;

pub use games::tictactoe::{Board, GameResult, Mark, best_move, evaluate};
