use crate::games::SessionRng;
use super::board::Board;
use super::types::{BotType, Cell, GameResult, Mark};
use super::win_detector::evaluate;

const WIN_SCORE: i32 = 10;

pub struct BotInput {
    pub board: Board,
    pub bot_mark: Mark,
}

pub fn calculate_move(bot_type: BotType, input: BotInput, rng: &mut SessionRng) -> Option<usize> {
    match bot_type {
        BotType::Random => calculate_random_move(&input, rng),
        BotType::Minimax => calculate_minimax_move(&input.board, input.bot_mark),
    }
}

fn calculate_random_move(input: &BotInput, rng: &mut SessionRng) -> Option<usize> {
    let available_moves = input.board.available_moves();
    if available_moves.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..available_moves.len());
    Some(available_moves[idx])
}

/// Perfect-play move for `bot_mark`, or `None` on a full board.
///
/// Ties go to the lowest cell index: a later move replaces the current best
/// only when it scores strictly higher.
pub fn calculate_minimax_move(board: &Board, bot_mark: Mark) -> Option<usize> {
    let mut best_move = None;
    let mut best_score = i32::MIN;

    for (index, score) in score_moves(board, bot_mark) {
        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
    }

    best_move
}

/// Minimax score of every empty cell, in index order.
pub fn score_moves(board: &Board, bot_mark: Mark) -> Vec<(usize, i32)> {
    let mut scratch = *board;

    board
        .available_moves()
        .into_iter()
        .map(|index| {
            scratch.set(index, bot_mark.into());
            let score = minimax(&mut scratch, 0, false, bot_mark);
            scratch.set(index, Cell::Empty);
            (index, score)
        })
        .collect()
}

fn minimax(board: &mut Board, depth: i32, is_maximizing: bool, bot_mark: Mark) -> i32 {
    match evaluate(board) {
        GameResult::Win { mark, .. } if mark == bot_mark => return WIN_SCORE - depth,
        GameResult::Win { .. } => return depth - WIN_SCORE,
        GameResult::Draw => return 0,
        GameResult::InProgress => {}
    }

    let mover = if is_maximizing {
        bot_mark
    } else {
        bot_mark.opponent()
    };

    let mut best = if is_maximizing { i32::MIN } else { i32::MAX };
    for index in board.available_moves() {
        board.set(index, mover.into());
        let eval = minimax(board, depth + 1, !is_maximizing, bot_mark);
        board.set(index, Cell::Empty);

        best = if is_maximizing {
            best.max(eval)
        } else {
            best.min(eval)
        };
    }

    best
}
