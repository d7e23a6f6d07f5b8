use std::future::Future;

use super::game_state::{GameSnapshot, Scoreboard};
use super::types::{GameMode, GameResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverNotification {
    pub game_number: u64,
    pub mode: GameMode,
    pub result: GameResult,
    pub computer_won: bool,
    pub scoreboard: Scoreboard,
}

impl GameOverNotification {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let computer_won = snapshot.mode == GameMode::VsComputer
            && snapshot.result.winner() == Some(snapshot.computer_mark);

        Self {
            game_number: snapshot.game_number,
            mode: snapshot.mode,
            result: snapshot.result,
            computer_won,
            scoreboard: snapshot.scoreboard,
        }
    }
}

pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, state: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        notification: GameOverNotification,
    ) -> impl Future<Output = ()> + Send;
}
