use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::types::{BotType, GameMode, Mark};

pub const DEFAULT_THINKING_DELAY_MS: u64 = 800;
pub const MAX_THINKING_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicTacToeSettings {
    pub mode: GameMode,
    pub human_mark: Mark,
    pub computer_mark: Mark,
    #[serde(default)]
    pub bot_type: BotType,
    pub thinking_delay_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TicTacToeSettings {
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

impl Validate for TicTacToeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.human_mark == self.computer_mark {
            return Err(format!(
                "human_mark and computer_mark must differ, both are {}",
                self.human_mark
            ));
        }
        if self.thinking_delay_ms > MAX_THINKING_DELAY_MS {
            return Err(format!(
                "thinking_delay_ms must not exceed {}, got {}",
                MAX_THINKING_DELAY_MS, self.thinking_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for TicTacToeSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::VsComputer,
            human_mark: Mark::X,
            computer_mark: Mark::O,
            bot_type: BotType::Minimax,
            thinking_delay_ms: DEFAULT_THINKING_DELAY_MS,
            seed: None,
        }
    }
}
