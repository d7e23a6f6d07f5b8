use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

use crate::games::SessionRng;
use crate::log;
use super::broadcaster::{GameBroadcaster, GameOverNotification};
use super::bot_controller::calculate_move;
use super::game_state::{GameSnapshot, Scoreboard, TicTacToeGameState};
use super::settings::TicTacToeSettings;
use super::types::{BotType, GameMode, Mark};

pub struct TicTacToeSessionSettings {
    pub mode: GameMode,
    pub human_mark: Mark,
    pub bot_type: BotType,
    pub thinking_delay: Duration,
    pub seed: Option<u64>,
}

impl From<&TicTacToeSettings> for TicTacToeSessionSettings {
    fn from(settings: &TicTacToeSettings) -> Self {
        Self {
            mode: settings.mode,
            human_mark: settings.human_mark,
            bot_type: settings.bot_type,
            thinking_delay: settings.thinking_delay(),
            seed: settings.seed,
        }
    }
}

#[derive(Clone)]
pub struct TicTacToeSessionState {
    pub game_state: Arc<Mutex<TicTacToeGameState>>,
    pub bot_type: BotType,
    pub thinking_delay: Duration,
    pub turn_notify: Arc<Notify>,
    rng: Arc<Mutex<SessionRng>>,
    shutdown: Arc<AtomicBool>,
}

impl TicTacToeSessionState {
    pub fn create(settings: &TicTacToeSessionSettings) -> Self {
        let game_state = TicTacToeGameState::new(settings.mode, settings.human_mark);
        let rng = SessionRng::from_seed_or_random(settings.seed);
        log!(
            "Session created: mode {}, bot {:?}, seed {}",
            settings.mode,
            settings.bot_type,
            rng.seed()
        );

        Self {
            game_state: Arc::new(Mutex::new(game_state)),
            bot_type: settings.bot_type,
            thinking_delay: settings.thinking_delay,
            turn_notify: Arc::new(Notify::new()),
            rng: Arc::new(Mutex::new(rng)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn place_mark(&self, index: usize) -> Result<(), String> {
        self.game_state.lock().await.place_mark(index)?;
        self.turn_notify.notify_one();
        Ok(())
    }

    pub async fn reset(&self) {
        let game_number = {
            let mut game_state = self.game_state.lock().await;
            game_state.reset();
            game_state.game_number
        };
        log!("Game reset, starting game {}", game_number);
        self.turn_notify.notify_one();
    }

    pub async fn set_mode(&self, mode: GameMode) {
        self.game_state.lock().await.set_mode(mode);
        log!("Mode switched to {}", mode);
        self.turn_notify.notify_one();
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.turn_notify.notify_one();
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

pub struct TicTacToeSession;

impl TicTacToeSession {
    /// Drives games until `shutdown` is called and returns the final scoreboard.
    pub async fn run<B: GameBroadcaster>(
        session_state: TicTacToeSessionState,
        broadcaster: B,
    ) -> Scoreboard {
        let mut announced_game = None;
        let mut last_broadcast: Option<GameSnapshot> = None;

        while !session_state.is_shutting_down() {
            let (snapshot, is_bot_turn) = {
                let game_state = session_state.game_state.lock().await;
                (game_state.snapshot(), game_state.is_computer_turn())
            };

            // A permit stored while the computer was thinking wakes us with nothing new.
            if last_broadcast.as_ref() == Some(&snapshot) {
                session_state.turn_notify.notified().await;
                continue;
            }

            broadcaster.broadcast_state(snapshot.clone()).await;
            last_broadcast = Some(snapshot.clone());

            if snapshot.result.is_over() {
                if announced_game != Some(snapshot.game_number) {
                    announced_game = Some(snapshot.game_number);
                    log!("Game {} finished: {}", snapshot.game_number, snapshot.result);
                    broadcaster
                        .broadcast_game_over(GameOverNotification::from_snapshot(&snapshot))
                        .await;
                }
                session_state.turn_notify.notified().await;
                continue;
            }

            if is_bot_turn {
                play_bot_turn(&session_state).await;
            } else {
                session_state.turn_notify.notified().await;
            }
        }

        let scoreboard = session_state.game_state.lock().await.scoreboard;
        log!(
            "Session closed: X {} / O {} / draws {}",
            scoreboard.x_wins,
            scoreboard.o_wins,
            scoreboard.draws
        );
        scoreboard
    }
}

async fn play_bot_turn(session_state: &TicTacToeSessionState) {
    let (bot_input, game_number) = {
        let game_state = session_state.game_state.lock().await;
        (game_state.bot_input(), game_state.game_number)
    };

    if !session_state.thinking_delay.is_zero() {
        tokio::time::sleep(session_state.thinking_delay).await;
    }

    let bot_type = session_state.bot_type;
    let rng = session_state.rng.clone();
    let calculated_move = tokio::task::spawn_blocking(move || {
        let mut rng = rng.blocking_lock();
        calculate_move(bot_type, bot_input, &mut rng)
    })
    .await;

    let index = match calculated_move {
        Ok(Some(index)) => index,
        Ok(None) => {
            log!("Computer found no move in game {}", game_number);
            return;
        }
        Err(e) => {
            log!("Computer move task failed: {}", e);
            return;
        }
    };

    let mut game_state = session_state.game_state.lock().await;
    // Reset or mode switch while thinking.
    if game_state.game_number != game_number {
        log!("Dropping stale computer move for game {}", game_number);
        return;
    }

    match game_state.apply_computer_move(index) {
        Ok(()) => log!("Computer ({}) played {}", game_state.computer_mark, index),
        Err(e) => log!("Computer move {} rejected: {}", index, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::GameResult;
    use crate::logger;
    use tokio::sync::mpsc;

    #[derive(Debug)]
    enum Event {
        State(GameSnapshot),
        GameOver(GameOverNotification),
    }

    #[derive(Clone)]
    struct ChannelBroadcaster {
        tx: mpsc::UnboundedSender<Event>,
    }

    impl GameBroadcaster for ChannelBroadcaster {
        async fn broadcast_state(&self, state: GameSnapshot) {
            let _ = self.tx.send(Event::State(state));
        }

        async fn broadcast_game_over(&self, notification: GameOverNotification) {
            let _ = self.tx.send(Event::GameOver(notification));
        }
    }

    fn settings(mode: GameMode, thinking_delay: Duration) -> TicTacToeSessionSettings {
        TicTacToeSessionSettings {
            mode,
            human_mark: Mark::X,
            bot_type: BotType::Minimax,
            thinking_delay,
            seed: Some(1),
        }
    }

    async fn next_state(
        rx: &mut mpsc::UnboundedReceiver<Event>,
        pred: impl Fn(&GameSnapshot) -> bool,
    ) -> GameSnapshot {
        tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                match rx.recv().await {
                    Some(Event::State(s)) if pred(&s) => return s,
                    Some(_) => continue,
                    None => panic!("broadcaster closed"),
                }
            }
        })
        .await
        .expect("timed out waiting for state")
    }

    fn start(
        mode: GameMode,
    ) -> (
        TicTacToeSessionState,
        mpsc::UnboundedReceiver<Event>,
        tokio::task::JoinHandle<Scoreboard>,
    ) {
        start_with_delay(mode, Duration::ZERO)
    }

    fn start_with_delay(
        mode: GameMode,
        thinking_delay: Duration,
    ) -> (
        TicTacToeSessionState,
        mpsc::UnboundedReceiver<Event>,
        tokio::task::JoinHandle<Scoreboard>,
    ) {
        logger::init_logger(Some("test".to_string()));
        let state = TicTacToeSessionState::create(&settings(mode, thinking_delay));
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(TicTacToeSession::run(
            state.clone(),
            ChannelBroadcaster { tx },
        ));
        (state, rx, handle)
    }

    #[tokio::test]
    async fn test_computer_answers_human_move() {
        let (state, mut rx, handle) = start(GameMode::VsComputer);

        next_state(&mut rx, |s| !s.is_computer_turn).await;
        state.place_mark(0).await.unwrap();

        let after = next_state(&mut rx, |s| s.board.count(Mark::O) == 1).await;
        assert_eq!(after.current_mark, Mark::X);
        assert!(!after.is_computer_turn);
        assert_eq!(after.board.count(Mark::X), 1);

        state.shutdown();
        let scoreboard = handle.await.unwrap();
        assert_eq!(scoreboard, Scoreboard::default());
    }

    #[tokio::test]
    async fn test_human_never_wins_full_game() {
        let (state, mut rx, handle) = start(GameMode::VsComputer);

        let notification = tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                match rx.recv().await {
                    Some(Event::State(s)) if !s.is_computer_turn && !s.result.is_over() => {
                        let index = s.board.available_moves()[0];
                        state.place_mark(index).await.unwrap();
                    }
                    Some(Event::GameOver(n)) => return n,
                    Some(_) => continue,
                    None => panic!("broadcaster closed"),
                }
            }
        })
        .await
        .expect("game did not finish");

        assert_ne!(notification.result.winner(), Some(Mark::X));
        assert_eq!(notification.game_number, 1);

        state.shutdown();
        let scoreboard = handle.await.unwrap();
        assert_eq!(scoreboard.x_wins, 0);
        assert_eq!(scoreboard.o_wins + scoreboard.draws, 1);
    }

    #[tokio::test]
    async fn test_pvp_game_over_then_reset() {
        let (state, mut rx, handle) = start(GameMode::Pvp);

        for index in [0, 3, 1, 4, 2] {
            state.place_mark(index).await.unwrap();
        }

        let notification = tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                if let Some(Event::GameOver(n)) = rx.recv().await {
                    return n;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(notification.result.winner(), Some(Mark::X));
        assert!(!notification.computer_won);

        state.reset().await;
        let fresh = next_state(&mut rx, |s| s.game_number == 2).await;
        assert_eq!(fresh.result, GameResult::InProgress);
        assert_eq!(fresh.board.available_moves().len(), 9);

        state.shutdown();
        assert_eq!(handle.await.unwrap().x_wins, 1);
    }

    #[tokio::test]
    async fn test_mode_switch_resets_game() {
        let (state, mut rx, handle) = start(GameMode::Pvp);

        state.place_mark(4).await.unwrap();
        state.set_mode(GameMode::VsComputer).await;

        let switched = next_state(&mut rx, |s| s.mode == GameMode::VsComputer).await;
        assert_eq!(switched.game_number, 2);
        assert_eq!(switched.last_move, None);
        assert!(state.place_mark(4).await.is_ok());

        state.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_while_thinking_broadcasts_new_game_once() {
        let (state, mut rx, handle) =
            start_with_delay(GameMode::VsComputer, Duration::from_millis(200));

        next_state(&mut rx, |s| !s.is_computer_turn).await;
        state.place_mark(0).await.unwrap();
        next_state(&mut rx, |s| s.is_computer_turn).await;

        state.reset().await;
        tokio::time::sleep(Duration::from_millis(800)).await;

        state.shutdown();
        handle.await.unwrap();

        let mut game_two_states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Event::State(s) = event
                && s.game_number == 2
            {
                game_two_states.push(s);
            }
        }

        assert_eq!(game_two_states.len(), 1);
        assert_eq!(game_two_states[0].board.available_moves().len(), 9);
        assert!(!game_two_states[0].is_computer_turn);
    }
}
