mod commands;
mod config;
mod terminal_broadcaster;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::games::tictactoe::{
    BotType, Mark, TicTacToeSession, TicTacToeSessionSettings, TicTacToeSessionState,
};
use common::{log, logger};
use tokio::io::{AsyncBufReadExt, BufReader};

use terminal_broadcaster::TerminalBroadcaster;

#[derive(Parser)]
#[command(name = "tictactoe", about = "Tic-tac-toe with a perfect-play computer opponent")]
struct Args {
    #[arg(long, global = true)]
    use_log_prefix: bool,

    /// YAML config file; defaults to tictactoe_config.yaml next to the binary.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report win, draw or in progress for a 9-character board such as "XX_OO____".
    Evaluate { board: String },
    /// Print the computer's move for a board.
    BestMove {
        board: String,
        /// Mark the computer plays; defaults to the configured computer mark.
        #[arg(long)]
        computer: Option<Mark>,
        /// List the minimax score of every empty cell.
        #[arg(long)]
        explain: bool,
    },
    /// Play in the terminal: cell index 0-8, r = reset, m = switch mode, q = quit.
    Play {
        #[arg(long)]
        pvp: bool,
        #[arg(long)]
        bot: Option<BotType>,
        #[arg(long)]
        delay_ms: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match config::get_config_manager(args.config.as_deref()).get_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(log_prefix(args.use_log_prefix));
            log!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };

    logger::init_logger(log_prefix(args.use_log_prefix || config.use_log_prefix));

    if let Err(e) = run_command(args.command, &config).await {
        log!("Command failed: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn run_command(
    command: Command,
    config: &config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Evaluate { board } => {
            let board = commands::parse_board(&board)?;
            println!("{}", commands::evaluate_command(&board));
        }
        Command::BestMove {
            board,
            computer,
            explain,
        } => {
            let board = commands::parse_board(&board)?;
            let computer_mark = computer.unwrap_or(config.game.computer_mark);
            println!("{}", commands::best_move_command(&board, computer_mark, explain));
        }
        Command::Play {
            pvp,
            bot,
            delay_ms,
            seed,
        } => {
            let settings = commands::play_settings(&config.game, pvp, bot, delay_ms, seed)?;
            let settings = TicTacToeSessionSettings::from(&settings);
            run_play(settings).await?;
        }
    }

    Ok(())
}

fn log_prefix(use_log_prefix: bool) -> Option<String> {
    use_log_prefix.then(|| "TicTacToe".to_string())
}

async fn run_play(settings: TicTacToeSessionSettings) -> Result<(), Box<dyn std::error::Error>> {
    let session_state = TicTacToeSessionState::create(&settings);
    let game_handle = tokio::spawn(TicTacToeSession::run(
        session_state.clone(),
        TerminalBroadcaster::new(),
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "r" | "reset" => session_state.reset().await,
            "m" | "mode" => {
                let mode = session_state.game_state.lock().await.mode.toggled();
                session_state.set_mode(mode).await;
            }
            input => match input.parse::<usize>() {
                Ok(index) => {
                    if let Err(e) = session_state.place_mark(index).await {
                        println!("{}", e);
                    }
                }
                Err(_) => println!("Unknown input '{}': use 0-8, r, m or q", input),
            },
        }
    }

    session_state.shutdown();
    let scoreboard = game_handle.await?;
    log!(
        "Final score: X {} / O {} / draws {}",
        scoreboard.x_wins,
        scoreboard.o_wins,
        scoreboard.draws
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_prefix_flag_after_subcommand() {
        let args = Args::try_parse_from(["tictactoe", "evaluate", "XX_______", "--use-log-prefix"])
            .unwrap();
        assert!(args.use_log_prefix);
        assert!(matches!(args.command, Command::Evaluate { .. }));
    }

    #[test]
    fn test_log_prefix_flag_before_subcommand() {
        let args = Args::try_parse_from(["tictactoe", "--use-log-prefix", "play", "--pvp"]).unwrap();
        assert!(args.use_log_prefix);
        assert!(matches!(args.command, Command::Play { pvp: true, .. }));
    }
}
