use anyhow::{bail, Context, Result};
use chess_rules::Game;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Headless driver for the rules engine.
///
/// Replays the given moves, or plays random legal moves when none are given,
/// then prints the final board.
#[derive(Parser)]
#[command(name = "chess-headless", version, about)]
struct Cli {
    /// Moves in coordinate form, e.g. `e2e4 e7e5`
    moves: Vec<String>,

    /// Number of random plies to play when no moves are given
    #[arg(long, default_value_t = 40)]
    plies: usize,

    /// Seed for random play
    #[arg(long)]
    seed: Option<u64>,
}

fn split_move(text: &str) -> Result<(&str, &str)> {
    if text.len() != 4 || !text.is_ascii() {
        bail!("expected a move like e2e4, got {text:?}");
    }
    Ok(text.split_at(2))
}

fn replay(game: &mut Game, moves: &[String]) -> Result<()> {
    for text in moves {
        let (from, to) = split_move(text)?;
        let outcome = game.commit_move(from, to).map_err(|err| {
            warn!("{} rejected: {}", text, err);
            err
        });
        let outcome = outcome.with_context(|| format!("move {} ({})", game.move_count() + 1, text))?;
        if let Some((rook_from, rook_to)) = outcome.rook_relocation {
            info!("{text}: castled, rook {rook_from} -> {rook_to}");
        }
    }
    Ok(())
}

fn play_random(game: &mut Game, plies: usize, seed: u64) -> Result<()> {
    info!("random play, seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..plies {
        let moves = game.legal_moves();
        let Some(&(from, to)) = moves.choose(&mut rng) else {
            info!("{:?} has no moves left", game.current_side_to_move());
            break;
        };
        game.commit_move(&from.to_name(), &to.to_name())
            .with_context(|| format!("generated move {from}{to}"))?;
        info!("{}. {}{}", game.move_count(), from, to);
    }
    Ok(())
}

fn main() -> Result<()> {
    let env = Env::default().filter_or("CHESS_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();
    let mut game = Game::new();

    if cli.moves.is_empty() {
        let seed = cli.seed.unwrap_or_else(rand::random);
        play_random(&mut game, cli.plies, seed)?;
    } else {
        replay(&mut game, &cli.moves)?;
    }

    println!("{}", game.board());
    println!("{:?} to move after {} moves", game.current_side_to_move(), game.move_count());
    Ok(())
}
