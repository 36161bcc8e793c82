//! `xo-client`: drive the xo family from the shell against a ledger REST API.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xo_client::{
    crypto::{PrivateKey, Secp256k1Signer},
    models::Game,
    Config, XoClient,
};

#[derive(Parser)]
#[command(name = "xo-client")]
#[command(about = "Play xo games on a ledger REST API", long_about = None)]
#[command(version)]
struct Cli {
    /// REST API base URL (overrides XO_REST_API_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new game
    Create { name: String },

    /// Take a space (1-9) in a game
    Take { name: String, space: u8 },

    /// List all games
    List,

    /// Show one game's board
    Show { name: String },

    /// Print the game list whenever a background refresh changes it
    Watch,

    /// Generate a new signing key
    Keygen,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xo_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Command::Keygen = cli.command {
        let key = PrivateKey::random();
        println!("private key: {}", key.hex());
        println!("public key:  {}", key.public_key_hex());
        return Ok(());
    }

    let mut config = Config::from_env()?;
    if let Some(url) = cli.url {
        config.rest_api_url = url;
    }
    config.validate()?;

    let key = match config.private_key.as_deref() {
        Some(hex) => PrivateKey::from_hex(hex).context("XO_PRIVATE_KEY is not a valid key")?,
        None => PrivateKey::random(),
    };
    let client = XoClient::new(config, Arc::new(Secp256k1Signer::new(key)))?;
    tracing::info!(
        "Using {} as {}",
        client.config().base_url(),
        client.public_key_hex()
    );

    match cli.command {
        Command::Create { name } => {
            let outcome = client.create_game(&name).await?.ensure_committed()?;
            println!("{} {}", outcome.batch_id, outcome.status);
        }
        Command::Take { name, space } => {
            let outcome = client.take_space(&name, space).await?.ensure_committed()?;
            println!("{} {}", outcome.batch_id, outcome.status);
        }
        Command::List => {
            let snapshot = client.projector().refresh_all().await?;
            print_games(&snapshot.games);
        }
        Command::Show { name } => {
            let game = client.projector().refresh_one(&name).await?;
            print_board(&game);
        }
        Command::Watch => {
            let projector = client.projector();
            let mut games_rx = projector.subscribe_games();
            let period = Duration::from_secs(client.config().refresh_interval_secs);
            let poller = projector.spawn_polling(period);
            let mut shown: Option<Vec<Game>> = None;

            loop {
                tokio::select! {
                    changed = games_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = games_rx.borrow_and_update().clone();
                        if shown.as_ref() == Some(&snapshot.games) {
                            continue;
                        }
                        println!("-- {} games", snapshot.games.len());
                        print_games(&snapshot.games);
                        shown = Some(snapshot.games);
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            poller.abort();
        }
        Command::Keygen => {}
    }

    Ok(())
}

fn print_games(games: &[Game]) {
    for game in games {
        println!("{:<24} {:<8} {}", game.name, game.game_state, game.board);
    }
}

fn print_board(game: &Game) {
    println!("{} ({})", game.name, game.game_state);
    for row in 0..3u8 {
        let cells: String = (1..=3u8)
            .map(|col| {
                game.mark_at(row * 3 + col)
                    .map(|mark| mark.as_char())
                    .unwrap_or('?')
            })
            .collect();
        println!("  {cells}");
    }
    println!("player 1: {}", display_player(&game.player1));
    println!("player 2: {}", display_player(&game.player2));
}

fn display_player(public_key: &str) -> &str {
    if public_key.is_empty() {
        "(open)"
    } else {
        public_key
    }
}
