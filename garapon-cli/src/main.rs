mod config;
mod menu;
mod terminal;

use anyhow::Context;
use clap::Parser;
use garapon_core::{Arcade, Game, SystemClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "garapon")]
#[command(about = "Lottery drum game for the terminal")]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Skip the menu and play one game: mini, six, seven, power, mega or super
    #[arg(short, long)]
    game: Option<String>,

    #[command(flatten)]
    overrides: config::Overrides,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let log_level = if verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "garapon={},garapon_core={}",
        log_level, log_level
    ));

    // The game owns the terminal, so logs go to a file or to stderr.
    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::resolve(cli.config.as_deref(), &cli.overrides)?;

    if cli.dump_config {
        println!("{}", config::render(&config)?);
        return Ok(());
    }

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut arcade = Arcade::new(config, SystemClock, rng)?;
    let keys = terminal::KeyReader::spawn()?;
    let mut open = |game: Game| keys.open(game);

    match cli.game {
        Some(name) => {
            let game: Game = name.parse()?;
            let completed = arcade.play_game(game, &mut open)?;
            tracing::info!("Played {} {} times", game, completed);
        }
        None => {
            let mut menu = menu::DialogMenu::new();
            arcade.run(&mut menu, open)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_ref()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
