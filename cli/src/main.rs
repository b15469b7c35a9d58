use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sapper_core::{CellCount, Coord, GameConfig, MinefieldGenerator, RandomMinefieldGenerator};
use sapper_protocol::{CreateGameRequest, GameId};
use sapper_store::{GameService, JsonFileStore};

mod play;
mod render;
mod replay;
mod settings;

use settings::{Preset, Settings};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Settings file
    #[arg(short, long, default_value = "sapper.toml")]
    config: PathBuf,

    /// Game database, overrides the settings file
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start and play a new game
    New {
        #[arg(short, long)]
        player: Option<String>,
        #[arg(long, value_enum)]
        preset: Option<Preset>,
        /// Custom width, together with --height and --mines
        #[arg(long, requires_all = ["height", "mines"])]
        width: Option<Coord>,
        #[arg(long, requires_all = ["width", "mines"])]
        height: Option<Coord>,
        #[arg(long, requires_all = ["width", "height"])]
        mines: Option<CellCount>,
        /// Force a seed instead of random
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// List stored games, newest first
    List,
    /// Print a stored game with its move log
    Show { id: GameId },
    /// Step through a stored game, one move per Enter
    Replay {
        id: GameId,
        /// Play every move without waiting
        #[arg(short, long)]
        all: bool,
    },
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = Settings::load(&args.config)?;
    let store_path = args.store.unwrap_or(settings.store.clone());
    log::debug!("Using store {}", store_path.display());
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("Could not open store {}", store_path.display()))?;
    let mut service = GameService::new(store);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match args.command {
        Command::New {
            player,
            preset,
            width,
            height,
            mines,
            seed,
        } => {
            let config = match (width, height, mines) {
                (Some(width), Some(height), Some(mines)) => {
                    GameConfig::new(width, height, mines)?
                }
                _ => preset.unwrap_or(settings.preset).config(),
            };
            let seed = seed.unwrap_or_else(random_seed);
            log::debug!("seed: {}", seed);
            let layout = RandomMinefieldGenerator::new(seed).generate(config)?;

            let id = service
                .create_game(CreateGameRequest {
                    player_name: player.unwrap_or(settings.player_name),
                    width: config.width,
                    height: config.height,
                    mines_count: layout.mine_count(),
                    mine_locations: layout.mine_indices(),
                })?
                .id;
            let status = play::run(&mut service, id, layout, stdin, stdout)?;
            log::info!("Game {} left {}", id, status);
        }
        Command::List => {
            let mut out = stdout;
            for game in service.list_games()? {
                writeln!(
                    out,
                    "#{:<4} {}  {:<12} {}x{} {} mines  {}",
                    game.id,
                    game.date,
                    game.player_name,
                    game.width,
                    game.height,
                    game.mines_count,
                    game.status
                )?;
            }
        }
        Command::Show { id } => {
            let details = service.fetch_game(id)?;
            let mut out = stdout;
            serde_json::to_writer_pretty(&mut out, &details)?;
            writeln!(out)?;
        }
        Command::Replay { id, all } => {
            let mut replay = service.replay(id)?;
            replay::run(&mut replay, all, stdin, stdout)?;
        }
    }
    Ok(())
}
