use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use std::sync::Arc;
use tileforge::config::Config;
use tileforge::puzzle::TileLibrary;
use tileforge::scorer::Scorer;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        global = true,
        short,
        long,
        default_value = "data/eternity2/eternity2_256.csv"
    )]
    tiles: String,

    /// JSON file with puzzle and annealing parameters.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Search(cmd::search::SearchArgs),
    Score(cmd::score::ScoreArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    info!("🚀 Initializing TileForge...");

    // 1. Resolve config: file as base, explicit CLI flags on top
    let (cli_config, sub_matches) = match &cli.command {
        Commands::Search(args) => (&args.config, matches.subcommand_matches("search")),
        Commands::Score(args) => (&args.config, matches.subcommand_matches("score")),
    };

    let config = match (&cli.config, sub_matches) {
        (Some(path), Some(sub)) => {
            info!("⚙️  Loading config from: {}", path);
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ Could not load config '{}': {}", path, e);
                process::exit(1);
            });
            file_config.merge_from_cli(cli_config, sub);
            file_config
        }
        _ => cli_config.clone(),
    };

    if let Err(e) = config.validate() {
        error!("❌ {}", e);
        process::exit(1);
    }

    // 2. Tiles and scorer (fatal before any chain starts)
    let library = TileLibrary::load_from_file(&cli.tiles).unwrap_or_else(|e| {
        error!("❌ FATAL ERROR LOADING TILES: {}", e);
        process::exit(1);
    });

    let scorer = match Scorer::from_params(Arc::new(library), &config.puzzle) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("❌ FATAL ERROR INITIALIZING SCORER: {}", e);
            process::exit(1);
        }
    };

    // 3. Execute
    let result = match cli.command {
        Commands::Search(args) => cmd::search::run(args, config, scorer),
        Commands::Score(args) => cmd::score::run(args, config, scorer),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
