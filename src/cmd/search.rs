use crate::reports;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tileforge::config::Config;
use tileforge::consts::{DEFAULT_CHAINS, DEFAULT_HISTORY};
use tileforge::error::TfResult;
use tileforge::optimizer::{Coordinator, RunBudget, SearchOptions};
use tileforge::progress::JsonLogFeed;
use tileforge::scorer::Scorer;
use tileforge::snapshot::SnapshotStore;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long, default_value_t = DEFAULT_CHAINS)]
    pub chains: usize,

    /// Chain i runs with seed `seed + i`.
    #[arg(short = 'S', long, default_value_t = 0)]
    pub seed: u64,

    /// Per-chain wall clock limit in seconds.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    /// Per-chain iteration limit.
    #[arg(long)]
    pub max_steps: Option<u64>,

    #[arg(short, long, default_value = "solutions")]
    pub out: String,

    #[arg(long, default_value = "log.json")]
    pub log: String,

    /// Score-keyed snapshots kept beside best.csv.
    #[arg(long, default_value_t = DEFAULT_HISTORY)]
    pub history: usize,

    /// Let peers continue after one chain solves the puzzle.
    #[arg(long, default_value_t = false)]
    pub keep_running: bool,
}

pub fn run(args: SearchArgs, config: Config, scorer: Arc<Scorer>) -> TfResult<()> {
    let store = Arc::new(SnapshotStore::new(&args.out, args.history)?);
    let feed = Arc::new(JsonLogFeed::create(&args.log)?);

    info!("💾 Snapshots: {}", store.dir().display());
    info!("📈 Progress feed: {}", feed.path().display());

    let options = SearchOptions {
        chains: args.chains,
        base_seed: args.seed,
        budget: RunBudget {
            max_steps: args.max_steps,
            max_time: args.time.map(Duration::from_secs),
        },
        stop_on_solve: !args.keep_running,
    };

    let coordinator = Coordinator::new(
        scorer.clone(),
        config.puzzle.anchor(),
        config.anneal.clone(),
        options,
    )?
    .with_store(store.clone())
    .with_feed(feed);

    let report = coordinator.run()?;

    info!("=== 🏆 FINAL RESULT ===");
    reports::print_chain_table(&report);

    if let Some(best) = report.best_chain() {
        let details = scorer.score_details(&best.best_board);
        reports::print_board_grid(&format!("SEED {}", best.seed), &best.best_board);
        reports::print_score_report(&details);
        println!("Score: {}/{}", best.best_score, report.max_score);
    }
    if let Some(global) = report.global {
        println!(
            "Global best: {} (seed {}, {:.1}s)",
            global.score,
            global.seed,
            global.elapsed.as_secs_f64()
        );
    }
    Ok(())
}
