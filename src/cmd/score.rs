use crate::reports;
use clap::Args;
use std::sync::Arc;
use tileforge::config::Config;
use tileforge::error::{TfResult, TileForgeError};
use tileforge::scorer::Scorer;
use tileforge::snapshot::load_board;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub config: Config,

    /// Snapshot file (`row,column,piece,orientation` per line).
    #[arg(short = 'f', long)]
    pub snapshot: String,
}

pub fn run(args: ScoreArgs, config: Config, scorer: Arc<Scorer>) -> TfResult<()> {
    info!("🔎 Scoring snapshot: {}", args.snapshot);
    let board = load_board(&args.snapshot, config.puzzle.size)?;

    if !board.is_permutation(scorer.library.len()) {
        return Err(TileForgeError::MalformedSnapshot {
            line: 0,
            reason: "pieces are not a permutation of the tile set".to_string(),
        });
    }
    let anchor = config.puzzle.anchor();
    if board.get(anchor.index(board.size)) != anchor.cell() {
        warn!("⚠️  Anchor cell does not hold the configured anchor piece/rotation.");
    }

    let details = scorer.score_details(&board);
    reports::print_board_grid(&args.snapshot, &board);
    reports::print_score_report(&details);
    println!("Score: {}/{}", details.total, details.max);
    Ok(())
}
