use super::anneal::{self, Schedule};
use super::global::GlobalBest;
use super::local::optimize_cells;
use super::mutation::propose_swap;
use crate::config::AnnealParams;
use crate::error::{TfResult, TileForgeError};
use crate::progress::{ProgressEntry, ProgressSink};
use crate::puzzle::{Anchor, Board};
use crate::scorer::Scorer;
use crate::snapshot::SnapshotStore;
use fastrand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumString};
use tracing::{debug, info, warn};

const CLOCK_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainPhase {
    Initializing,
    Running,
    Reheating,
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChainOutcome {
    Solved,
    Cancelled,
    BudgetExhausted,
}

/// What happened during one iteration.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub accepted: bool,
    pub improved: bool,
    pub reheated: Option<f64>,
    pub solved: bool,
}

/// Optional per-chain limits. `None` means unbounded.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunBudget {
    pub max_steps: Option<u64>,
    pub max_time: Option<Duration>,
}

/// Shared collaborators a running chain reports to.
pub struct ChainContext<'a> {
    pub global: &'a GlobalBest,
    pub store: Option<&'a SnapshotStore>,
    pub feed: &'a dyn ProgressSink,
    pub stop: &'a AtomicBool,
    pub budget: RunBudget,
}

#[derive(Debug, Clone)]
pub struct ChainSummary {
    pub seed: u64,
    pub best_score: u32,
    pub best_board: Board,
    pub steps: u64,
    pub reheats: u64,
    pub elapsed: Duration,
    pub outcome: ChainOutcome,
}

/// One independent annealing search. Owns its boards, RNG and schedule.
pub struct AnnealingChain {
    pub scorer: Arc<Scorer>,
    pub seed: u64,
    pub rng: Rng,
    pub anchor: Anchor,
    anchor_index: usize,

    pub board: Board,
    candidate: Board,
    pub score: u32,
    pub best_board: Board,
    pub best_score: u32,
    max_score: u32,

    pub schedule: Schedule,
    pub stagnation: u64,
    pub stagnation_limit: u64,
    pub reheat_enabled: bool,

    pub step: u64,
    pub reheats: u64,
    pub phase: ChainPhase,
    pub started: Instant,
}

impl AnnealingChain {
    pub fn new(
        scorer: Arc<Scorer>,
        anchor: Anchor,
        params: &AnnealParams,
        seed: u64,
    ) -> TfResult<Self> {
        scorer.check_anchor(&anchor)?;
        params.validate()?;

        let mut rng = Rng::with_seed(seed);
        let size = scorer.size;
        let board = Board::initial(size, &anchor, &mut rng);
        if !board.is_permutation(scorer.library.len()) {
            return Err(TileForgeError::Config(format!(
                "initial board for seed {} is not a permutation of the tiles",
                seed
            )));
        }

        let score = scorer.full_score(&board);
        let max_score = scorer.max_score();

        let mut chain = AnnealingChain {
            anchor_index: anchor.index(size),
            candidate: board.clone(),
            best_board: board.clone(),
            board,
            score,
            best_score: score,
            max_score,
            schedule: Schedule::new(params),
            stagnation: 0,
            stagnation_limit: params.stagnation_limit,
            reheat_enabled: !params.no_reheat,
            step: 0,
            reheats: 0,
            phase: ChainPhase::Initializing,
            started: Instant::now(),
            scorer,
            seed,
            rng,
            anchor,
        };
        chain.phase = if chain.best_score >= chain.max_score {
            ChainPhase::Solved
        } else {
            ChainPhase::Running
        };
        Ok(chain)
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn is_solved(&self) -> bool {
        self.phase == ChainPhase::Solved
    }

    /// propose → repair → accept/reject → cool → reheat → solved check.
    #[inline(always)]
    pub fn step(&mut self) -> StepOutcome {
        let mut out = StepOutcome::default();
        if self.phase == ChainPhase::Solved {
            out.solved = true;
            return out;
        }
        self.phase = ChainPhase::Running;

        // 1. Neighbor in the reusable buffer
        self.candidate.clone_from(&self.board);
        let mv = propose_swap(&mut self.rng, &mut self.candidate, self.anchor_index);
        optimize_cells(
            &self.scorer,
            &mut self.candidate,
            &mv.cells(),
            self.anchor_index,
        );

        // 2. Metropolis (the draw is only taken for non-improving moves)
        let candidate_score = self.scorer.full_score(&self.candidate);
        let delta = candidate_score as i64 - self.score as i64;
        out.accepted =
            delta > 0 || anneal::accepts(delta, self.schedule.temperature, self.rng.f64());

        if out.accepted {
            std::mem::swap(&mut self.board, &mut self.candidate);
            self.score = candidate_score;

            if self.score > self.best_score {
                self.best_board.clone_from(&self.board);
                self.best_score = self.score;
                self.stagnation = 0;
                out.improved = true;
            }
        } else {
            self.stagnation += 1;
        }

        // 3. Cool, every iteration
        self.schedule.cool();
        self.step += 1;

        // 4. Reheat on stagnation
        if self.reheat_enabled && self.stagnation > self.stagnation_limit {
            self.phase = ChainPhase::Reheating;
            out.reheated = Some(self.schedule.reheat(&mut self.rng));
            self.stagnation = 0;
            self.reheats += 1;
        }

        if self.best_score >= self.max_score {
            self.phase = ChainPhase::Solved;
            out.solved = true;
        }
        out
    }

    /// Steps until solved, stopped by a peer, or out of budget.
    pub fn run(&mut self, ctx: &ChainContext) -> ChainSummary {
        self.started = Instant::now();
        // A starting board only seeds the global record, unless it is already solved
        if self.is_solved() {
            self.publish_best(ctx);
        } else {
            ctx.global.try_update(self.best_score, self.seed, Duration::ZERO);
        }

        let outcome = loop {
            if self.is_solved() {
                break ChainOutcome::Solved;
            }
            if ctx.stop.load(Ordering::Relaxed) {
                break ChainOutcome::Cancelled;
            }
            if self.budget_exhausted(&ctx.budget) {
                break ChainOutcome::BudgetExhausted;
            }

            let out = self.step();

            if out.improved {
                self.publish_best(ctx);
            }
            if let Some(t) = out.reheated {
                info!("| SEED {:<2} | TEMPERATURE BOOSTED TO {:.4} |", self.seed, t);
                self.save_checkpoint(ctx);
            }
        };

        if outcome == ChainOutcome::Solved {
            info!(
                "| SEED {:<2} | SOLUTION FOUND! SCORE={} |",
                self.seed, self.best_score
            );
            self.save_checkpoint(ctx);
        }

        debug!(
            "Chain {} finished ({}) after {} steps, best {}",
            self.seed, outcome, self.step, self.best_score
        );

        ChainSummary {
            seed: self.seed,
            best_score: self.best_score,
            best_board: self.best_board.clone(),
            steps: self.step,
            reheats: self.reheats,
            elapsed: self.started.elapsed(),
            outcome,
        }
    }

    fn budget_exhausted(&self, budget: &RunBudget) -> bool {
        if let Some(max) = budget.max_steps {
            if self.step >= max {
                return true;
            }
        }
        if let Some(limit) = budget.max_time {
            if self.step % CLOCK_CHECK_INTERVAL == 0 && self.started.elapsed() >= limit {
                return true;
            }
        }
        false
    }

    /// Persists an improved chain best and offers it to the global record.
    fn publish_best(&self, ctx: &ChainContext) {
        debug!("Chain {} best -> {}", self.seed, self.best_score);

        if let Some(store) = ctx.store {
            if let Err(e) = store.record_improvement(&self.best_board, self.best_score) {
                warn!(
                    "⚠️  Snapshot write failed for seed {} (score {}): {}",
                    self.seed, self.best_score, e
                );
            }
        }

        let elapsed = self.started.elapsed();
        if !ctx.global.try_update(self.best_score, self.seed, elapsed) {
            return;
        }
        // Outside the lock: sinks drop entries that arrive behind a higher one.
        let entry = ProgressEntry::new(self.best_score, self.seed, elapsed, self.step);
        info!(
            "| SEED {:<2} | SCORE {:<5} | STEP {:<7} | {:>7.2} steps/sec | TIME {:>7.1}s |",
            entry.seed,
            entry.best_score,
            entry.step,
            entry.steps_per_sec,
            entry.elapsed_time
        );
        ctx.feed.record(&entry);
    }

    fn save_checkpoint(&self, ctx: &ChainContext) {
        if let Some(store) = ctx.store {
            if let Err(e) = store.checkpoint(&self.best_board, self.seed) {
                warn!("⚠️  Checkpoint write failed for seed {}: {}", self.seed, e);
            }
        }
    }
}
