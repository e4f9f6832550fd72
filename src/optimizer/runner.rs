use super::chain::{AnnealingChain, ChainContext, ChainOutcome, ChainSummary, RunBudget};
use super::global::{BestRecord, GlobalBest};
use crate::config::AnnealParams;
use crate::consts::DEFAULT_CHAINS;
use crate::error::{TfResult, TileForgeError};
use crate::progress::{NullFeed, ProgressSink};
use crate::puzzle::Anchor;
use crate::scorer::Scorer;
use crate::snapshot::SnapshotStore;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct SearchOptions {
    pub chains: usize,
    pub base_seed: u64,
    pub budget: RunBudget,
    /// Stop every peer once one chain reaches the maximum score.
    pub stop_on_solve: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            chains: DEFAULT_CHAINS,
            base_seed: 0,
            budget: RunBudget::default(),
            stop_on_solve: true,
        }
    }
}

pub struct SearchReport {
    pub global: Option<BestRecord>,
    pub max_score: u32,
    pub chains: Vec<ChainSummary>,
}

impl SearchReport {
    /// Highest scoring chain; ties go to the lowest seed.
    pub fn best_chain(&self) -> Option<&ChainSummary> {
        self.chains
            .iter()
            .max_by(|a, b| a.best_score.cmp(&b.best_score).then(b.seed.cmp(&a.seed)))
    }

    pub fn solved(&self) -> bool {
        self.chains.iter().any(|c| c.outcome == ChainOutcome::Solved)
    }

    pub fn total_steps(&self) -> u64 {
        self.chains.iter().map(|c| c.steps).sum()
    }
}

/// Runs independent chains in parallel and tracks the global best.
pub struct Coordinator {
    scorer: Arc<Scorer>,
    anchor: Anchor,
    params: AnnealParams,
    options: SearchOptions,
    store: Option<Arc<SnapshotStore>>,
    feed: Arc<dyn ProgressSink>,
    global: Arc<GlobalBest>,
    stop: Arc<AtomicBool>,
}

impl Coordinator {
    pub fn new(
        scorer: Arc<Scorer>,
        anchor: Anchor,
        params: AnnealParams,
        options: SearchOptions,
    ) -> TfResult<Self> {
        scorer.check_anchor(&anchor)?;
        params.validate()?;
        if options.chains == 0 {
            return Err(TileForgeError::Config(
                "at least one chain is required".to_string(),
            ));
        }
        Ok(Self {
            scorer,
            anchor,
            params,
            options,
            store: None,
            feed: Arc::new(NullFeed),
            global: Arc::new(GlobalBest::new()),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_store(mut self, store: Arc<SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_feed(mut self, feed: Arc<dyn ProgressSink>) -> Self {
        self.feed = feed;
        self
    }

    /// Setting this flag stops every chain at its next iteration.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn global_best(&self) -> Arc<GlobalBest> {
        self.global.clone()
    }

    /// Blocks until every chain has terminated.
    pub fn run(&self) -> TfResult<SearchReport> {
        let opts = &self.options;

        // 1. Initialize chains (seed = base + index)
        let chains: Vec<AnnealingChain> = (0..opts.chains)
            .map(|i| {
                AnnealingChain::new(
                    self.scorer.clone(),
                    self.anchor,
                    &self.params,
                    opts.base_seed + i as u64,
                )
            })
            .collect::<TfResult<_>>()?;

        // 2. One worker thread per chain
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.chains)
            .build()
            .map_err(|e| TileForgeError::Config(format!("thread pool: {}", e)))?;

        info!(
            "🔥 Spawning {} chains (seeds {}..{}), max score {}",
            opts.chains,
            opts.base_seed,
            opts.base_seed + opts.chains as u64,
            self.scorer.max_score()
        );

        let ctx = ChainContext {
            global: &self.global,
            store: self.store.as_deref(),
            feed: self.feed.as_ref(),
            stop: &self.stop,
            budget: opts.budget,
        };
        let stop_on_solve = opts.stop_on_solve;
        let stop = &self.stop;
        let start = Instant::now();

        // 3. Evolve in parallel
        let summaries: Vec<ChainSummary> = pool.install(|| {
            chains
                .into_par_iter()
                .with_max_len(1)
                .map(|mut chain| {
                    let summary = chain.run(&ctx);
                    if stop_on_solve && summary.outcome == ChainOutcome::Solved {
                        stop.store(true, Ordering::Relaxed);
                    }
                    summary
                })
                .collect()
        });

        let global = self.global.get();
        if let Some(best) = global {
            info!(
                "| FINAL BEST SCORE {} by SEED {} | {:.1}s |",
                best.score,
                best.seed,
                start.elapsed().as_secs_f64()
            );
        }

        Ok(SearchReport {
            global,
            max_score: self.scorer.max_score(),
            chains: summaries,
        })
    }
}
