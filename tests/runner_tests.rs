mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tileforge::config::AnnealParams;
use tileforge::optimizer::{
    AnnealingChain, ChainContext, ChainOutcome, Coordinator, GlobalBest, RunBudget, SearchOptions,
};
use tileforge::progress::{JsonLogFeed, NullFeed, ProgressEntry, ProgressSink};
use tileforge::snapshot::{load_board, SnapshotStore};

/// Collects every entry it is handed.
#[derive(Default)]
struct RecordingFeed {
    entries: Mutex<Vec<ProgressEntry>>,
}

impl ProgressSink for RecordingFeed {
    fn record(&self, entry: &ProgressEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn fast_params() -> AnnealParams {
    AnnealParams {
        temp_start: 2.0,
        temp_min: 0.2,
        cooling_rate: 0.9995,
        stagnation_limit: 3_000,
        ..common::quiet_params()
    }
}

#[test]
fn test_global_best_is_monotonic() {
    let global = GlobalBest::new();
    assert_eq!(global.get(), None);

    assert!(global.try_update(10, 1, Duration::from_millis(5)));
    assert!(!global.try_update(10, 2, Duration::from_millis(6)));
    assert!(!global.try_update(7, 3, Duration::from_millis(7)));
    assert!(global.try_update(11, 4, Duration::from_millis(8)));

    let best = global.get().unwrap();
    assert_eq!(best.score, 11);
    assert_eq!(best.seed, 4);
    assert_eq!(global.score(), Some(11));
}

#[test]
fn test_global_best_under_contention() {
    let global = Arc::new(GlobalBest::new());
    let handles: Vec<_> = (0..8u64)
        .map(|seed| {
            let global = global.clone();
            thread::spawn(move || {
                let mut last = 0;
                for score in 0..2_000u32 {
                    let s = score * 8 + seed as u32;
                    global.try_update(s, seed, Duration::ZERO);
                    let seen = global.score().unwrap();
                    assert!(seen >= last);
                    last = seen;
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let best = global.get().unwrap();
    assert_eq!(best.score, 1_999 * 8 + 7);
    assert_eq!(best.seed, 7);
}

#[test]
fn test_chain_run_respects_step_budget() {
    let fx = common::solvable(6, 5, 31);
    let global = GlobalBest::new();
    let stop = AtomicBool::new(false);
    let ctx = ChainContext {
        global: &global,
        store: None,
        feed: &NullFeed,
        stop: &stop,
        budget: RunBudget {
            max_steps: Some(700),
            max_time: None,
        },
    };
    let mut chain =
        AnnealingChain::new(fx.scorer(1), fx.anchor_at(3, 3), &fast_params(), 1).unwrap();
    let summary = chain.run(&ctx);

    if summary.outcome == ChainOutcome::BudgetExhausted {
        assert_eq!(summary.steps, 700);
    } else {
        assert_eq!(summary.outcome, ChainOutcome::Solved);
        assert!(summary.steps <= 700);
    }
    assert_eq!(global.score(), Some(summary.best_score));
}

#[test]
fn test_chain_run_respects_time_budget() {
    let fx = common::solvable(8, 6, 3);
    let global = GlobalBest::new();
    let stop = AtomicBool::new(false);
    let ctx = ChainContext {
        global: &global,
        store: None,
        feed: &NullFeed,
        stop: &stop,
        budget: RunBudget {
            max_steps: None,
            max_time: Some(Duration::from_millis(200)),
        },
    };
    let mut chain =
        AnnealingChain::new(fx.scorer(1), fx.anchor_at(0, 0), &fast_params(), 2).unwrap();
    let summary = chain.run(&ctx);
    assert!(matches!(
        summary.outcome,
        ChainOutcome::BudgetExhausted | ChainOutcome::Solved
    ));
    assert!(summary.elapsed < Duration::from_secs(10));
}

#[test]
fn test_stop_flag_cancels_before_first_step() {
    let fx = common::solvable(4, 3, 4);
    let global = GlobalBest::new();
    let stop = AtomicBool::new(true);
    let ctx = ChainContext {
        global: &global,
        store: None,
        feed: &NullFeed,
        stop: &stop,
        budget: RunBudget::default(),
    };
    let mut chain =
        AnnealingChain::new(fx.scorer(1), fx.anchor_at(1, 1), &fast_params(), 0).unwrap();
    let summary = chain.run(&ctx);

    if chain.best_score < chain.max_score() {
        assert_eq!(summary.outcome, ChainOutcome::Cancelled);
        assert_eq!(summary.steps, 0);
    }
    // The initial board is still offered to the global record
    assert_eq!(global.score(), Some(summary.best_score));
}

#[test]
fn test_starting_board_is_not_reported_as_an_improvement() {
    let fx = common::solvable(5, 4, 12);
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path(), 4).unwrap();
    let feed = RecordingFeed::default();
    let global = GlobalBest::new();
    let stop = AtomicBool::new(true);
    let ctx = ChainContext {
        global: &global,
        store: Some(&store),
        feed: &feed,
        stop: &stop,
        budget: RunBudget::default(),
    };
    let mut chain =
        AnnealingChain::new(fx.scorer(1), fx.anchor_at(2, 2), &fast_params(), 5).unwrap();
    assert!(!chain.is_solved());
    let summary = chain.run(&ctx);

    assert_eq!(summary.outcome, ChainOutcome::Cancelled);
    assert_eq!(global.score(), Some(summary.best_score));
    assert!(feed.entries.lock().unwrap().is_empty());
    assert_eq!(store.best_score(), None);
    assert!(store.history_scores().is_empty());
}

#[test]
fn test_solved_starting_board_is_persisted() {
    use tileforge::puzzle::{Anchor, Tile, TileLibrary};
    use tileforge::scorer::Scorer;

    let lib = Arc::new(TileLibrary::from_tiles(vec![Tile::new(-1, -1, -1, -1); 4]));
    let scorer = Arc::new(Scorer::new(lib, 2, 1).unwrap());
    let anchor = Anchor {
        row: 0,
        col: 0,
        piece: 0,
        rotation: 0,
    };
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path(), 4).unwrap();
    let feed = RecordingFeed::default();
    let global = GlobalBest::new();
    let stop = AtomicBool::new(false);
    let ctx = ChainContext {
        global: &global,
        store: Some(&store),
        feed: &feed,
        stop: &stop,
        budget: RunBudget::default(),
    };
    let mut chain = AnnealingChain::new(scorer, anchor, &fast_params(), 6).unwrap();
    let summary = chain.run(&ctx);

    assert_eq!(summary.outcome, ChainOutcome::Solved);
    assert_eq!(summary.steps, 0);
    assert_eq!(global.score(), Some(summary.best_score));
    assert_eq!(store.best_score(), Some(summary.best_score));
    assert!(store.checkpoint_path(6).exists());
    let entries = feed.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].best_score, summary.best_score);
}

#[test]
fn test_snapshot_failures_do_not_stop_the_chain() {
    let fx = common::solvable(5, 4, 40);
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("solutions"), 4).unwrap();
    std::fs::remove_dir_all(store.dir()).unwrap();

    let feed = RecordingFeed::default();
    let global = GlobalBest::new();
    let stop = AtomicBool::new(false);
    let ctx = ChainContext {
        global: &global,
        store: Some(&store),
        feed: &feed,
        stop: &stop,
        budget: RunBudget {
            max_steps: Some(3_000),
            max_time: None,
        },
    };
    let params = AnnealParams {
        stagnation_limit: 200,
        ..fast_params()
    };
    let mut chain = AnnealingChain::new(fx.scorer(1), fx.anchor_at(1, 3), &params, 8).unwrap();
    let start = chain.best_score;
    let summary = chain.run(&ctx);

    if summary.outcome == ChainOutcome::Solved {
        assert!(summary.steps <= 3_000);
    } else {
        assert_eq!(summary.outcome, ChainOutcome::BudgetExhausted);
        assert_eq!(summary.steps, 3_000);
    }
    assert!(summary.best_score > start);
    assert_eq!(global.score(), Some(summary.best_score));
    // Nothing reached disk, but progress was still reported
    assert_eq!(store.best_score(), None);
    assert!(!store.dir().exists());
    let entries = feed.entries.lock().unwrap();
    assert_eq!(entries.last().map(|e| e.best_score), Some(summary.best_score));
}

#[test]
fn test_coordinator_solves_and_stops_peers() {
    let fx = common::two_by_two();
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SnapshotStore::new(dir.path(), 4).unwrap());
    let feed = Arc::new(RecordingFeed::default());

    let options = SearchOptions {
        chains: 3,
        base_seed: 10,
        budget: RunBudget {
            max_steps: Some(200_000),
            max_time: None,
        },
        stop_on_solve: true,
    };
    let coordinator = Coordinator::new(fx.scorer(1), fx.anchor_at(0, 0), fast_params(), options)
        .unwrap()
        .with_store(store.clone())
        .with_feed(feed.clone());

    let report = coordinator.run().unwrap();

    assert!(report.solved());
    assert_eq!(report.max_score, 12);
    assert_eq!(report.chains.len(), 3);
    let seeds: Vec<u64> = report.chains.iter().map(|c| c.seed).collect();
    assert_eq!(seeds, vec![10, 11, 12]);
    for c in &report.chains {
        assert_ne!(c.outcome, ChainOutcome::BudgetExhausted);
    }

    let global = report.global.unwrap();
    assert_eq!(global.score, 12);
    let best = report.best_chain().unwrap();
    assert_eq!(best.best_score, 12);
    assert_eq!(best.best_board, fx.solution);

    // Canonical slot holds the solution, checkpoint written on solve
    assert_eq!(store.best_score(), Some(12));
    assert_eq!(load_board(store.best_path(), 2).unwrap(), fx.solution);
    let solver = report
        .chains
        .iter()
        .find(|c| c.outcome == ChainOutcome::Solved)
        .unwrap();
    assert!(store.checkpoint_path(solver.seed).exists());

    // Every entry is a distinct global improvement, topped by the solution
    let entries = feed.entries.lock().unwrap();
    let mut scores: Vec<u32> = entries.iter().map(|e| e.best_score).collect();
    let count = scores.len();
    scores.sort_unstable();
    scores.dedup();
    assert_eq!(scores.len(), count);
    assert_eq!(scores.last(), Some(&12));
}

#[test]
fn test_coordinator_budget_terminates_all_chains() {
    let fx = common::solvable(10, 8, 77);
    let options = SearchOptions {
        chains: 2,
        base_seed: 0,
        budget: RunBudget {
            max_steps: Some(500),
            max_time: None,
        },
        stop_on_solve: true,
    };
    let coordinator =
        Coordinator::new(fx.scorer(1), fx.anchor_at(4, 5), fast_params(), options).unwrap();
    let report = coordinator.run().unwrap();

    assert_eq!(report.chains.len(), 2);
    for c in &report.chains {
        assert_eq!(c.outcome, ChainOutcome::BudgetExhausted);
        assert_eq!(c.steps, 500);
    }
    assert_eq!(report.total_steps(), 1_000);
    let best = report.best_chain().unwrap();
    assert_eq!(report.global.unwrap().score, best.best_score);
}

#[test]
fn test_external_stop_handle() {
    let fx = common::solvable(10, 8, 5);
    let options = SearchOptions {
        chains: 2,
        ..SearchOptions::default()
    };
    let coordinator =
        Coordinator::new(fx.scorer(1), fx.anchor_at(0, 0), AnnealParams::default(), options)
            .unwrap();
    coordinator.stop_handle().store(true, Ordering::Relaxed);

    let report = coordinator.run().unwrap();
    for c in &report.chains {
        assert_eq!(c.outcome, ChainOutcome::Cancelled);
        assert_eq!(c.steps, 0);
    }
    assert!(coordinator.global_best().get().is_some());
}

#[test]
fn test_coordinator_rejects_bad_setup() {
    let fx = common::uniform(3);
    let zero = SearchOptions {
        chains: 0,
        ..SearchOptions::default()
    };
    assert!(Coordinator::new(fx.scorer(1), fx.anchor_at(0, 0), fast_params(), zero).is_err());

    let mut anchor = fx.anchor_at(0, 0);
    anchor.piece = 99;
    let options = SearchOptions::default();
    assert!(Coordinator::new(fx.scorer(1), anchor, fast_params(), options).is_err());
}

#[test]
fn test_json_feed_file_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("log.json");
    let feed = JsonLogFeed::create(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");

    feed.record(&ProgressEntry::new(10, 2, Duration::from_secs(2), 500));
    feed.record(&ProgressEntry::new(9, 3, Duration::from_secs(3), 600));
    feed.record(&ProgressEntry::new(14, 1, Duration::from_secs(4), 900));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let arr = raw.as_array().unwrap();
    assert_eq!(arr.len(), 2);

    let first = arr[0].as_object().unwrap();
    let mut keys: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["best_score", "elapsed_time", "seed", "step", "steps_per_sec"]
    );
    assert_eq!(first["best_score"], 10);
    assert_eq!(first["steps_per_sec"], 250.0);
    assert_eq!(arr[1]["best_score"], 14);
    assert_eq!(feed.entries().len(), 2);
}
