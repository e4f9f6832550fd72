pub mod anneal;
pub mod chain;
pub mod global;
pub mod local;
pub mod mutation;
pub mod runner;

pub use self::chain::{
    AnnealingChain, ChainContext, ChainOutcome, ChainPhase, ChainSummary, RunBudget, StepOutcome,
};
pub use self::global::{BestRecord, GlobalBest};
pub use self::runner::{Coordinator, SearchOptions, SearchReport};
