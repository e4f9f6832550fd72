pub mod engine;
pub mod types;

pub use self::types::ScoreDetails;
use crate::config::PuzzleParams;
use crate::error::{TfResult, TileForgeError};
use crate::puzzle::{Anchor, Board, Rotation, TileLibrary};
use std::sync::Arc;

/// Pure scoring over a fixed tile set and grid size.
pub struct Scorer {
    pub library: Arc<TileLibrary>,
    pub size: usize,
    pub border_weight: u32,
}

impl Scorer {
    pub fn new(library: Arc<TileLibrary>, size: usize, border_weight: u32) -> TfResult<Self> {
        if size < 2 {
            return Err(TileForgeError::Config(format!(
                "grid size must be at least 2, got {}",
                size
            )));
        }
        if library.len() != size * size {
            return Err(TileForgeError::Config(format!(
                "a {}x{} grid needs {} tiles, but {} were loaded",
                size,
                size,
                size * size,
                library.len()
            )));
        }
        Ok(Self {
            library,
            size,
            border_weight,
        })
    }

    /// Builds the scorer and checks the anchor against it.
    pub fn from_params(library: Arc<TileLibrary>, params: &PuzzleParams) -> TfResult<Self> {
        let scorer = Self::new(library, params.size, params.border_weight)?;
        params.anchor().validate(scorer.size, scorer.library.len())?;
        Ok(scorer)
    }

    /// `2·S·(S−1)` interior edges plus one credit per outward-facing edge.
    /// There are `4·S` of those: corner cells face the boundary twice.
    pub fn max_score(&self) -> u32 {
        let s = self.size as u32;
        2 * s * (s - 1) + 4 * s * self.border_weight
    }

    pub fn full_score(&self, board: &Board) -> u32 {
        engine::full_score(self, board)
    }

    pub fn local_score(&self, board: &Board, index: usize, rotation: Rotation) -> u32 {
        engine::local_score(self, board, index, rotation)
    }

    pub fn score_details(&self, board: &Board) -> ScoreDetails {
        engine::score_details(self, board)
    }

    pub fn check_anchor(&self, anchor: &Anchor) -> TfResult<()> {
        anchor.validate(self.size, self.library.len())
    }
}
