use crate::error::{TfResult, TileForgeError};
use crate::puzzle::{Anchor, PieceId, Rotation};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    #[serde(default)]
    pub puzzle: PuzzleParams,
    #[command(flatten)]
    #[serde(default)]
    pub anneal: AnnealParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleParams {
    #[arg(long, default_value_t = 16)]
    pub size: usize,

    // Anchor (0-based cell and piece id)
    #[arg(long, default_value_t = 8)]
    pub anchor_row: usize,
    #[arg(long, default_value_t = 7)]
    pub anchor_col: usize,
    #[arg(long, default_value_t = 138)]
    pub anchor_piece: PieceId,
    #[arg(long, default_value_t = 0)]
    pub anchor_rotation: Rotation,

    #[arg(long, default_value_t = 1)]
    pub border_weight: u32,
}

impl Default for PuzzleParams {
    fn default() -> Self {
        Self {
            size: 16,
            anchor_row: 8,
            anchor_col: 7,
            anchor_piece: 138,
            anchor_rotation: 0,
            border_weight: 1,
        }
    }
}

impl PuzzleParams {
    pub fn anchor(&self) -> Anchor {
        Anchor {
            row: self.anchor_row,
            col: self.anchor_col,
            piece: self.anchor_piece,
            rotation: self.anchor_rotation,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealParams {
    #[arg(long, default_value_t = 20.0)]
    pub temp_start: f64,
    #[arg(long, default_value_t = 0.01)]
    pub temp_min: f64,
    #[arg(long, default_value_t = 0.99995)]
    pub cooling_rate: f64,

    // Reheating
    #[arg(long, default_value_t = 300_000)]
    pub stagnation_limit: u64,
    #[arg(long, default_value_t = 0.15)]
    pub boost_min: f64,
    #[arg(long, default_value_t = 0.55)]
    pub boost_max: f64,
    #[arg(long, default_value_t = false)]
    pub no_reheat: bool,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            temp_start: 20.0,
            temp_min: 0.01,
            cooling_rate: 0.99995,
            stagnation_limit: 300_000,
            boost_min: 0.15,
            boost_max: 0.55,
            no_reheat: false,
        }
    }
}

impl AnnealParams {
    pub fn validate(&self) -> TfResult<()> {
        if !(self.temp_min > 0.0) {
            return Err(TileForgeError::Config(format!(
                "temp_min must be positive, got {}",
                self.temp_min
            )));
        }
        if self.temp_start < self.temp_min {
            return Err(TileForgeError::Config(format!(
                "temp_start ({}) is below temp_min ({})",
                self.temp_start, self.temp_min
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(TileForgeError::Config(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            )));
        }
        if self.boost_min < self.temp_min || self.boost_max < self.boost_min {
            return Err(TileForgeError::Config(format!(
                "reheat band [{}, {}] is invalid",
                self.boost_min, self.boost_max
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> TfResult<()> {
        if self.puzzle.size < 2 {
            return Err(TileForgeError::Config(format!(
                "grid size must be at least 2, got {}",
                self.puzzle.size
            )));
        }
        self.anneal.validate()
    }

    /// Overrides file values with the ones typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(puzzle, size);
        update_if_present!(puzzle, anchor_row);
        update_if_present!(puzzle, anchor_col);
        update_if_present!(puzzle, anchor_piece);
        update_if_present!(puzzle, anchor_rotation);
        update_if_present!(puzzle, border_weight);

        update_if_present!(anneal, temp_start);
        update_if_present!(anneal, temp_min);
        update_if_present!(anneal, cooling_rate);
        update_if_present!(anneal, stagnation_limit);
        update_if_present!(anneal, boost_min);
        update_if_present!(anneal, boost_max);
        update_if_present!(anneal, no_reheat);
    }
}
