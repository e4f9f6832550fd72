use crate::consts::ROTATIONS;
use crate::error::{TfResult, TileForgeError};
use crate::puzzle::{Board, Cell, PieceId, Rotation};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

pub const BEST_FILE: &str = "best.csv";

/// Maps an internal rotation to the external puzzle orientation code.
/// The mapping is its own inverse.
#[inline]
pub fn orientation_code(rotation: Rotation) -> u8 {
    let r = rotation as usize % ROTATIONS;
    (((ROTATIONS - r) % ROTATIONS + 3) % ROTATIONS) as u8
}

#[inline]
pub fn rotation_from_code(code: u8) -> Rotation {
    orientation_code(code)
}

/// One `row,column,piece_id_1_based,orientation_code` record per cell.
pub fn write_board<W: Write>(writer: W, board: &Board) -> TfResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for (idx, cell) in board.cells.iter().enumerate() {
        let (row, col) = board.coord(idx);
        wtr.write_record(&[
            row.to_string(),
            col.to_string(),
            (cell.piece as usize + 1).to_string(),
            orientation_code(cell.rotation).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_board<R: Read>(reader: R, size: usize) -> TfResult<Board> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut board = Board::new(size);
    let mut filled = vec![false; size * size];

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 1;
        let rec = result?;
        let malformed = |reason: String| TileForgeError::MalformedSnapshot { line, reason };

        if rec.len() != 4 {
            return Err(malformed(format!("expected 4 fields, found {}", rec.len())));
        }
        let mut vals = [0usize; 4];
        for (i, field) in rec.iter().enumerate() {
            vals[i] = field
                .parse()
                .map_err(|_| malformed(format!("'{}' is not a non-negative integer", field)))?;
        }
        let [row, col, piece_1, code] = vals;

        if row >= size || col >= size {
            return Err(malformed(format!("cell ({}, {}) is off the grid", row, col)));
        }
        if piece_1 == 0 || piece_1 > PieceId::MAX as usize {
            return Err(malformed(format!("piece id {} is out of range", piece_1)));
        }
        if code >= ROTATIONS {
            return Err(malformed(format!("orientation {} is not in 0..4", code)));
        }

        let index = board.index(row, col);
        if filled[index] {
            return Err(malformed(format!("cell ({}, {}) listed twice", row, col)));
        }
        filled[index] = true;
        board.set(
            index,
            Cell::new((piece_1 - 1) as PieceId, rotation_from_code(code as u8)),
        );
    }

    if let Some(missing) = filled.iter().position(|&f| !f) {
        let (row, col) = board.coord(missing);
        return Err(TileForgeError::MalformedSnapshot {
            line: 0,
            reason: format!("cell ({}, {}) is missing", row, col),
        });
    }
    Ok(board)
}

/// Writes via a sibling temp file and a rename, so readers never see a
/// half-written snapshot.
pub fn save_board<P: AsRef<Path>>(path: P, board: &Board) -> TfResult<()> {
    let path = path.as_ref();
    let tmp = path.with_extension("csv.tmp");
    {
        let file = File::create(&tmp)?;
        write_board(file, board)?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_board<P: AsRef<Path>>(path: P, size: usize) -> TfResult<Board> {
    let file = File::open(path)?;
    read_board(file, size)
}

/// Snapshot directory: one canonical best slot, a bounded set of
/// score-keyed files, and per-chain reheating checkpoints.
pub struct SnapshotStore {
    dir: PathBuf,
    history_limit: usize,
    best: Mutex<Option<u32>>,
    history: Mutex<BTreeSet<u32>>,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P, history_limit: usize) -> TfResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            history_limit,
            best: Mutex::new(None),
            history: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn best_path(&self) -> PathBuf {
        self.dir.join(BEST_FILE)
    }

    pub fn history_path(&self, score: u32) -> PathBuf {
        self.dir.join(format!("partial_solution_{}.csv", score))
    }

    pub fn checkpoint_path(&self, seed: u64) -> PathBuf {
        self.dir.join(format!("checkpoint_seed_{}.csv", seed))
    }

    pub fn best_score(&self) -> Option<u32> {
        *self.best.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn history_scores(&self) -> Vec<u32> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    /// Records a chain-local improvement. The canonical slot only moves to a
    /// strictly higher score; the history keeps the highest distinct scores.
    /// Returns whether the canonical slot was replaced.
    pub fn record_improvement(&self, board: &Board, score: u32) -> TfResult<bool> {
        self.push_history(board, score)?;

        let mut best = self.best.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*best, Some(b) if score <= b) {
            return Ok(false);
        }
        save_board(self.best_path(), board)?;
        *best = Some(score);
        debug!("💾 Canonical best is now {}", score);
        Ok(true)
    }

    fn push_history(&self, board: &Board, score: u32) -> TfResult<()> {
        if self.history_limit == 0 {
            return Ok(());
        }
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.contains(&score) {
            return Ok(());
        }
        if history.len() >= self.history_limit {
            match history.first() {
                Some(&lowest) if lowest < score => {
                    history.remove(&lowest);
                    let stale = self.history_path(lowest);
                    if let Err(e) = fs::remove_file(&stale) {
                        warn!("⚠️  Could not prune snapshot '{}': {}", stale.display(), e);
                    }
                }
                _ => return Ok(()),
            }
        }
        save_board(self.history_path(score), board)?;
        history.insert(score);
        Ok(())
    }

    /// Saves a chain's best board as its reheating / final checkpoint.
    pub fn checkpoint(&self, board: &Board, seed: u64) -> TfResult<PathBuf> {
        let path = self.checkpoint_path(seed);
        save_board(&path, board)?;
        Ok(path)
    }
}
