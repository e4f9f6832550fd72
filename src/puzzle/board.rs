use super::tiles::{PieceId, Rotation};
use crate::consts::ROTATIONS;
use crate::error::{TfResult, TileForgeError};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub piece: PieceId,
    pub rotation: Rotation,
}

impl Cell {
    pub fn new(piece: PieceId, rotation: Rotation) -> Self {
        Self { piece, rotation }
    }
}

/// The one cell whose piece and rotation never change during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub row: usize,
    pub col: usize,
    pub piece: PieceId,
    pub rotation: Rotation,
}

impl Anchor {
    pub fn validate(&self, size: usize, piece_count: usize) -> TfResult<()> {
        if self.row >= size || self.col >= size {
            return Err(TileForgeError::InvalidAnchorConfiguration(format!(
                "cell ({}, {}) is outside a {}x{} grid",
                self.row, self.col, size, size
            )));
        }
        if self.piece as usize >= piece_count {
            return Err(TileForgeError::InvalidAnchorConfiguration(format!(
                "piece {} does not exist ({} tiles loaded)",
                self.piece, piece_count
            )));
        }
        if self.rotation as usize >= ROTATIONS {
            return Err(TileForgeError::InvalidAnchorConfiguration(format!(
                "rotation {} is not in 0..{}",
                self.rotation, ROTATIONS
            )));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn index(&self, size: usize) -> usize {
        self.row * size + self.col
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.piece, self.rotation)
    }
}

/// Square grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub size: usize,
    pub cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size * size],
        }
    }

    /// Anchor at its cell, every other piece in ascending id order over the
    /// remaining cells (row-major), each with a random rotation.
    pub fn initial(size: usize, anchor: &Anchor, rng: &mut Rng) -> Self {
        let mut board = Self::new(size);
        let anchor_idx = anchor.index(size);
        board.cells[anchor_idx] = anchor.cell();

        let mut pieces = (0..(size * size) as PieceId).filter(|&p| p != anchor.piece);
        for (idx, cell) in board.cells.iter_mut().enumerate() {
            if idx == anchor_idx {
                continue;
            }
            if let Some(piece) = pieces.next() {
                cell.piece = piece;
                cell.rotation = rng.u8(0..ROTATIONS as u8);
            }
        }
        board
    }

    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline(always)]
    pub fn coord(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    #[inline(always)]
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    #[inline(always)]
    pub fn set_rotation(&mut self, index: usize, rotation: Rotation) {
        self.cells[index].rotation = rotation;
    }

    /// Exchanges piece and rotation of two cells.
    #[inline(always)]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when the piece ids are exactly `0..piece_count` with no repeats.
    pub fn is_permutation(&self, piece_count: usize) -> bool {
        if self.cells.len() != piece_count {
            return false;
        }
        let mut seen = vec![false; piece_count];
        for cell in &self.cells {
            let p = cell.piece as usize;
            if p >= piece_count || seen[p] {
                return false;
            }
            seen[p] = true;
        }
        true
    }
}
