#![allow(dead_code)] // Suppress warnings for helpers unused by some test files

use fastrand::Rng;
use std::sync::Arc;
use tileforge::config::AnnealParams;
use tileforge::puzzle::{Anchor, Board, Cell, PieceId, Rotation, Tile, TileLibrary};
use tileforge::scorer::Scorer;

/// A puzzle with a known perfect tiling.
pub struct Fixture {
    pub library: Arc<TileLibrary>,
    pub solution: Board,
    pub size: usize,
}

impl Fixture {
    pub fn scorer(&self, border_weight: u32) -> Arc<Scorer> {
        Arc::new(Scorer::new(self.library.clone(), self.size, border_weight).unwrap())
    }

    /// Anchor taken from the solved board, so the optimum stays reachable.
    pub fn anchor_at(&self, row: usize, col: usize) -> Anchor {
        let cell = self.solution.get(self.solution.index(row, col));
        Anchor {
            row,
            col,
            piece: cell.piece,
            rotation: cell.rotation,
        }
    }
}

/// Builds a solvable size×size puzzle: random interior colors in
/// `1..=colors`, tiles shuffled and stored with random rotations.
pub fn solvable(size: usize, colors: i16, seed: u64) -> Fixture {
    let mut rng = Rng::with_seed(seed);
    let horiz: Vec<i16> = (0..size * size).map(|_| rng.i16(1..=colors)).collect();
    let vert: Vec<i16> = (0..size * size).map(|_| rng.i16(1..=colors)).collect();

    // Edges of the tile that belongs at (r, c) in its solved orientation.
    let solved_edges = |r: usize, c: usize| -> [i16; 4] {
        let n = if r == 0 { -1 } else { vert[(r - 1) * size + c] };
        let e = if c == size - 1 { -1 } else { horiz[r * size + c] };
        let s = if r == size - 1 { -1 } else { vert[r * size + c] };
        let w = if c == 0 { -1 } else { horiz[r * size + c - 1] };
        [n, e, s, w]
    };

    let mut order: Vec<usize> = (0..size * size).collect();
    rng.shuffle(&mut order);

    let mut tiles = vec![Tile::new(0, 0, 0, 0); size * size];
    let mut solution = Board::new(size);
    for (piece, &cell_idx) in order.iter().enumerate() {
        let edges = solved_edges(cell_idx / size, cell_idx % size);
        let k = rng.usize(0..4);
        // Stored so that rotation k brings it back to `edges`.
        let stored = [
            edges[(4 - k) % 4],
            edges[(5 - k) % 4],
            edges[(6 - k) % 4],
            edges[(7 - k) % 4],
        ];
        tiles[piece] = Tile { edges: stored };
        solution.set(cell_idx, Cell::new(piece as PieceId, k as Rotation));
    }

    Fixture {
        library: Arc::new(TileLibrary::from_tiles(tiles)),
        solution,
        size,
    }
}

/// 2×2 puzzle with a unique perfect tiling. Piece ids are deliberately
/// out of cell order: the solution is pieces 1, 3, 2, 0 in rotation 0.
pub fn two_by_two() -> Fixture {
    let tiles = vec![
        Tile::new(3, -1, -1, 4),
        Tile::new(-1, 1, 2, -1),
        Tile::new(2, 4, -1, -1),
        Tile::new(-1, -1, 3, 1),
    ];
    let mut solution = Board::new(2);
    for (cell, piece) in [1u16, 3, 2, 0].into_iter().enumerate() {
        solution.set(cell, Cell::new(piece, 0));
    }
    Fixture {
        library: Arc::new(TileLibrary::from_tiles(tiles)),
        solution,
        size: 2,
    }
}

/// Every edge the same interior color: all boards score the same.
pub fn uniform(size: usize) -> Fixture {
    let tiles = vec![Tile::new(1, 1, 1, 1); size * size];
    let mut solution = Board::new(size);
    for p in 0..size * size {
        solution.set(p, Cell::new(p as PieceId, 0));
    }
    Fixture {
        library: Arc::new(TileLibrary::from_tiles(tiles)),
        solution,
        size,
    }
}

pub fn quiet_params() -> AnnealParams {
    AnnealParams {
        temp_start: 1.0,
        temp_min: 0.05,
        cooling_rate: 0.999,
        stagnation_limit: 2_000,
        boost_min: 0.15,
        boost_max: 0.55,
        no_reheat: false,
    }
}

pub fn tiles_csv(library: &TileLibrary) -> String {
    library
        .tiles()
        .iter()
        .map(|t| {
            format!(
                "{},{},{},{}\n",
                t.edges[0], t.edges[1], t.edges[2], t.edges[3]
            )
        })
        .collect()
}
