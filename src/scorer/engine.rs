use super::{ScoreDetails, Scorer};
use crate::consts::{BOUNDARY, DIRS, EAST, NORTH, OPPOSITE, SOUTH, WEST};
use crate::puzzle::{Board, Color, Rotation};

/// Border credit for the outward-facing edges of the cell at (row, col).
#[inline(always)]
fn border_credit(edges: &[Color; 4], row: usize, col: usize, size: usize, weight: u32) -> u32 {
    let mut credit = 0;
    if row == 0 && edges[NORTH] == BOUNDARY {
        credit += weight;
    }
    if col == size - 1 && edges[EAST] == BOUNDARY {
        credit += weight;
    }
    if row == size - 1 && edges[SOUTH] == BOUNDARY {
        credit += weight;
    }
    if col == 0 && edges[WEST] == BOUNDARY {
        credit += weight;
    }
    credit
}

/// Fast Path: every interior edge is counted once, from its west/north cell.
pub fn full_score(scorer: &Scorer, board: &Board) -> u32 {
    let size = scorer.size;
    let lib = &scorer.library;
    let mut total = 0;

    for row in 0..size {
        for col in 0..size {
            let cell = board.cells[row * size + col];
            let t = lib.edges_of(cell.piece, cell.rotation);

            total += border_credit(t, row, col, size, scorer.border_weight);

            if row + 1 < size {
                let below = board.cells[(row + 1) * size + col];
                if t[SOUTH] == lib.edges_of(below.piece, below.rotation)[NORTH] {
                    total += 1;
                }
            }
            if col + 1 < size {
                let right = board.cells[row * size + col + 1];
                if t[EAST] == lib.edges_of(right.piece, right.rotation)[WEST] {
                    total += 1;
                }
            }
        }
    }
    total
}

/// Score contribution of one cell if it held `rotation`: its four
/// neighbor matches plus its own border credits.
#[inline(always)]
pub fn local_score(scorer: &Scorer, board: &Board, index: usize, rotation: Rotation) -> u32 {
    let size = scorer.size;
    let lib = &scorer.library;
    let row = index / size;
    let col = index % size;
    let t = lib.edges_of(board.cells[index].piece, rotation);

    let mut local = 0;
    for (d, &(dr, dc)) in DIRS.iter().enumerate() {
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        if nr < 0 || nc < 0 || nr >= size as isize || nc >= size as isize {
            continue;
        }
        let n = board.cells[nr as usize * size + nc as usize];
        if t[d] == lib.edges_of(n.piece, n.rotation)[OPPOSITE[d]] {
            local += 1;
        }
    }
    local + border_credit(t, row, col, size, scorer.border_weight)
}

/// Detailed Path: Used by the `score` report.
pub fn score_details(scorer: &Scorer, board: &Board) -> ScoreDetails {
    let size = scorer.size;
    let lib = &scorer.library;
    let mut d = ScoreDetails {
        max: scorer.max_score(),
        ..Default::default()
    };

    for row in 0..size {
        for col in 0..size {
            let cell = board.cells[row * size + col];
            let t = lib.edges_of(cell.piece, cell.rotation);

            let credit = border_credit(t, row, col, size, scorer.border_weight);
            d.border_credits += credit;
            if scorer.border_weight > 0 {
                d.boundary_edges_placed += credit / scorer.border_weight;
            }

            if row + 1 < size {
                let below = board.cells[(row + 1) * size + col];
                if t[SOUTH] == lib.edges_of(below.piece, below.rotation)[NORTH] {
                    d.matched_edges += 1;
                } else {
                    d.mismatched_edges += 1;
                }
            }
            if col + 1 < size {
                let right = board.cells[row * size + col + 1];
                if t[EAST] == lib.edges_of(right.piece, right.rotation)[WEST] {
                    d.matched_edges += 1;
                } else {
                    d.mismatched_edges += 1;
                }
            }
        }
    }
    d.total = d.matched_edges + d.border_credits;
    d
}
