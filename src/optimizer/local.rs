use crate::consts::ROTATIONS;
use crate::puzzle::{Board, Rotation};
use crate::scorer::Scorer;

/// Greedy re-orientation of the touched cells.
///
/// Cells are visited in order and each keeps the rotation with the highest
/// local score (first one wins on ties). A later cell sees the rotations
/// already chosen for earlier ones. The anchor cell is skipped.
#[inline(always)]
pub fn optimize_cells(scorer: &Scorer, board: &mut Board, cells: &[usize], anchor_index: usize) {
    for &idx in cells {
        if idx == anchor_index {
            continue;
        }
        let (best_r, _) = best_rotation(scorer, board, idx);
        board.set_rotation(idx, best_r);
    }
}

/// Lowest rotation achieving the maximum local score, with that score.
#[inline(always)]
pub fn best_rotation(scorer: &Scorer, board: &Board, index: usize) -> (Rotation, u32) {
    let mut best_r = 0;
    let mut best_score = scorer.local_score(board, index, 0);
    for r in 1..ROTATIONS as Rotation {
        let s = scorer.local_score(board, index, r);
        if s > best_score {
            best_score = s;
            best_r = r;
        }
    }
    (best_r, best_score)
}
