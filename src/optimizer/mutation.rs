use crate::puzzle::Board;
use fastrand::Rng;

/// The two cells exchanged by a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub a: usize,
    pub b: usize,
}

impl SwapMove {
    #[inline(always)]
    pub fn cells(&self) -> [usize; 2] {
        [self.a, self.b]
    }
}

/// Picks two distinct non-anchor cells uniformly (reject and resample)
/// and swaps their contents in place.
#[inline(always)]
pub fn propose_swap(rng: &mut Rng, board: &mut Board, anchor_index: usize) -> SwapMove {
    let n = board.len();
    debug_assert!(n >= 3, "need at least two free cells to swap");
    loop {
        let a = rng.usize(0..n);
        let b = rng.usize(0..n);
        if a != b && a != anchor_index && b != anchor_index {
            board.swap(a, b);
            return SwapMove { a, b };
        }
    }
}
