/// Number of orientations a square tile can take.
pub const ROTATIONS: usize = 4;

/// Edge color that must face the outer boundary of the grid.
pub const BOUNDARY: i16 = -1;

/// Edge indices into a tile's color tuple.
pub const NORTH: usize = 0;
pub const EAST: usize = 1;
pub const SOUTH: usize = 2;
pub const WEST: usize = 3;

/// Row/column offsets for N, E, S, W.
pub const DIRS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// The edge a neighbor presents back towards us, indexed by our direction.
pub const OPPOSITE: [usize; 4] = [SOUTH, WEST, NORTH, EAST];

/// Default number of independent chains when `--chains` is not given.
pub const DEFAULT_CHAINS: usize = 7;

/// Default number of score-keyed snapshots kept next to the canonical slot.
pub const DEFAULT_HISTORY: usize = 10;
