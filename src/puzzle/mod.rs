pub mod board;
pub mod tiles;

pub use self::board::{Anchor, Board, Cell};
pub use self::tiles::{Color, PieceId, Rotation, Tile, TileKind, TileLibrary};
