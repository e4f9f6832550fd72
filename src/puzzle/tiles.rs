use crate::consts::{BOUNDARY, ROTATIONS};
use crate::error::{TfResult, TileForgeError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use strum_macros::Display;
use tracing::{debug, info};

pub type Color = i16;
pub type PieceId = u16;
pub type Rotation = u8;

/// One square piece: edge colors in N, E, S, W order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub edges: [Color; 4],
}

impl Tile {
    pub fn new(north: Color, east: Color, south: Color, west: Color) -> Self {
        Self {
            edges: [north, east, south, west],
        }
    }

    /// Edges after shifting the sequence left by `rotation` places.
    #[inline(always)]
    pub fn rotated(&self, rotation: Rotation) -> [Color; 4] {
        let r = rotation as usize % ROTATIONS;
        [
            self.edges[r],
            self.edges[(1 + r) % ROTATIONS],
            self.edges[(2 + r) % ROTATIONS],
            self.edges[(3 + r) % ROTATIONS],
        ]
    }

    pub fn boundary_edges(&self) -> usize {
        self.edges.iter().filter(|&&c| c == BOUNDARY).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    Interior,
    Edge,
    Corner,
}

/// Immutable tile set plus the flattened rotation table
/// (`piece * 4 + rotation`). Shared read-only by every chain.
#[derive(Debug, Clone)]
pub struct TileLibrary {
    tiles: Vec<Tile>,
    rotated: Vec<[Color; 4]>,
}

impl TileLibrary {
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        let mut rotated = Vec::with_capacity(tiles.len() * ROTATIONS);
        for tile in &tiles {
            for r in 0..ROTATIONS {
                rotated.push(tile.rotated(r as Rotation));
            }
        }
        Self { tiles, rotated }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let path = path.as_ref();
        info!("📂 Loading tiles from: {}", path.display());
        let file = File::open(path)?;
        let library = Self::from_reader(file)?;

        let corners = library.count_kind(TileKind::Corner);
        let edges = library.count_kind(TileKind::Edge);
        info!(
            "   -> {} tiles ({} corners, {} edges, {} interior)",
            library.len(),
            corners,
            edges,
            library.len() - corners - edges
        );
        Ok(library)
    }

    /// Parses headerless rows of exactly four integers each.
    pub fn from_reader<R: Read>(reader: R) -> TfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut tiles = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let row = idx + 1;
            let rec = result?;

            if rec.len() == 1 && rec[0].is_empty() {
                continue;
            }
            if rec.len() != 4 {
                return Err(TileForgeError::MalformedTileInput {
                    row,
                    reason: format!("expected 4 colors, found {}", rec.len()),
                });
            }

            let mut edges = [0 as Color; 4];
            for (i, field) in rec.iter().enumerate() {
                let color: Color =
                    field
                        .parse()
                        .map_err(|_| TileForgeError::MalformedTileInput {
                            row,
                            reason: format!("'{}' is not an integer color", field),
                        })?;
                if color < BOUNDARY {
                    return Err(TileForgeError::MalformedTileInput {
                        row,
                        reason: format!("color {} is below {}", color, BOUNDARY),
                    });
                }
                edges[i] = color;
            }
            tiles.push(Tile { edges });
        }

        if tiles.is_empty() {
            return Err(TileForgeError::MalformedTileInput {
                row: 0,
                reason: "no tiles found".to_string(),
            });
        }
        if tiles.len() > PieceId::MAX as usize {
            return Err(TileForgeError::MalformedTileInput {
                row: tiles.len(),
                reason: "too many tiles".to_string(),
            });
        }

        debug!("   Parsed {} tile rows", tiles.len());
        Ok(Self::from_tiles(tiles))
    }

    #[inline(always)]
    pub fn edges_of(&self, piece: PieceId, rotation: Rotation) -> &[Color; 4] {
        &self.rotated[piece as usize * ROTATIONS + rotation as usize]
    }

    pub fn tile(&self, piece: PieceId) -> &Tile {
        &self.tiles[piece as usize]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn kind(&self, piece: PieceId) -> TileKind {
        match self.tiles[piece as usize].boundary_edges() {
            0 => TileKind::Interior,
            1 => TileKind::Edge,
            _ => TileKind::Corner,
        }
    }

    fn count_kind(&self, kind: TileKind) -> usize {
        (0..self.tiles.len())
            .filter(|&p| self.kind(p as PieceId) == kind)
            .count()
    }
}
