use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    // Top-line
    pub total: u32,
    pub max: u32,

    // Interior edges
    pub matched_edges: u32,
    pub mismatched_edges: u32,

    // Boundary
    pub border_credits: u32,
    pub boundary_edges_placed: u32,
}

impl ScoreDetails {
    pub fn is_solved(&self) -> bool {
        self.total == self.max
    }

    pub fn completion(&self) -> f32 {
        if self.max == 0 {
            return 1.0;
        }
        self.total as f32 / self.max as f32
    }
}
