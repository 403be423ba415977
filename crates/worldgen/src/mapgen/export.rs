//! Plain nested export of a grid for downstream consumers, plus the stable fingerprint used
//! to compare generated worlds.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;
use crate::types::TileKind;

use super::grid::Grid;

/// Tile types indexed `floors[z][y][x]`. Serializes each tile as its one-character symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTemplate {
    pub floors: Vec<Vec<Vec<TileKind>>>,
}

impl WorldTemplate {
    pub fn from_grid(grid: &Grid) -> Result<Self> {
        let mut floors = Vec::with_capacity(grid.floors().count());
        for z in grid.floors() {
            let rows = grid.floor_rows(z)?;
            floors.push(rows.map(|row| row.iter().map(|cell| cell.kind).collect()).collect());
        }
        Ok(Self { floors })
    }

    /// One line of symbols per row, floors separated by a blank line.
    pub fn to_symbol_rows(&self) -> String {
        self.floors
            .iter()
            .map(|floor| {
                floor
                    .iter()
                    .map(|row| row.iter().map(|kind| kind.symbol()).collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// xxh3 over the grid's canonical bytes; equal grids always share a fingerprint.
pub fn grid_fingerprint(grid: &Grid) -> u64 {
    xxh3_64(&grid.canonical_bytes())
}
