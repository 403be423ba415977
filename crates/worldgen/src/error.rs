//! Error taxonomy shared by the grid, the generator, and the search engine.

use std::result;

use thiserror::Error;

use crate::types::{Pos3, TileKind};

pub type Result<T, E = WorldGenError> = result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldGenError {
    /// Grid access outside the declared volume. Always a caller bug.
    #[error("grid access out of bounds at ({}, {}, {})", pos.x, pos.y, pos.z)]
    OutOfBounds { pos: Pos3 },

    /// Anchor sampling ran out of attempts; retry with larger dimensions or relaxed limits.
    #[error("could not place {anchor:?} on floor {floor} within {attempts} attempts")]
    PlacementExhausted { anchor: TileKind, floor: i32, attempts: u32 },

    #[error("search precondition unmet: {0}")]
    PreconditionUnmet(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
