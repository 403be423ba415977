//! A single floor of the grid seen as a 4-connected search graph.

use crate::mapgen::Grid;
use crate::types::{Pos, TileKind};

/// Tiles the connectivity check treats as blocking.
pub const DEFAULT_IMPASSABLE: [TileKind; 2] = [TileKind::Wall, TileKind::LockedDoor];

pub trait SearchGraph {
    fn in_bounds(&self, pos: Pos) -> bool;

    fn passable(&self, pos: Pos) -> bool;

    /// Axis-aligned neighbours that are in bounds and passable. The candidate order is
    /// reversed on cells where `x + y` is even, which decides ties between equally good
    /// paths; keep it stable so searches are reproducible.
    fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let Pos { x, y } = pos;
        let mut candidates =
            [Pos::new(x + 1, y), Pos::new(x, y - 1), Pos::new(x - 1, y), Pos::new(x, y + 1)];
        if (x + y).rem_euclid(2) == 0 {
            candidates.reverse();
        }
        candidates
            .into_iter()
            .filter(|&next| self.in_bounds(next))
            .filter(|&next| self.passable(next))
            .collect()
    }

    fn cost(&self, _from: Pos, _to: Pos) -> u32 {
        1
    }
}

/// Read-only view of floor `z`; never mutates the grid.
#[derive(Clone, Copy, Debug)]
pub struct FloorGraph<'a> {
    grid: &'a Grid,
    z: i32,
    impassable: &'a [TileKind],
}

impl<'a> FloorGraph<'a> {
    pub fn new(grid: &'a Grid, z: i32, impassable: &'a [TileKind]) -> Self {
        Self { grid, z, impassable }
    }

    pub fn floor(&self) -> i32 {
        self.z
    }
}

impl SearchGraph for FloorGraph<'_> {
    fn in_bounds(&self, pos: Pos) -> bool {
        self.grid.in_floor_bounds(pos)
    }

    fn passable(&self, pos: Pos) -> bool {
        self.grid.kind(pos.on_floor(self.z)).is_ok_and(|kind| !self.impassable.contains(&kind))
    }
}
