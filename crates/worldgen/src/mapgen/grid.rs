//! The 3D tile store and its addressing and query primitives.

use std::ops::RangeInclusive;

use crate::error::{Result, WorldGenError};
use crate::types::{Cell, Highlight, Pos, Pos3, TileKind};

/// Stacked floors of `dim_x * dim_y` cells; floors run from `0` to `dim_z` inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dim_x: i32,
    dim_y: i32,
    dim_z: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Fills the whole volume with unannotated walls.
    pub fn new(dim_x: u32, dim_y: u32, dim_z: u32) -> Self {
        let len = dim_x as usize * dim_y as usize * (dim_z as usize + 1);
        Self {
            dim_x: dim_x as i32,
            dim_y: dim_y as i32,
            dim_z: dim_z as i32,
            cells: vec![Cell::WALL; len],
        }
    }

    pub fn dim_x(&self) -> i32 {
        self.dim_x
    }

    pub fn dim_y(&self) -> i32 {
        self.dim_y
    }

    /// Index of the deepest floor.
    pub fn dim_z(&self) -> i32 {
        self.dim_z
    }

    pub fn floors(&self) -> RangeInclusive<i32> {
        0..=self.dim_z
    }

    pub fn in_bounds(&self, pos: Pos3) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && pos.x < self.dim_x
            && pos.y < self.dim_y
            && pos.z <= self.dim_z
    }

    pub fn in_floor_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.dim_x && pos.y < self.dim_y
    }

    pub fn get(&self, pos: Pos3) -> Result<Cell> {
        let index = self.index(pos)?;
        Ok(self.cells[index])
    }

    pub fn kind(&self, pos: Pos3) -> Result<TileKind> {
        Ok(self.get(pos)?.kind)
    }

    pub fn set(&mut self, pos: Pos3, kind: TileKind, highlight: Option<Highlight>) -> Result<()> {
        let index = self.index(pos)?;
        self.cells[index] = Cell::new(kind, highlight);
        Ok(())
    }

    /// Replaces only the render annotation, keeping the tile type.
    pub fn set_highlight(&mut self, pos: Pos3, highlight: Option<Highlight>) -> Result<()> {
        let index = self.index(pos)?;
        self.cells[index].highlight = highlight;
        Ok(())
    }

    /// Last cell of `kind` on floor `z` in row-major order.
    pub fn find_tile(&self, z: i32, kind: TileKind) -> Option<Pos3> {
        let mut found = None;
        for y in 0..self.dim_y {
            for x in 0..self.dim_x {
                let pos = Pos3::new(x, y, z);
                if self.get(pos).is_ok_and(|cell| cell.kind == kind) {
                    found = Some(pos);
                }
            }
        }
        found
    }

    /// Rows of floor `z`, top to bottom, for renderers.
    pub fn floor_rows(&self, z: i32) -> Result<impl Iterator<Item = &[Cell]>> {
        let floor_start = self.index(Pos3::new(0, 0, z))?;
        let floor_len = floor_len(self.dim_x, self.dim_y);
        Ok(self.cells[floor_start..floor_start + floor_len].chunks(self.dim_x as usize))
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(12 + self.cells.len() * 2);
        bytes.extend(self.dim_x.to_le_bytes());
        bytes.extend(self.dim_y.to_le_bytes());
        bytes.extend(self.dim_z.to_le_bytes());
        for cell in &self.cells {
            bytes.push(cell.kind.code());
            bytes.push(cell.highlight.map_or(0, Highlight::code));
        }
        bytes
    }

    fn index(&self, pos: Pos3) -> Result<usize> {
        if !self.in_bounds(pos) {
            return Err(WorldGenError::OutOfBounds { pos });
        }
        let floor_len = floor_len(self.dim_x, self.dim_y);
        Ok(pos.z as usize * floor_len + pos.y as usize * self.dim_x as usize + pos.x as usize)
    }
}

/// Cells per floor, widened before multiplying so large floors cannot overflow `i32`.
fn floor_len(dim_x: i32, dim_y: i32) -> usize {
    dim_x as usize * dim_y as usize
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn floor_len_widens_before_multiplying() {
        assert_eq!(floor_len(50_000, 50_000), 2_500_000_000);
        assert_eq!(floor_len(4, 3), 12);
    }

    #[test]
    fn new_grid_is_all_unannotated_wall() {
        let grid = Grid::new(4, 3, 2);
        assert_eq!(grid.count(TileKind::Wall), 4 * 3 * 3);
        for z in grid.floors() {
            for row in grid.floor_rows(z).expect("floor exists") {
                assert!(row.iter().all(|cell| *cell == Cell::WALL));
            }
        }
    }

    #[test]
    fn deepest_floor_is_inclusive() {
        let grid = Grid::new(3, 3, 1);
        assert!(grid.get(Pos3::new(0, 0, 1)).is_ok());
        assert_eq!(
            grid.get(Pos3::new(0, 0, 2)),
            Err(WorldGenError::OutOfBounds { pos: Pos3::new(0, 0, 2) })
        );
    }

    #[test]
    fn set_outside_volume_fails_instead_of_dropping() {
        let mut grid = Grid::new(3, 3, 0);
        let pos = Pos3::new(3, 0, 0);
        assert_eq!(
            grid.set(pos, TileKind::Hallway, None),
            Err(WorldGenError::OutOfBounds { pos })
        );
        assert_eq!(grid.count(TileKind::Hallway), 0);
    }

    #[test]
    fn find_tile_returns_last_row_major_match() {
        let mut grid = Grid::new(5, 5, 0);
        grid.set(Pos3::new(4, 1, 0), TileKind::Door, None).unwrap();
        grid.set(Pos3::new(0, 3, 0), TileKind::Door, None).unwrap();
        assert_eq!(grid.find_tile(0, TileKind::Door), Some(Pos3::new(0, 3, 0)));
        assert_eq!(grid.find_tile(0, TileKind::Exit), None);
    }

    #[test]
    fn highlight_update_keeps_tile_kind() {
        let mut grid = Grid::new(3, 3, 0);
        let pos = Pos3::new(1, 1, 0);
        grid.set(pos, TileKind::Hallway, Some(Highlight::Corridor)).unwrap();
        grid.set_highlight(pos, Some(Highlight::Route)).unwrap();
        assert_eq!(grid.get(pos), Ok(Cell::new(TileKind::Hallway, Some(Highlight::Route))));
    }

    #[test]
    fn floor_rows_are_addressed_by_y_then_x() {
        let mut grid = Grid::new(3, 2, 1);
        grid.set(Pos3::new(2, 1, 1), TileKind::Exit, None).unwrap();
        let rows: Vec<&[Cell]> = grid.floor_rows(1).unwrap().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2].kind, TileKind::Exit);
        assert!(grid.floor_rows(2).is_err());
    }

    proptest! {
        #[test]
        fn get_fails_exactly_outside_the_volume(
            x in -3_i32..8,
            y in -3_i32..8,
            z in -2_i32..4,
        ) {
            let grid = Grid::new(5, 4, 2);
            let inside = (0..5).contains(&x) && (0..4).contains(&y) && (0..=2).contains(&z);
            let pos = Pos3::new(x, y, z);
            prop_assert_eq!(grid.get(pos).is_ok(), inside);
            if !inside {
                prop_assert_eq!(grid.get(pos), Err(WorldGenError::OutOfBounds { pos }));
            }
        }
    }
}
