//! Square room stamping around a center cell.

use crate::error::Result;
use crate::rng::{RandomSource, random_range};
use crate::types::{Highlight, Pos3, TileKind};

use super::grid::Grid;

/// Tile types a room may overwrite; markers, locked doors, and other rooms survive.
pub const OVERWRITE_ALLOWED: [TileKind; 3] = [TileKind::Wall, TileKind::Hallway, TileKind::Door];

/// Radius in `1..=room_variance`.
pub fn random_radius<R: RandomSource + ?Sized>(rng: &mut R, room_variance: u32) -> i32 {
    random_range(rng, 1, room_variance.max(1) as i32)
}

/// Overwrites the `(2r+1)²` square around `center` with `fill`. An offset that would leave
/// the grid on one axis collapses to the center's own coordinate on that axis, so edge rooms
/// come out smaller instead of wrapping. Returns the number of cells changed.
pub fn stamp_room(
    grid: &mut Grid,
    fill: TileKind,
    center: Pos3,
    radius: i32,
    highlight: Option<Highlight>,
) -> Result<usize> {
    let mut changed = 0;
    for x_offset in -radius..=radius {
        for y_offset in -radius..=radius {
            let x = clamp_axis(center.x, x_offset, grid.dim_x());
            let y = clamp_axis(center.y, y_offset, grid.dim_y());
            let pos = Pos3 { x, y, ..center };

            let current = grid.get(pos)?;
            if !OVERWRITE_ALLOWED.contains(&current.kind) {
                continue;
            }
            if current.kind != fill || current.highlight != highlight {
                changed += 1;
            }
            grid.set(pos, fill, highlight)?;
        }
    }
    Ok(changed)
}

fn clamp_axis(center: i32, offset: i32, limit: i32) -> i32 {
    let shifted = center + offset;
    if shifted < 0 || shifted > limit - 1 { center } else { shifted }
}
