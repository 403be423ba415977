//! Anchor placement (entry, descent/ascent columns, exit) and the per-floor waypoint run.

use tracing::{debug, info};

use crate::error::{Result, WorldGenError};
use crate::rng::{RandomSource, random_range};
use crate::types::{Highlight, Pos3, TileKind};

use super::grid::Grid;

/// The fixed connectivity points of every floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchors {
    pub entry: Pos3,
    pub exit: Pos3,
    /// `descents[z]` sits on floor `z`.
    pub descents: Vec<Pos3>,
    /// `ascents[z]` sits on floor `z + 1`, directly below `descents[z]`.
    pub ascents: Vec<Pos3>,
}

impl Anchors {
    /// Entry on the first floor, the ascent point everywhere else.
    pub fn floor_start(&self, z: i32) -> Option<Pos3> {
        if z == 0 {
            return Some(self.entry);
        }
        self.ascents.get(usize::try_from(z - 1).ok()?).copied()
    }

    /// Exit on the deepest floor, the descent point everywhere else.
    pub fn floor_end(&self, z: i32) -> Option<Pos3> {
        if z == self.exit.z {
            return Some(self.exit);
        }
        self.descents.get(usize::try_from(z).ok()?).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementLimits {
    pub min_distance: u32,
    pub entry_attempts: u32,
    pub descent_attempts: u32,
    pub exit_attempts: u32,
}

pub fn plan_anchors<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    limits: PlacementLimits,
) -> Result<Anchors> {
    let entry = place_entry(grid, rng, limits.entry_attempts)?;
    let (descents, ascents) =
        place_descents(grid, rng, entry, limits.min_distance, limits.descent_attempts)?;
    let exit_anchor = ascents.last().copied().unwrap_or(entry);
    let exit = place_exit(grid, rng, exit_anchor, limits.min_distance, limits.exit_attempts)?;
    Ok(Anchors { entry, exit, descents, ascents })
}

/// Picks a non-corner border cell of floor 0 and marks it as the entry.
pub fn place_entry<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Pos3> {
    info!("placing entry point");
    for attempt in 0..max_attempts {
        let candidate = sample_floor_point(grid, rng, 0);
        if is_edge_point(grid, candidate) {
            grid.set(candidate, TileKind::Entry, Some(Highlight::Entry))?;
            debug!(?candidate, attempts = attempt + 1, "entry point set");
            return Ok(candidate);
        }
    }
    Err(WorldGenError::PlacementExhausted {
        anchor: TileKind::Entry,
        floor: 0,
        attempts: max_attempts,
    })
}

/// Places one descent per floor above the deepest, each far enough from that floor's start,
/// with the matching ascent in the same column one floor down.
pub fn place_descents<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    entry: Pos3,
    min_distance: u32,
    max_attempts: u32,
) -> Result<(Vec<Pos3>, Vec<Pos3>)> {
    info!("placing descent points");
    let mut descents = Vec::new();
    let mut ascents: Vec<Pos3> = Vec::new();

    for z in 0..grid.dim_z() {
        let floor_start = ascents.last().copied().unwrap_or(entry);
        let descent = sample_distant_point(
            grid,
            rng,
            z,
            floor_start,
            min_distance,
            max_attempts,
            is_interior_point,
        )
        .ok_or(WorldGenError::PlacementExhausted {
            anchor: TileKind::Descent,
            floor: z,
            attempts: max_attempts,
        })?;
        let ascent = descent.planar().on_floor(z + 1);

        grid.set(descent, TileKind::Descent, Some(Highlight::Descent))?;
        grid.set(ascent, TileKind::Ascent, Some(Highlight::Ascent))?;
        debug!(?descent, ?ascent, "descent column set");

        descents.push(descent);
        ascents.push(ascent);
    }
    Ok((descents, ascents))
}

/// Picks a non-corner border cell of the deepest floor at least `min_distance` from `anchor`.
pub fn place_exit<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    anchor: Pos3,
    min_distance: u32,
    max_attempts: u32,
) -> Result<Pos3> {
    info!("placing exit point");
    let z = grid.dim_z();
    let exit = sample_distant_point(grid, rng, z, anchor, min_distance, max_attempts, is_edge_point)
        .ok_or(WorldGenError::PlacementExhausted {
            anchor: TileKind::Exit,
            floor: z,
            attempts: max_attempts,
        })?;
    grid.set(exit, TileKind::Exit, Some(Highlight::Exit))?;
    debug!(?exit, "exit point set");
    Ok(exit)
}

/// Floor-by-floor waypoint run: start anchor, `per_floor` random points, end anchor.
pub fn build_waypoints<R: RandomSource + ?Sized>(
    grid: &Grid,
    anchors: &Anchors,
    per_floor: u32,
    rng: &mut R,
) -> Vec<Pos3> {
    debug!(per_floor, "waypoint density");
    let mut waypoints = Vec::new();
    for z in grid.floors() {
        waypoints.extend(anchors.floor_start(z));
        for _ in 0..per_floor {
            let x = random_range(rng, 1.min(grid.dim_x() - 1), grid.dim_x() - 1);
            let y = random_range(rng, 1.min(grid.dim_y() - 1), grid.dim_y() - 1);
            waypoints.push(Pos3::new(x, y, z));
        }
        waypoints.extend(anchors.floor_end(z));
    }
    waypoints
}

fn sample_distant_point<R: RandomSource + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    z: i32,
    anchor: Pos3,
    min_distance: u32,
    max_attempts: u32,
    accept: impl Fn(&Grid, Pos3) -> bool,
) -> Option<Pos3> {
    for attempt in 0..max_attempts {
        let candidate = sample_floor_point(grid, rng, z);
        if !accept(grid, candidate) {
            continue;
        }
        if candidate.planar_distance(anchor) < f64::from(min_distance) {
            continue;
        }
        if grid.kind(candidate).ok() != Some(TileKind::Wall) {
            continue;
        }
        debug!(z, attempts = attempt + 1, "anchor sample accepted");
        return Some(candidate);
    }
    None
}

fn sample_floor_point<R: RandomSource + ?Sized>(grid: &Grid, rng: &mut R, z: i32) -> Pos3 {
    let x = random_range(rng, 0, grid.dim_x() - 1);
    let y = random_range(rng, 0, grid.dim_y() - 1);
    Pos3::new(x, y, z)
}

fn is_interior_x(grid: &Grid, x: i32) -> bool {
    x >= 1 && x < grid.dim_x() - 1
}

fn is_interior_y(grid: &Grid, y: i32) -> bool {
    y >= 1 && y < grid.dim_y() - 1
}

/// On exactly one border edge, which excludes corners.
fn is_edge_point(grid: &Grid, pos: Pos3) -> bool {
    is_interior_x(grid, pos.x) != is_interior_y(grid, pos.y)
}

fn is_interior_point(grid: &Grid, pos: Pos3) -> bool {
    is_interior_x(grid, pos.x) && is_interior_y(grid, pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_source;

    fn limits_for(grid: &Grid) -> PlacementLimits {
        let average = ((grid.dim_x() + grid.dim_y()) / 2) as u32;
        PlacementLimits {
            min_distance: (f64::from(average) * 0.75) as u32,
            entry_attempts: 10_000,
            descent_attempts: 10_000,
            exit_attempts: 500,
        }
    }

    #[test]
    fn entry_lands_on_a_border_edge_but_never_a_corner() {
        for seed in 0..50 {
            let mut grid = Grid::new(12, 9, 0);
            let entry = place_entry(&mut grid, &mut seeded_source(seed), 10_000).unwrap();
            let on_vertical_edge = entry.x == 0 || entry.x == 11;
            let on_horizontal_edge = entry.y == 0 || entry.y == 8;
            assert!(on_vertical_edge != on_horizontal_edge, "seed={seed} entry={entry:?}");
            assert_eq!(entry.z, 0);
            assert_eq!(grid.kind(entry), Ok(TileKind::Entry));
        }
    }

    #[test]
    fn descent_and_ascent_share_a_column_and_respect_distance() {
        for seed in 0..20 {
            let mut grid = Grid::new(48, 12, 3);
            let limits = limits_for(&grid);
            let anchors = plan_anchors(&mut grid, &mut seeded_source(seed), limits).unwrap();

            assert_eq!(anchors.descents.len(), 3);
            assert_eq!(anchors.ascents.len(), 3);
            for (z, (descent, ascent)) in anchors.descents.iter().zip(&anchors.ascents).enumerate()
            {
                let z = z as i32;
                assert_eq!(descent.z, z);
                assert_eq!(ascent.z, z + 1);
                assert_eq!(descent.planar(), ascent.planar());
                assert!(is_interior_point(&grid, *descent));
                assert_eq!(grid.kind(*descent), Ok(TileKind::Descent));
                assert_eq!(grid.kind(*ascent), Ok(TileKind::Ascent));

                let start = anchors.floor_start(z).unwrap();
                assert!(start.planar_distance(*descent) >= f64::from(limits.min_distance));
            }
        }
    }

    #[test]
    fn exit_sits_on_deepest_floor_edge_far_from_its_ascent() {
        for seed in 0..20 {
            let mut grid = Grid::new(48, 12, 2);
            let limits = limits_for(&grid);
            let anchors = plan_anchors(&mut grid, &mut seeded_source(seed), limits).unwrap();
            let ascent = anchors.floor_start(2).unwrap();

            assert_eq!(anchors.exit.z, 2);
            assert!(is_edge_point(&grid, anchors.exit));
            assert!(ascent.planar_distance(anchors.exit) >= f64::from(limits.min_distance));
            assert_eq!(grid.find_tile(2, TileKind::Exit), Some(anchors.exit));
        }
    }

    #[test]
    fn single_floor_world_measures_exit_from_entry() {
        let mut grid = Grid::new(16, 16, 0);
        let limits = limits_for(&grid);
        let anchors = plan_anchors(&mut grid, &mut seeded_source(3), limits).unwrap();

        assert!(anchors.descents.is_empty());
        assert_eq!(anchors.floor_start(0), Some(anchors.entry));
        assert_eq!(anchors.floor_end(0), Some(anchors.exit));
        assert!(anchors.entry.planar_distance(anchors.exit) >= f64::from(limits.min_distance));
    }

    #[test]
    fn tiny_grid_exhausts_instead_of_hanging() {
        let mut grid = Grid::new(2, 2, 0);
        let limits = PlacementLimits { entry_attempts: 250, ..limits_for(&grid) };
        let error = plan_anchors(&mut grid, &mut seeded_source(1), limits).unwrap_err();
        assert_eq!(
            error,
            WorldGenError::PlacementExhausted { anchor: TileKind::Entry, floor: 0, attempts: 250 }
        );
    }

    #[test]
    fn unreachable_exit_distance_exhausts_its_budget() {
        let mut grid = Grid::new(10, 10, 0);
        let entry = place_entry(&mut grid, &mut seeded_source(8), 10_000).unwrap();
        let error = place_exit(&mut grid, &mut seeded_source(8), entry, 100, 500).unwrap_err();
        assert_eq!(
            error,
            WorldGenError::PlacementExhausted { anchor: TileKind::Exit, floor: 0, attempts: 500 }
        );
    }

    #[test]
    fn waypoint_run_brackets_each_floor_with_its_anchors() {
        let mut grid = Grid::new(48, 12, 1);
        let mut rng = seeded_source(11);
        let limits = limits_for(&grid);
        let anchors = plan_anchors(&mut grid, &mut rng, limits).unwrap();
        let waypoints = build_waypoints(&grid, &anchors, 4, &mut rng);

        assert_eq!(waypoints.len(), 2 * (4 + 2));
        assert_eq!(waypoints[0], anchors.entry);
        assert_eq!(waypoints[5], anchors.descents[0]);
        assert_eq!(waypoints[6], anchors.ascents[0]);
        assert_eq!(waypoints[11], anchors.exit);
        for waypoint in &waypoints[1..5] {
            assert_eq!(waypoint.z, 0);
            assert!((1..48).contains(&waypoint.x) && (1..12).contains(&waypoint.y));
        }
    }
}
