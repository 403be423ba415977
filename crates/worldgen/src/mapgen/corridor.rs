//! Biased random-walk corridor carving between consecutive waypoints of a floor.

use tracing::{debug, warn};

use crate::config::CarveFallback;
use crate::error::Result;
use crate::rng::{RandomSource, random_index, random_range};
use crate::types::{Highlight, Pos3, TileKind};

use super::grid::Grid;

/// Tiles a corridor walk never steps onto.
pub const DEFAULT_IMPEDIMENTS: [TileKind; 4] =
    [TileKind::Exit, TileKind::Ascent, TileKind::Descent, TileKind::DungeonRoom];

/// Percent chance of stepping along the axis that closes the remaining gap.
const AXIS_PREFERENCE_PERCENT: i32 = 70;
/// Aligned distance under which the walk finishes with a straight fill.
const SHORTCUT_RANGE: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarveSettings {
    pub step_budget: u32,
    pub leg_attempts: u32,
    pub fallback: CarveFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    Arrived,
    /// Reached the destination with a straight fill from an aligned nearby cell.
    Shortcut,
    /// Spent the step budget before reaching the destination.
    Exhausted,
    /// Every neighbour was out of bounds or impeded.
    Blocked,
}

impl WalkOutcome {
    pub fn reached_destination(self) -> bool {
        matches!(self, Self::Arrived | Self::Shortcut)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Walk {
    /// Visited cells in order, excluding the starting cell.
    pub tiles: Vec<Pos3>,
    pub outcome: WalkOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegResolution {
    Walked,
    DirectLine,
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegReport {
    pub attempts: u32,
    pub exhausted_walks: u32,
    pub blocked_walks: u32,
    /// Outcome of the walk that connected the leg, if one did.
    pub arrival: Option<WalkOutcome>,
    pub resolution: LegResolution,
}

/// Connects `from` to `to` on one floor, retrying failed walks and then applying the
/// configured fallback. Only wall tiles are converted to hallway.
pub fn carve_leg<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    from: Pos3,
    to: Pos3,
    impediments: &[TileKind],
    settings: CarveSettings,
    rng: &mut R,
) -> Result<LegReport> {
    debug_assert_eq!(from.z, to.z, "corridor legs stay on one floor");
    let mut report = LegReport {
        attempts: 0,
        exhausted_walks: 0,
        blocked_walks: 0,
        arrival: None,
        resolution: LegResolution::Abandoned,
    };

    while report.attempts < settings.leg_attempts {
        report.attempts += 1;
        let walk = random_walk(grid, from, to, impediments, settings.step_budget, rng);
        fill_hallway(grid, &walk.tiles)?;
        match walk.outcome {
            WalkOutcome::Arrived | WalkOutcome::Shortcut => {
                debug!(
                    ?from,
                    ?to,
                    attempts = report.attempts,
                    outcome = ?walk.outcome,
                    "leg connected"
                );
                report.arrival = Some(walk.outcome);
                report.resolution = LegResolution::Walked;
                return Ok(report);
            }
            WalkOutcome::Exhausted => report.exhausted_walks += 1,
            WalkOutcome::Blocked => report.blocked_walks += 1,
        }
    }

    match settings.fallback {
        CarveFallback::DirectLine => {
            let horizontal_first = rng.next_u64() & 1 == 0;
            fill_hallway(grid, &l_shaped_line(from, to, horizontal_first))?;
            debug!(?from, ?to, "leg connected by direct line");
            report.resolution = LegResolution::DirectLine;
        }
        CarveFallback::Abandon => {
            warn!(?from, ?to, attempts = report.attempts, "corridor leg abandoned");
        }
    }
    Ok(report)
}

/// Walks from `from` toward `to` without touching the grid.
pub fn random_walk<R: RandomSource + ?Sized>(
    grid: &Grid,
    from: Pos3,
    to: Pos3,
    impediments: &[TileKind],
    step_budget: u32,
    rng: &mut R,
) -> Walk {
    let mut cursor = from;
    let mut tiles = Vec::new();
    let mut steps = 0;

    let outcome = loop {
        if steps >= step_budget {
            break WalkOutcome::Exhausted;
        }
        if cursor == to {
            break WalkOutcome::Arrived;
        }
        if (cursor.x == to.x && (cursor.y - to.y).abs() < SHORTCUT_RANGE)
            || (cursor.y == to.y && (cursor.x - to.x).abs() < SHORTCUT_RANGE)
        {
            tiles.extend(straight_line(cursor, to));
            break WalkOutcome::Shortcut;
        }

        let candidates: Vec<Pos3> = step_candidates(cursor)
            .into_iter()
            .filter(|&next| grid.kind(next).is_ok_and(|kind| !impediments.contains(&kind)))
            .collect();
        if candidates.is_empty() {
            break WalkOutcome::Blocked;
        }

        let apply_preference = random_range(rng, 1, 100) <= AXIS_PREFERENCE_PERCENT;
        let preferred = preferred_step(cursor, to).filter(|step| candidates.contains(step));
        cursor = match preferred {
            Some(step) if apply_preference => step,
            _ => candidates[random_index(rng, candidates.len())],
        };
        tiles.push(cursor);
        steps += 1;
    };

    Walk { tiles, outcome }
}

/// Converts wall tiles to highlighted hallway; anything else, including cells outside the
/// grid, is left alone. Returns the number of converted tiles.
pub fn fill_hallway(grid: &mut Grid, tiles: &[Pos3]) -> Result<usize> {
    let mut converted = 0;
    for &tile in tiles {
        if grid.kind(tile).ok() == Some(TileKind::Wall) {
            grid.set(tile, TileKind::Hallway, Some(Highlight::Corridor))?;
            converted += 1;
        }
    }
    Ok(converted)
}

fn step_candidates(p: Pos3) -> [Pos3; 4] {
    [
        Pos3 { x: p.x + 1, ..p },
        Pos3 { x: p.x - 1, ..p },
        Pos3 { y: p.y + 1, ..p },
        Pos3 { y: p.y - 1, ..p },
    ]
}

/// The step along the single differing axis, if only one axis differs.
fn preferred_step(cursor: Pos3, to: Pos3) -> Option<Pos3> {
    if cursor.y == to.y && cursor.x != to.x {
        return Some(Pos3 { x: cursor.x + (to.x - cursor.x).signum(), ..cursor });
    }
    if cursor.x == to.x && cursor.y != to.y {
        return Some(Pos3 { y: cursor.y + (to.y - cursor.y).signum(), ..cursor });
    }
    None
}

/// Cells after `from` up to and including `to`, which must share an axis with `from`.
fn straight_line(from: Pos3, to: Pos3) -> Vec<Pos3> {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let mut cursor = from;
    let mut tiles = Vec::new();
    while cursor != to {
        cursor = Pos3 { x: cursor.x + dx, y: cursor.y + dy, ..cursor };
        tiles.push(cursor);
    }
    tiles
}

fn l_shaped_line(from: Pos3, to: Pos3, horizontal_first: bool) -> Vec<Pos3> {
    let corner = if horizontal_first {
        Pos3 { x: to.x, ..from }
    } else {
        Pos3 { y: to.y, ..from }
    };
    let mut tiles = straight_line(from, corner);
    tiles.extend(straight_line(corner, to));
    tiles
}
