//! World generation pipeline: anchors, waypoints, corridors, rooms, then the optional
//! connectivity check.

use std::collections::BTreeSet;
use std::time::Instant;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::rng::{RandomSource, seeded_source};
use crate::types::{Pos3, SearchAlgorithm, TileKind};

use super::corridor::{
    CarveSettings, DEFAULT_IMPEDIMENTS, LegReport, LegResolution, WalkOutcome, carve_leg,
};
use super::export::{WorldTemplate, grid_fingerprint};
use super::grid::Grid;
use super::rooms::{random_radius, stamp_room};
use super::validate::{ConnectivityReport, check_connectivity};
use super::waypoints::{Anchors, PlacementLimits, build_waypoints, plan_anchors};

/// Tallies of every corridor leg carved for one world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarveDiagnostics {
    pub legs: u32,
    pub arrivals: u32,
    pub shortcuts: u32,
    pub exhausted_walks: u32,
    pub blocked_walks: u32,
    /// Walks beyond the first attempt of a leg.
    pub retries: u32,
    pub direct_lines: u32,
    pub abandoned_legs: u32,
    /// Floors where at least one leg needed the fallback.
    pub flagged_floors: BTreeSet<i32>,
}

impl CarveDiagnostics {
    fn record(&mut self, floor: i32, report: &LegReport) {
        self.legs += 1;
        self.exhausted_walks += report.exhausted_walks;
        self.blocked_walks += report.blocked_walks;
        self.retries += report.attempts.saturating_sub(1);
        match report.arrival {
            Some(WalkOutcome::Arrived) => self.arrivals += 1,
            Some(WalkOutcome::Shortcut) => self.shortcuts += 1,
            _ => {}
        }
        match report.resolution {
            LegResolution::Walked => {}
            LegResolution::DirectLine => {
                self.direct_lines += 1;
                self.flagged_floors.insert(floor);
            }
            LegResolution::Abandoned => {
                self.abandoned_legs += 1;
                self.flagged_floors.insert(floor);
            }
        }
    }

    pub fn fallback_count(&self) -> u32 {
        self.direct_lines + self.abandoned_legs
    }
}

/// A fully generated world. Only the connectivity check mutates it afterwards, and only
/// through highlights.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    pub grid: Grid,
    pub anchors: Anchors,
    pub waypoints: Vec<Pos3>,
    /// Start waypoint of every carved leg, in carve order.
    pub history: Vec<Pos3>,
    pub diagnostics: CarveDiagnostics,
    pub report: Option<ConnectivityReport>,
}

impl World {
    /// Runs (or reruns) the connectivity check and keeps its report.
    pub fn check_connectivity(
        &mut self,
        algorithm: SearchAlgorithm,
    ) -> Result<&ConnectivityReport> {
        let report = check_connectivity(&mut self.grid, &self.anchors, algorithm)?;
        Ok(self.report.insert(report))
    }

    pub fn template(&self) -> Result<WorldTemplate> {
        WorldTemplate::from_grid(&self.grid)
    }

    pub fn fingerprint(&self) -> u64 {
        grid_fingerprint(&self.grid)
    }

    pub fn boss_floor(&self) -> i32 {
        self.grid.dim_z()
    }
}

pub struct WorldGenerator<R: RandomSource = ChaCha8Rng> {
    config: GeneratorConfig,
    rng: R,
}

impl WorldGenerator {
    /// Validates `config` and seeds a ChaCha8 stream from `config.seed`.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let rng = seeded_source(config.seed);
        Self::with_random_source(config, rng)
    }
}

impl<R: RandomSource> WorldGenerator<R> {
    pub fn with_random_source(config: GeneratorConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Swaps in an adjusted configuration and generates again from the same random stream.
    /// The stored configuration is left untouched when the new one is invalid.
    pub fn regenerate(&mut self, config: GeneratorConfig) -> Result<World> {
        config.validate()?;
        self.config = config;
        self.generate()
    }

    pub fn generate(&mut self) -> Result<World> {
        let started = Instant::now();
        let config = &self.config;
        info!(
            dim_x = config.dim_x,
            dim_y = config.dim_y,
            dim_z = config.dim_z,
            seed = config.seed,
            "generating world"
        );

        let mut grid = Grid::new(config.dim_x, config.dim_y, config.dim_z);
        let limits = PlacementLimits {
            min_distance: config.min_distance(),
            entry_attempts: config.entry_attempts,
            descent_attempts: config.descent_attempts,
            exit_attempts: config.exit_attempts,
        };
        let anchors = plan_anchors(&mut grid, &mut self.rng, limits)?;
        let waypoints =
            build_waypoints(&grid, &anchors, config.waypoints_per_floor(), &mut self.rng);

        info!(waypoints = waypoints.len(), "carving corridors");
        let settings = CarveSettings {
            step_budget: config.carve_step_budget,
            leg_attempts: config.carve_leg_attempts,
            fallback: config.carve_fallback,
        };
        let mut history = Vec::new();
        let mut diagnostics = CarveDiagnostics::default();
        for pair in waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from.z != to.z {
                continue;
            }
            history.push(from);
            let report =
                carve_leg(&mut grid, from, to, &DEFAULT_IMPEDIMENTS, settings, &mut self.rng)?;
            diagnostics.record(from.z, &report);
        }
        debug!(
            legs = diagnostics.legs,
            retries = diagnostics.retries,
            fallbacks = diagnostics.fallback_count(),
            "corridors carved"
        );

        info!("stamping rooms");
        stamp_rooms(&mut grid, &anchors, &waypoints, config, &mut self.rng)?;

        let mut world = World { grid, anchors, waypoints, history, diagnostics, report: None };
        let forced = !world.diagnostics.flagged_floors.is_empty();
        if config.run_connectivity_check || forced {
            if forced {
                let floors = &world.diagnostics.flagged_floors;
                debug!(?floors, "fallback forces connectivity check");
            }
            world.check_connectivity(config.validator_algorithm)?;
        }

        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "world generated");
        Ok(world)
    }
}

/// Small rooms on every floor's anchors first, then a random-radius room per waypoint.
fn stamp_rooms<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    anchors: &Anchors,
    waypoints: &[Pos3],
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<()> {
    for z in grid.floors() {
        if let Some(start) = anchors.floor_start(z) {
            stamp_room(grid, TileKind::DungeonRoom, start, 1, None)?;
        }
        if let Some(end) = anchors.floor_end(z) {
            let fill = if config.boss_room_at_exit && end == anchors.exit {
                TileKind::BossRoom
            } else {
                TileKind::DungeonRoom
            };
            stamp_room(grid, fill, end, 1, None)?;
        }
    }
    for &waypoint in waypoints {
        let radius = random_radius(rng, config.room_variance);
        stamp_room(grid, TileKind::DungeonRoom, waypoint, radius, None)?;
    }
    Ok(())
}
