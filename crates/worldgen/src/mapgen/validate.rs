//! Post-generation connectivity check: one search per floor from its start anchor to its
//! end anchor, with the found route highlighted on the grid.

use tracing::{debug, info, warn};

use crate::error::{Result, WorldGenError};
use crate::pathfinding::{DEFAULT_IMPASSABLE, FloorGraph, Pathfinder};
use crate::types::{Highlight, Pos3, SearchAlgorithm};

use super::grid::Grid;
use super::waypoints::Anchors;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorStatus {
    /// `path_len` counts nodes, both anchors included.
    Connected { path_len: usize },
    Disconnected,
}

impl FloorStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityReport {
    pub algorithm: SearchAlgorithm,
    /// Indexed by floor.
    pub floors: Vec<FloorStatus>,
}

impl ConnectivityReport {
    pub fn all_connected(&self) -> bool {
        self.floors.iter().all(|status| status.is_connected())
    }

    pub fn disconnected_floors(&self) -> Vec<i32> {
        self.floors
            .iter()
            .enumerate()
            .filter(|(_, status)| !status.is_connected())
            .map(|(z, _)| z as i32)
            .collect()
    }

    pub fn connected_count(&self) -> usize {
        self.floors.iter().filter(|status| status.is_connected()).count()
    }
}

/// Searches every floor and highlights each found route, leaving anchor tiles as they are.
/// Route highlights from an earlier check are cleared first. A disconnected floor is a
/// warning in the report, not an error.
pub fn check_connectivity(
    grid: &mut Grid,
    anchors: &Anchors,
    algorithm: SearchAlgorithm,
) -> Result<ConnectivityReport> {
    info!(?algorithm, "checking floor connectivity");
    clear_routes(grid)?;

    let mut floors = Vec::with_capacity(grid.floors().count());
    for z in grid.floors() {
        let (Some(start), Some(end)) = (anchors.floor_start(z), anchors.floor_end(z)) else {
            return Err(WorldGenError::PreconditionUnmet("floor is missing an anchor"));
        };

        let path = {
            let graph = FloorGraph::new(grid, z, &DEFAULT_IMPASSABLE);
            Pathfinder::new(algorithm)
                .with_endpoints(start.planar(), end.planar())
                .search(&graph)?
                .path_to(end.planar())
        };

        let Some(path) = path else {
            warn!(floor = z, ?start, ?end, "floor is not traversable");
            floors.push(FloorStatus::Disconnected);
            continue;
        };
        for step in &path {
            let pos = step.on_floor(z);
            if !grid.kind(pos)?.is_anchor() {
                grid.set_highlight(pos, Some(Highlight::Route))?;
            }
        }
        debug!(floor = z, path_len = path.len(), "floor connected");
        floors.push(FloorStatus::Connected { path_len: path.len() });
    }

    Ok(ConnectivityReport { algorithm, floors })
}

fn clear_routes(grid: &mut Grid) -> Result<()> {
    for z in grid.floors() {
        for y in 0..grid.dim_y() {
            for x in 0..grid.dim_x() {
                let pos = Pos3::new(x, y, z);
                if grid.get(pos)?.highlight == Some(Highlight::Route) {
                    grid.set_highlight(pos, None)?;
                }
            }
        }
    }
    Ok(())
}
