//! Multi-floor dungeon generation split into its pipeline stages.

pub mod corridor;
pub mod export;
pub mod grid;
pub mod rooms;
pub mod validate;
pub mod waypoints;

mod generator;

pub use corridor::{CarveSettings, LegReport, LegResolution, Walk, WalkOutcome};
pub use export::WorldTemplate;
pub use generator::{CarveDiagnostics, World, WorldGenerator};
pub use grid::Grid;
pub use validate::{ConnectivityReport, FloorStatus};
pub use waypoints::{Anchors, PlacementLimits};

use crate::config::GeneratorConfig;
use crate::error::Result;

/// Seeds a generator from `config.seed` and builds one world.
pub fn generate_world(config: GeneratorConfig) -> Result<World> {
    WorldGenerator::new(config)?.generate()
}

#[cfg(test)]
mod tests {
    use super::{GeneratorConfig, WorldGenerator};

    #[test]
    fn generate_world_matches_world_generator_output() {
        let config = GeneratorConfig { seed: 123, ..GeneratorConfig::with_dimensions(48, 12, 2) };

        let from_helper = super::generate_world(config.clone()).unwrap();
        let from_generator = WorldGenerator::new(config).unwrap().generate().unwrap();

        assert_eq!(from_helper, from_generator);
    }
}
