pub mod config;
pub mod error;
pub mod mapgen;
pub mod pathfinding;
pub mod rng;
pub mod types;

pub use config::{CarveFallback, GeneratorConfig};
pub use error::{Result, WorldGenError};
pub use mapgen::{
    ConnectivityReport, FloorStatus, Grid, World, WorldGenerator, WorldTemplate, generate_world,
};
pub use pathfinding::{FloorGraph, Pathfinder, SearchGraph, SearchResult};
pub use rng::{RandomSource, seeded_source};
pub use types::*;
