//! Generator configuration: dimensions, budgets, and policy switches.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldGenError};
use crate::rng::{RandomSource, random_range};
use crate::types::SearchAlgorithm;

/// What the corridor carver does once every randomized attempt at a leg has failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarveFallback {
    /// Leave the partial corridor in place and rely on the connectivity check to report it.
    Abandon,
    /// Carve an L-shaped corridor straight to the destination.
    #[default]
    DirectLine,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub dim_x: u32,
    pub dim_y: u32,
    /// Index of the deepest floor; the world has `dim_z + 1` floors.
    pub dim_z: u32,
    /// Upper bound of the random room radius stamped at each waypoint.
    pub room_variance: u32,
    pub run_connectivity_check: bool,
    pub validator_algorithm: SearchAlgorithm,
    pub seed: u64,
    pub entry_attempts: u32,
    pub descent_attempts: u32,
    pub exit_attempts: u32,
    pub carve_step_budget: u32,
    pub carve_leg_attempts: u32,
    pub carve_fallback: CarveFallback,
    pub boss_room_at_exit: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dim_x: 25,
            dim_y: 25,
            dim_z: 3,
            room_variance: 2,
            run_connectivity_check: false,
            validator_algorithm: SearchAlgorithm::GreedyBestFirst,
            seed: 0,
            entry_attempts: 10_000,
            descent_attempts: 10_000,
            exit_attempts: 500,
            carve_step_budget: 35,
            carve_leg_attempts: 3,
            carve_fallback: CarveFallback::DirectLine,
            boss_room_at_exit: true,
        }
    }
}

impl GeneratorConfig {
    pub fn with_dimensions(dim_x: u32, dim_y: u32, dim_z: u32) -> Self {
        Self { dim_x, dim_y, dim_z, ..Self::default() }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|error| WorldGenError::InvalidConfiguration(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rerolls the dimensions within the ranges used for unattended "random" worlds.
    pub fn with_random_dimensions<R: RandomSource + ?Sized>(mut self, rng: &mut R) -> Self {
        self.dim_x = random_range(rng, 30, 50) as u32;
        self.dim_y = random_range(rng, 20, 40) as u32;
        self.dim_z = random_range(rng, 3, 5) as u32;
        self
    }

    pub fn floor_count(&self) -> u32 {
        self.dim_z + 1
    }

    /// Three quarters of the integer-averaged floor side.
    pub fn min_distance(&self) -> u32 {
        let average = (self.dim_x + self.dim_y) / 2;
        (f64::from(average) * 0.75) as u32
    }

    pub fn waypoints_per_floor(&self) -> u32 {
        ((self.dim_x + self.dim_y) / 2) / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.dim_x == 0 || self.dim_y == 0 {
            return Err(invalid(format!(
                "floor dimensions must be positive, got {}x{}",
                self.dim_x, self.dim_y
            )));
        }
        if i32::try_from(self.dim_x).is_err()
            || i32::try_from(self.dim_y).is_err()
            || i32::try_from(self.dim_z).is_err()
        {
            return Err(invalid("dimensions must fit in a signed 32-bit coordinate".to_string()));
        }
        if self.room_variance == 0 {
            return Err(invalid("room_variance must be at least 1".to_string()));
        }
        for (name, value) in [
            ("entry_attempts", self.entry_attempts),
            ("descent_attempts", self.descent_attempts),
            ("exit_attempts", self.exit_attempts),
            ("carve_step_budget", self.carve_step_budget),
            ("carve_leg_attempts", self.carve_leg_attempts),
        ] {
            if value == 0 {
                return Err(invalid(format!("{name} must be at least 1")));
            }
        }

        let cells = u64::from(self.dim_x) * u64::from(self.dim_y) * u64::from(self.floor_count());
        if usize::try_from(cells).is_err() {
            return Err(invalid(format!("a {cells}-cell volume cannot be addressed")));
        }
        Ok(())
    }
}

fn invalid(message: String) -> WorldGenError {
    WorldGenError::InvalidConfiguration(message)
}
