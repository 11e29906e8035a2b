//! Simulation and training parameters.
//!
//! [`Params`] is read from JSON with every field optional, then validated
//! before any generation runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ParamsError;
use super::track::Rgba;

/// Simulation and training parameters.
///
/// Every field has a default, so a JSON config only needs the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Track raster width in pixels. Loaded maps are scaled to it.
    pub track_width: u32,
    /// Track raster height in pixels.
    pub track_height: u32,
    /// Colour of drivable surface. Anything else is an obstacle.
    pub road_color: Rgba,
    /// Initial top-left corner of every car.
    pub start_pos: [f32; 2],
    /// Initial heading in degrees.
    pub start_heading: f32,
    /// Car sprite width.
    pub car_width: f32,
    /// Car sprite height.
    pub car_height: f32,
    /// Speed a stopped car is forced to.
    pub cruising_speed: f32,
    /// Heading change per turn action, in degrees.
    pub turn_step: f32,
    /// Speed change per throttle or brake action.
    pub speed_step: f32,
    /// Braking only applies at or above this speed.
    pub min_brake_speed: f32,
    /// Maximum sensor ray length.
    pub sensor_range: u32,
    /// Hidden layer sizes of the controller network.
    pub hidden_layers: Vec<usize>,
    /// Initial weight range of fresh brains.
    pub weight_scale: f32,
    /// Number of cars per generation.
    pub population_size: usize,
    /// Best genomes copied unchanged into the next generation.
    pub elite_count: usize,
    /// Fraction of the ranked population eligible as parents.
    pub parent_fraction: f32,
    /// Lower bound of the log-uniform mutation scale.
    pub min_mutation_scale: f32,
    /// Upper bound of the log-uniform mutation scale.
    pub max_mutation_scale: f32,
    /// Number of generations the driver runs.
    pub max_generations: u32,
    /// Ends a generation after this many ticks. `None` runs until every car crashed.
    pub max_ticks: Option<u64>,
    /// Presentation pacing for the windowed binary.
    pub ticks_per_second: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            track_width: 960,
            track_height: 540,
            road_color: Rgba::ROAD,
            start_pos: [315.0, 455.0],
            start_heading: 0.0,
            car_width: 30.0,
            car_height: 20.0,
            cruising_speed: 10.0,
            turn_step: 10.0,
            speed_step: 2.0,
            min_brake_speed: 8.0,
            sensor_range: 150,
            hidden_layers: vec![8],
            weight_scale: 1.0,
            population_size: 30,
            elite_count: 2,
            parent_fraction: 0.2,
            min_mutation_scale: 0.002,
            max_mutation_scale: 0.2,
            max_generations: 1000,
            max_ticks: None,
            ticks_per_second: 30.0,
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file and validates them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads `path` when given, otherwise returns validated defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ParamsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let params = Self::default();
                params.validate()?;
                Ok(params)
            }
        }
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.track_width == 0 || self.track_height == 0 {
            return Err(ParamsError::Invalid(
                "track dimensions must be non-zero".to_string(),
            ));
        }
        if self.population_size == 0 {
            return Err(ParamsError::Invalid(
                "population_size must be at least 1".to_string(),
            ));
        }
        if self.elite_count > self.population_size {
            return Err(ParamsError::Invalid(format!(
                "elite_count {} exceeds population_size {}",
                self.elite_count, self.population_size
            )));
        }
        if !(self.parent_fraction > 0.0 && self.parent_fraction <= 1.0) {
            return Err(ParamsError::Invalid(
                "parent_fraction must be in (0, 1]".to_string(),
            ));
        }
        if !(self.min_mutation_scale > 0.0 && self.min_mutation_scale < self.max_mutation_scale) {
            return Err(ParamsError::Invalid(
                "mutation scale bounds must satisfy 0 < min < max".to_string(),
            ));
        }
        if !(self.weight_scale > 0.0) {
            return Err(ParamsError::Invalid(
                "weight_scale must be positive".to_string(),
            ));
        }
        if self.car_width <= 0.0 || self.car_height <= 0.0 {
            return Err(ParamsError::Invalid("car size must be positive".to_string()));
        }
        Ok(())
    }

    /// Controller network layer sizes: sensors, hidden layers, actions.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(super::car::SENSOR_COUNT);
        sizes.extend(&self.hidden_layers);
        sizes.push(super::controller::Action::COUNT);
        sizes
    }
}
