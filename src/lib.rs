//! # Racetrack - Neuro-evolved cars on a raster track
//!
//! Cars driven by small neural networks learn to lap a 2D racetrack. Each
//! generation the whole population races until every car has left the road,
//! then the fittest brains are bred into the next generation.
//!
//! ## Features
//!
//! - Deterministic car kinematics with a literal-constant bounding box
//! - Seven ray-cast distance sensors per car
//! - Pixel-colour collision detection against a raster track
//! - Fitness that rewards distance travelled and current speed
//! - MLP brains evolved by elitism, crossover and mutation
//! - Headless training and a macroquad window with a fitness plot
//!
//! ## Core Modules
//!
//! - [`simulation::car`] - Car state, movement, sensors and collision
//! - [`simulation::race`] - Per-generation tick loop and commands
//! - [`simulation::track`] - Raster tracks and map cycling
//! - [`simulation::controller`] - Observation and action interface
//! - [`simulation::brain`] - Neural network controllers
//! - [`simulation::evolution`] - Breeding, statistics and the training loop
//! - [`cli`] - Command-line options for the binaries

/// Command-line options shared by the binaries.
pub mod cli;

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network controllers.
    pub mod brain;
    /// Car kinematics, sensors, collision and fitness.
    pub mod car;
    /// Observation and action interface between cars and controllers.
    pub mod controller;
    /// Error types.
    pub mod error;
    /// Population breeding, statistics and the headless training loop.
    pub mod evolution;
    /// Direction and pixel helpers.
    pub mod geometric_utils;
    /// Simulation and training parameters.
    pub mod params;
    /// The per-generation simulation loop.
    pub mod race;
    /// Raster tracks and map cycling.
    pub mod track;
}
