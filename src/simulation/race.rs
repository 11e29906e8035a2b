//! The per-generation simulation loop.
//!
//! [`Race`] advances one generation tick by tick and can be driven by a
//! render loop. [`Simulator`] owns the generation counter and the track set,
//! and runs whole generations headlessly.

use log::{debug, info, warn};

use super::car::Car;
use super::controller::{Action, Controller};
use super::error::{SimError, TrackError};
use super::params::Params;
use super::track::{RasterTrack, TrackMap, TrackSet};

/// External commands recognised while a generation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch to the next track and put every car back on the start pose.
    NextMap,
    /// Stop the whole run.
    Quit,
}

/// Source of [`Command`]s, polled once before every tick.
pub trait CommandSource {
    /// Returns the command issued before tick `tick`, if any.
    fn poll(&mut self, tick: u64) -> Option<Command>;
}

impl<F> CommandSource for F
where
    F: FnMut(u64) -> Option<Command>,
{
    fn poll(&mut self, tick: u64) -> Option<Command> {
        self(tick)
    }
}

/// A command source that never issues anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommands;

impl CommandSource for NoCommands {
    fn poll(&mut self, _tick: u64) -> Option<Command> {
        None
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Some cars are still driving.
    Running {
        /// Cars alive after the tick.
        alive: usize,
    },
    /// Every car has crashed.
    Finished,
}

/// Outcome of one generation, handed back to the evolutionary driver.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Generation ordinal, starting at 1.
    pub generation: u32,
    /// Fitness earned by each agent, in population order.
    pub fitness: Vec<f64>,
    /// Ticks simulated.
    pub ticks: u64,
    /// Track in use when the generation ended.
    pub map_index: usize,
    /// Whether the tick limit cut the generation short.
    pub truncated: bool,
}

/// How a call to [`Simulator::run_generation`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceOutcome {
    /// Every car crashed or the tick limit was hit.
    Completed(GenerationReport),
    /// A quit command arrived.
    Quit,
}

/// One generation of cars, each paired with the controller at the same index.
pub struct Race<'a, C: Controller> {
    generation: u32,
    cars: Vec<Car>,
    controllers: &'a [C],
    fitness: Vec<f64>,
    ticks: u64,
    alive: usize,
}

impl<'a, C: Controller> Race<'a, C> {
    /// Places one car per controller on the start pose with zero fitness.
    pub fn new(generation: u32, controllers: &'a [C], params: &Params) -> Self {
        Self {
            generation,
            cars: controllers.iter().map(|_| Car::new(params)).collect(),
            controllers,
            fitness: vec![0.0; controllers.len()],
            ticks: 0,
            alive: controllers.len(),
        }
    }

    /// Runs every living car through one tick.
    ///
    /// Each car self-starts if stopped, asks its controller for an action,
    /// applies it, moves, and earns its reward if it is still alive afterwards.
    /// Dead cars are skipped entirely.
    pub fn tick(&mut self, track: &dyn TrackMap, params: &Params) -> Result<TickStatus, TrackError> {
        if self.alive == 0 {
            return Ok(TickStatus::Finished);
        }

        for (index, (car, controller)) in self.cars.iter_mut().zip(self.controllers).enumerate() {
            if !car.is_alive() {
                continue;
            }
            car.self_start(params);
            let outputs = controller.act(&car.observations());
            car.apply(Action::select(&outputs), params);
            car.advance(track, params)?;

            if car.is_alive() {
                self.fitness[index] += f64::from(car.reward());
            } else {
                debug!(
                    "generation {}: car {} crashed at tick {}",
                    self.generation, index, self.ticks
                );
            }
        }

        self.ticks += 1;
        self.alive = self.cars.iter().filter(|car| car.is_alive()).count();

        if self.alive == 0 {
            Ok(TickStatus::Finished)
        } else {
            Ok(TickStatus::Running { alive: self.alive })
        }
    }

    /// Whether the generation has used up `max_ticks`. Logs the cut-off.
    pub fn tick_limit_reached(&self, max_ticks: Option<u64>) -> bool {
        let reached = max_ticks.is_some_and(|limit| self.ticks >= limit);
        if reached {
            warn!(
                "generation {} hit the tick limit with {} cars alive",
                self.generation, self.alive
            );
        }
        reached
    }

    /// Puts every living car back on the start pose, keeping fitness and
    /// alive flags. Crashed cars are left untouched.
    pub fn reset_poses(&mut self, params: &Params) {
        for car in &mut self.cars {
            car.reset_pose(params);
        }
    }

    /// Generation ordinal.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Cars in population order.
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Fitness accumulated so far, in population order.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// Ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Cars alive after the last tick.
    pub fn alive(&self) -> usize {
        self.alive
    }

    /// Whether every car has crashed.
    pub fn is_finished(&self) -> bool {
        self.alive == 0
    }

    /// Consumes the race into its report.
    pub fn finish(self, map_index: usize, truncated: bool) -> GenerationReport {
        GenerationReport {
            generation: self.generation,
            fitness: self.fitness,
            ticks: self.ticks,
            map_index,
            truncated,
        }
    }
}

/// Runs generations against a set of tracks.
#[derive(Debug, Clone)]
pub struct Simulator {
    tracks: TrackSet,
    params: Params,
    generation: u32,
}

impl Simulator {
    /// Creates a simulator that has not run any generation yet.
    pub fn new(tracks: TrackSet, params: Params) -> Self {
        Self {
            tracks,
            params,
            generation: 0,
        }
    }

    /// Number of generations started so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Parameters shared by every generation.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The track set and its current index.
    pub fn tracks(&self) -> &TrackSet {
        &self.tracks
    }

    /// The track cars currently drive on.
    pub fn current_track(&self) -> &RasterTrack {
        self.tracks.current()
    }

    /// Counts a new generation and sets up its cars.
    pub fn start_generation<'a, C: Controller>(&mut self, controllers: &'a [C]) -> Race<'a, C> {
        self.generation += 1;
        debug!(
            "generation {} starts with {} cars on track {}",
            self.generation,
            controllers.len(),
            self.tracks.current().name()
        );
        Race::new(self.generation, controllers, &self.params)
    }

    /// Switches track and resets the race's cars to the start pose.
    pub fn next_map<C: Controller>(&mut self, race: &mut Race<'_, C>) {
        let index = self.tracks.advance();
        race.reset_poses(&self.params);
        info!(
            "generation {}: switched to track {} ({})",
            race.generation(),
            index,
            self.tracks.current().name()
        );
    }

    /// Runs one generation to completion.
    ///
    /// Commands are polled before every tick. The generation ends when all
    /// cars crashed or `max_ticks` is reached.
    pub fn run_generation<C: Controller>(
        &mut self,
        controllers: &[C],
        commands: &mut dyn CommandSource,
    ) -> Result<RaceOutcome, SimError> {
        let mut race = self.start_generation(controllers);
        let mut truncated = false;

        loop {
            match commands.poll(race.ticks()) {
                Some(Command::Quit) => {
                    info!("quit requested during generation {}", race.generation());
                    return Ok(RaceOutcome::Quit);
                }
                Some(Command::NextMap) => self.next_map(&mut race),
                None => {}
            }

            if race.tick_limit_reached(self.params.max_ticks) {
                truncated = true;
                break;
            }

            if race.tick(self.tracks.current(), &self.params)? == TickStatus::Finished {
                break;
            }
        }

        Ok(RaceOutcome::Completed(
            race.finish(self.tracks.index(), truncated),
        ))
    }
}
