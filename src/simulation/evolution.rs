//! Generation driver: breeding, statistics and the training loop.
//!
//! The simulation loop only borrows a population snapshot and hands back a
//! [`GenerationReport`]. Everything evolutionary (ranking, crossover,
//! mutation, statistics) lives here.

use std::path::Path;

use log::info;
use rand::Rng;
use serde::Serialize;

use super::brain::Brain;
use super::error::SimError;
use super::params::Params;
use super::race::{CommandSource, GenerationReport, RaceOutcome, Simulator};
use super::track::TrackSet;

/// The genomes raced in one generation.
#[derive(Debug, Clone)]
pub struct Population {
    /// One brain per car.
    pub genomes: Vec<Brain>,
    /// Number of times this population has been bred.
    pub generation: u32,
}

impl Population {
    /// Creates `population_size` random brains.
    pub fn new_random(params: &Params) -> Self {
        let layer_sizes = params.layer_sizes();
        let input_scale = 1.0 / params.sensor_range.max(1) as f32;
        let genomes = (0..params.population_size)
            .map(|_| Brain::new(&layer_sizes, params.weight_scale, input_scale))
            .collect();
        Self {
            genomes,
            generation: 0,
        }
    }

    /// Number of genomes.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Whether the population holds no genome.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Replaces the genomes with offspring bred from `fitness`.
    pub fn evolve(&mut self, engine: &EvolutionEngine, fitness: &[f64]) {
        self.genomes = engine.breed(&self.genomes, fitness);
        self.generation += 1;
    }
}

/// Breeding strategy: elitism plus crossover or cloning among the fittest.
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    elite_count: usize,
    parent_fraction: f32,
    min_mutation_scale: f32,
    max_mutation_scale: f32,
}

impl EvolutionEngine {
    /// Reads the breeding settings from `params`.
    pub fn new(params: &Params) -> Self {
        Self {
            elite_count: params.elite_count,
            parent_fraction: params.parent_fraction,
            min_mutation_scale: params.min_mutation_scale,
            max_mutation_scale: params.max_mutation_scale,
        }
    }

    /// Produces a population of the same size as `genomes`.
    ///
    /// The `elite_count` best genomes survive unchanged. The rest are
    /// offspring of the top `parent_fraction`, either a blend of two parents
    /// or a mutated clone of one. `fitness` is indexed like `genomes`; missing
    /// entries count as zero.
    pub fn breed(&self, genomes: &[Brain], fitness: &[f64]) -> Vec<Brain> {
        if genomes.is_empty() {
            return Vec::new();
        }

        let ranked = rank(fitness, genomes.len());
        let elite_count = self.elite_count.min(genomes.len());
        let parent_count = ((genomes.len() as f32 * self.parent_fraction).ceil() as usize)
            .clamp(1, genomes.len());

        let mut rng = rand::rng();
        let mut offspring: Vec<Brain> = ranked[..elite_count]
            .iter()
            .map(|&i| genomes[i].clone())
            .collect();

        while offspring.len() < genomes.len() {
            let mutation_scale = self.sample_mutation_scale(&mut rng);
            let parent_1 = &genomes[ranked[rng.random_range(0..parent_count)]];

            let mut child = if parent_count >= 2 && rng.random_range(0..2) == 0 {
                let parent_2 = &genomes[ranked[rng.random_range(0..parent_count)]];
                Brain::crossover(parent_1, parent_2, rng.random::<f32>())
            } else {
                parent_1.clone()
            };
            child.mutate(mutation_scale);
            offspring.push(child);
        }

        offspring
    }

    /// Log-uniform sample between the configured mutation bounds.
    fn sample_mutation_scale(&self, rng: &mut impl Rng) -> f32 {
        let log_min = self.min_mutation_scale.ln();
        let log_max = self.max_mutation_scale.ln();
        if log_min >= log_max {
            return self.min_mutation_scale;
        }
        rng.random_range(log_min..log_max).exp()
    }
}

/// Indices of `0..len`, best fitness first. Ties keep population order.
fn rank(fitness: &[f64], len: usize) -> Vec<usize> {
    let score = |i: usize| fitness.get(i).copied().unwrap_or(0.0);
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| score(b).total_cmp(&score(a)));
    order
}

/// Fitness summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    /// Generation ordinal.
    pub generation: u32,
    /// Highest fitness.
    pub best: f64,
    /// Mean fitness.
    pub mean: f64,
    /// Median fitness.
    pub median: f64,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Track in use at the end.
    pub map_index: usize,
}

impl From<&GenerationReport> for GenerationStats {
    fn from(report: &GenerationReport) -> Self {
        let mut sorted = report.fitness.clone();
        sorted.sort_by(f64::total_cmp);

        let (best, mean, median) = if sorted.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let n = sorted.len();
            let mean = sorted.iter().sum::<f64>() / n as f64;
            let median = if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            };
            (sorted[n - 1], mean, median)
        };

        Self {
            generation: report.generation,
            best,
            mean,
            median,
            ticks: report.ticks,
            map_index: report.map_index,
        }
    }
}

/// Keeps and logs the fitness history of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsReporter {
    history: Vec<GenerationStats>,
}

impl StatisticsReporter {
    /// Records and logs a finished generation.
    pub fn record(&mut self, report: &GenerationReport) -> &GenerationStats {
        let stats = GenerationStats::from(report);
        info!(
            "generation {}: best {:.1}, mean {:.1}, median {:.1}, {} ticks{}",
            stats.generation,
            stats.best,
            stats.mean,
            stats.median,
            stats.ticks,
            if report.truncated { " (tick limit)" } else { "" }
        );
        self.history.push(stats);
        &self.history[self.history.len() - 1]
    }

    /// Every recorded generation, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Highest best-fitness seen so far.
    pub fn best_ever(&self) -> Option<&GenerationStats> {
        self.history
            .iter()
            .max_by(|a, b| a.best.total_cmp(&b.best))
    }

    /// Writes the history as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// How [`Trainer::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingOutcome {
    /// All requested generations ran.
    Finished,
    /// A quit command stopped the run.
    Quit,
}

/// Headless training loop: race, record, breed, repeat.
#[derive(Debug, Clone)]
pub struct Trainer {
    simulator: Simulator,
    population: Population,
    engine: EvolutionEngine,
    stats: StatisticsReporter,
}

impl Trainer {
    /// Validates `params` and creates a random first population.
    pub fn new(tracks: TrackSet, params: Params) -> Result<Self, SimError> {
        params.validate()?;
        let population = Population::new_random(&params);
        let engine = EvolutionEngine::new(&params);
        Ok(Self {
            simulator: Simulator::new(tracks, params),
            population,
            engine,
            stats: StatisticsReporter::default(),
        })
    }

    /// Races the current population once, then breeds the next one.
    pub fn step(&mut self, commands: &mut dyn CommandSource) -> Result<RaceOutcome, SimError> {
        let outcome = self
            .simulator
            .run_generation(&self.population.genomes, commands)?;
        if let RaceOutcome::Completed(report) = &outcome {
            self.stats.record(report);
            self.population.evolve(&self.engine, &report.fitness);
        }
        Ok(outcome)
    }

    /// Runs up to `max_generations` generations.
    pub fn run(
        &mut self,
        max_generations: u32,
        commands: &mut dyn CommandSource,
    ) -> Result<TrainingOutcome, SimError> {
        for _ in 0..max_generations {
            if self.step(commands)? == RaceOutcome::Quit {
                return Ok(TrainingOutcome::Quit);
            }
        }
        if let Some(best) = self.stats.best_ever() {
            info!(
                "training finished: best fitness {:.1} in generation {}",
                best.best, best.generation
            );
        }
        Ok(TrainingOutcome::Finished)
    }

    /// The simulator and its generation counter.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// The population that will race next.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Fitness history so far.
    pub fn stats(&self) -> &StatisticsReporter {
        &self.stats
    }
}
