#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use racetrack::simulation::brain::Brain;
use racetrack::simulation::controller::{Action, Controller};
use racetrack::simulation::error::SimError;
use racetrack::simulation::evolution::{
    EvolutionEngine, GenerationStats, Population, StatisticsReporter, Trainer, TrainingOutcome,
};
use racetrack::simulation::params::Params;
use racetrack::simulation::race::{Command, GenerationReport, NoCommands};
use racetrack::simulation::track::{RasterTrack, Rgba, TrackSet};

fn create_test_params() -> Params {
    Params {
        population_size: 10,
        elite_count: 2,
        max_ticks: Some(30),
        ..Params::default()
    }
}

fn create_report(generation: u32, fitness: Vec<f64>) -> GenerationReport {
    GenerationReport {
        generation,
        fitness,
        ticks: 42,
        map_index: 0,
        truncated: false,
    }
}

/// Road square with a verge wider than any car can cross in 30 ticks.
fn create_walled_set() -> TrackSet {
    let mut track = RasterTrack::filled("walled", 1000, 1000, Rgba::GRASS);
    track.fill_rect(150, 150, 700, 700, Rgba::ROAD);
    TrackSet::new(vec![track]).unwrap()
}

#[test]
fn test_random_population_shape() {
    let params = create_test_params();
    let population = Population::new_random(&params);

    assert_eq!(population.len(), 10);
    assert_eq!(population.generation, 0);
    for brain in &population.genomes {
        assert_eq!(brain.layer_sizes(), vec![7, 8, 4]);
    }
}

#[test]
fn test_brain_scores_every_action() {
    let brain = Brain::new(&[7, 8, 4], 1.0, 0.5);

    let scores = brain.act(&[2; 7]);

    assert_eq!(scores.len(), Action::COUNT);
    assert!(scores.iter().all(|s| s.abs() < 1.0));
    // observations are scaled before the forward pass
    assert_eq!(scores, brain.think(&Array1::ones(7)).to_vec());
}

#[test]
fn test_crossover_blends_parents() {
    let a = Brain::new(&[7, 8, 4], 1.0, 1.0);
    let b = Brain::new(&[7, 8, 4], 1.0, 1.0);

    assert_eq!(Brain::crossover(&a, &a, 0.5), a);
    assert_eq!(Brain::crossover(&a, &b, 1.0), a);

    let child = Brain::crossover(&a, &b, 0.25);
    let expected = a.layers[0].weights[[0, 0]] * 0.25 + b.layers[0].weights[[0, 0]] * 0.75;
    assert!((child.layers[0].weights[[0, 0]] - expected).abs() < 1e-6);
}

#[test]
fn test_crossover_of_mismatched_shapes_clones_first_parent() {
    let a = Brain::new(&[7, 8, 4], 1.0, 1.0);
    let b = Brain::new(&[7, 5, 4], 1.0, 1.0);

    assert_eq!(Brain::crossover(&a, &b, 0.5), a);
}

#[test]
fn test_zero_mutation_keeps_brain() {
    let original = Brain::new(&[7, 8, 4], 1.0, 1.0);
    let mut brain = original.clone();

    brain.mutate(0.0);
    assert_eq!(brain, original);

    brain.mutate(0.1);
    assert_ne!(brain, original);
}

#[test]
fn test_breed_keeps_size_and_elites() {
    let params = create_test_params();
    let population = Population::new_random(&params);
    let engine = EvolutionEngine::new(&params);
    let fitness: Vec<f64> = (0..10).map(f64::from).collect();

    let offspring = engine.breed(&population.genomes, &fitness);

    assert_eq!(offspring.len(), population.len());
    assert_eq!(offspring[0], population.genomes[9]);
    assert_eq!(offspring[1], population.genomes[8]);
    for child in &offspring[2..] {
        assert!(!population.genomes.contains(child));
    }
}

#[test]
fn test_breed_ties_keep_population_order() {
    let params = Params {
        elite_count: 1,
        ..create_test_params()
    };
    let population = Population::new_random(&params);
    let engine = EvolutionEngine::new(&params);

    let offspring = engine.breed(&population.genomes, &[5.0; 10]);

    assert_eq!(offspring[0], population.genomes[0]);
}

#[test]
fn test_evolve_counts_generations() {
    let params = create_test_params();
    let mut population = Population::new_random(&params);
    let engine = EvolutionEngine::new(&params);

    population.evolve(&engine, &[1.0; 10]);
    population.evolve(&engine, &[1.0; 10]);

    assert_eq!(population.generation, 2);
    assert_eq!(population.len(), 10);
}

#[test]
fn test_generation_stats_summary() {
    let stats = GenerationStats::from(&create_report(3, vec![3.0, 1.0, 2.0, 10.0]));

    assert_eq!(stats.generation, 3);
    assert_eq!(stats.best, 10.0);
    assert_eq!(stats.mean, 4.0);
    assert_eq!(stats.median, 2.5);
    assert_eq!(stats.ticks, 42);

    let odd = GenerationStats::from(&create_report(1, vec![5.0, 1.0, 3.0]));
    assert_eq!(odd.median, 3.0);

    let empty = GenerationStats::from(&create_report(1, Vec::new()));
    assert_eq!((empty.best, empty.mean, empty.median), (0.0, 0.0, 0.0));
}

#[test]
fn test_statistics_reporter_history() {
    let mut reporter = StatisticsReporter::default();
    assert!(reporter.best_ever().is_none());

    reporter.record(&create_report(1, vec![1.0, 2.0]));
    reporter.record(&create_report(2, vec![9.0, 2.0]));
    reporter.record(&create_report(3, vec![4.0, 2.0]));

    assert_eq!(reporter.history().len(), 3);
    let best = reporter.best_ever().unwrap();
    assert_eq!(best.generation, 2);
    assert_eq!(best.best, 9.0);
}

#[test]
fn test_statistics_are_saved_as_json() {
    let mut reporter = StatisticsReporter::default();
    reporter.record(&create_report(1, vec![1.0, 3.0]));
    let path = std::env::temp_dir().join(format!("racetrack_stats_{}.json", std::process::id()));

    reporter.save_to_file(&path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(json["history"][0]["generation"], 1);
    assert_eq!(json["history"][0]["best"], 3.0);
    assert_eq!(json["history"][0]["mean"], 2.0);
}

#[test]
fn test_trainer_runs_generations() {
    let params = create_test_params();
    let mut trainer = Trainer::new(create_walled_set(), params).unwrap();

    let outcome = trainer.run(3, &mut NoCommands).unwrap();

    assert_eq!(outcome, TrainingOutcome::Finished);
    assert_eq!(trainer.simulator().generation(), 3);
    assert_eq!(trainer.population().generation, 3);
    assert_eq!(trainer.population().len(), 10);
    let generations: Vec<u32> = trainer.stats().history().iter().map(|s| s.generation).collect();
    assert_eq!(generations, vec![1, 2, 3]);
    for stats in trainer.stats().history() {
        assert!(stats.ticks <= 30);
        assert!(stats.best >= stats.mean);
    }
}

#[test]
fn test_trainer_stops_on_quit() {
    let params = create_test_params();
    let mut trainer = Trainer::new(create_walled_set(), params).unwrap();
    let mut commands = |_: u64| Some(Command::Quit);

    let outcome = trainer.run(5, &mut commands).unwrap();

    assert_eq!(outcome, TrainingOutcome::Quit);
    assert!(trainer.stats().history().is_empty());
    assert_eq!(trainer.population().generation, 0);
}

#[test]
fn test_trainer_rejects_invalid_params() {
    let params = Params {
        elite_count: 20,
        ..create_test_params()
    };

    let result = Trainer::new(create_walled_set(), params);

    assert!(matches!(result, Err(SimError::Params(_))));
}
