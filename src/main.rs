use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use racetrack::cli::RunArgs;
use racetrack::simulation::evolution::{EvolutionEngine, Population, StatisticsReporter};
use racetrack::simulation::race::Simulator;

mod graphics;
mod ui;

/// Ticks allowed in one frame when the window falls behind.
const MAX_TICKS_PER_FRAME: f32 = 4.0;

/// Watch a population of cars learn to drive around a track.
#[derive(Debug, Parser)]
#[command(name = "racetrack", version, about)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Racetrack".to_owned(),
        window_width: 960,
        window_height: 540,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli.run).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(args: &RunArgs) -> Result<()> {
    let params = args.params().context("failed to load parameters")?;
    let tracks = args.tracks(&params).context("failed to load tracks")?;

    let textures = graphics::TrackTextures::new(&tracks);
    let mut simulator = Simulator::new(tracks, params.clone());
    let engine = EvolutionEngine::new(&params);
    let mut population = Population::new_random(&params);
    let mut stats = StatisticsReporter::default();

    let tick_interval = if params.ticks_per_second > 0.0 {
        1.0 / params.ticks_per_second
    } else {
        0.0
    };

    info!(
        "training {} cars for up to {} generations",
        population.len(),
        params.max_generations
    );

    for _ in 0..params.max_generations {
        let mut race = simulator.start_generation(&population.genomes);
        let mut truncated = false;
        let mut pending = 0.0;

        loop {
            if is_key_pressed(KeyCode::Escape) {
                info!("quit requested in generation {}", race.generation());
                return Ok(());
            }
            if is_key_pressed(KeyCode::N) {
                simulator.next_map(&mut race);
            }

            // unpaced runs advance one tick per frame
            let mut budget = if tick_interval > 0.0 {
                pending = (pending + get_frame_time()).min(tick_interval * MAX_TICKS_PER_FRAME);
                let ticks = (pending / tick_interval).floor();
                pending -= ticks * tick_interval;
                ticks as u32
            } else {
                1
            };

            while budget > 0 && !race.is_finished() {
                if race.tick_limit_reached(params.max_ticks) {
                    truncated = true;
                    break;
                }
                race.tick(simulator.current_track(), &params)?;
                budget -= 1;
            }

            clear_background(WHITE);
            graphics::draw_track(textures.get(simulator.tracks().index()));
            graphics::draw_cars(&race, &params);
            graphics::draw_overlay(race.generation(), race.alive());
            ui::draw_stats_window(
                &stats,
                simulator.current_track().name(),
                simulator.tracks().index(),
            );

            next_frame().await;

            if race.is_finished() || truncated {
                break;
            }
        }

        let report = race.finish(simulator.tracks().index(), truncated);
        stats.record(&report);
        population.evolve(&engine, &report.fitness);
    }

    Ok(())
}
