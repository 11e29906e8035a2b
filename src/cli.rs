//! Command-line options shared by the windowed and headless binaries.

use std::path::PathBuf;

use clap::Args;
use log::warn;

use crate::simulation::error::{ParamsError, TrackError};
use crate::simulation::params::Params;
use crate::simulation::track::TrackSet;

/// Tick limit applied to headless runs that configure none. Headless runs
/// have no quit key.
pub const HEADLESS_TICK_LIMIT: u64 = 5_000;

/// Options that select the configuration, the tracks and the run length.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// JSON parameter file. Fields left out keep their defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Track image to race on. Repeat to cycle through several maps.
    #[arg(long = "map", value_name = "PNG")]
    pub maps: Vec<PathBuf>,

    /// Number of generations to train (overrides `max_generations`).
    #[arg(long)]
    pub generations: Option<u32>,

    /// Cut every generation after this many ticks (overrides `max_ticks`).
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

impl RunArgs {
    /// Loads the configuration and applies command-line overrides.
    pub fn params(&self) -> Result<Params, ParamsError> {
        let mut params = Params::load_or_default(self.config.as_deref())?;
        if let Some(generations) = self.generations {
            params.max_generations = generations;
        }
        if self.max_ticks.is_some() {
            params.max_ticks = self.max_ticks;
        }
        params.validate()?;
        Ok(params)
    }

    /// Like [`RunArgs::params`], but bounds every generation by
    /// [`HEADLESS_TICK_LIMIT`] when no tick limit is configured.
    pub fn headless_params(&self) -> Result<Params, ParamsError> {
        let mut params = self.params()?;
        if params.max_ticks.is_none() {
            warn!(
                "no tick limit configured, cutting generations at {} ticks (use --max-ticks to change)",
                HEADLESS_TICK_LIMIT
            );
            params.max_ticks = Some(HEADLESS_TICK_LIMIT);
        }
        Ok(params)
    }

    /// Loads the requested maps, or the built-in oval when none were given.
    pub fn tracks(&self, params: &Params) -> Result<TrackSet, TrackError> {
        TrackSet::load(self.maps.as_slice(), params)
    }
}
