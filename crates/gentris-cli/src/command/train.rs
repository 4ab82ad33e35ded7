use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use gentris_training::{
    champion::{self, ChampionRecord, SaveOutcome},
    config::EvolutionConfig,
    evolution::Evolution,
};

use super::{DEFAULT_CHAMPION_PATH, SearchArg};
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Evolution config JSON file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of genomes per generation
    #[arg(long)]
    population: Option<usize>,
    /// Number of generations to run
    #[arg(long)]
    generations: Option<usize>,
    /// Fraction of genomes kept unchanged each generation
    #[arg(long)]
    survival_rate: Option<f64>,
    /// Per-gene mutation probability
    #[arg(long)]
    mutation_rate: Option<f64>,
    /// Largest absolute mutation delta
    #[arg(long)]
    mutation_step: Option<f32>,
    /// Move cap of the first generation
    #[arg(long)]
    move_limit: Option<usize>,
    /// Amount the move cap grows when a genome reaches it
    #[arg(long)]
    move_limit_step: Option<usize>,
    /// Keep the move cap fixed
    #[arg(long)]
    fixed_move_limit: bool,
    /// Score boards without the height penalty
    #[arg(long)]
    no_height_penalty: bool,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t)]
    search: SearchArg,
    /// Champion file, replaced only when this run does strictly better
    #[arg(long, default_value = DEFAULT_CHAMPION_PATH)]
    champion: PathBuf,
    /// Write the per-generation reports as JSON ("-" for stdout)
    #[arg(long)]
    report: Option<PathBuf>,
}

impl TrainArg {
    fn evolution_config(&self) -> anyhow::Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("evolution config", path)?,
            None => EvolutionConfig::default(),
        };
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(rate) = self.survival_rate {
            config.survival_rate = rate;
        }
        if let Some(rate) = self.mutation_rate {
            config.mutation_rate = rate;
        }
        if let Some(step) = self.mutation_step {
            config.mutation_step = step;
        }
        if let Some(limit) = self.move_limit {
            config.move_limit = limit;
        }
        if let Some(step) = self.move_limit_step {
            config.move_limit_step = step;
        }
        if self.fixed_move_limit {
            config.move_limit_shifting = false;
        }
        if self.no_height_penalty {
            config.height_penalty = None;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.evolution_config()?;
    tracing::info!(
        population = config.population_size,
        generations = config.generations,
        survivors = config.survivor_count(),
        move_limit = config.move_limit,
        seed = ?config.seed,
        "starting evolution"
    );

    let mut evolution = Evolution::new(config)
        .context("Invalid evolution config")?
        .with_search_mode(arg.search.into());
    let champion = evolution
        .run()
        .cloned()
        .context("Evolution finished without ranking any genome")?;

    tracing::info!(
        score = champion.score,
        moves = champion.moves,
        weights = ?champion.weights,
        "evolution finished"
    );

    let record = ChampionRecord::from_result(&champion, Utc::now());
    let outcome = champion::save_if_better(&arg.champion, &record)
        .with_context(|| format!("Failed to save champion file: {}", arg.champion.display()))?;
    match outcome {
        SaveOutcome::Saved => {
            tracing::info!(path = %arg.champion.display(), score = record.score, "saved new champion");
        }
        SaveOutcome::KeptExisting { existing_score } => {
            tracing::info!(
                path = %arg.champion.display(),
                existing_score,
                "existing champion is at least as good, kept it"
            );
        }
    }

    if let Some(path) = &arg.report {
        util::write_json(evolution.reports(), path)?;
    }
    Ok(())
}
