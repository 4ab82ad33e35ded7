//! The evolution engine.
//!
//! Each generation runs through the same cycle:
//!
//! ```text
//! Initializing → Evaluating(0) → Ranking(0) → Breeding(0) → Evaluating(1) → … → Ranking(last) → Finished
//! ```
//!
//! 1. **Evaluating** - Every genome plays one game (in parallel, one thread
//!    per genome). All genomes of a generation see the same piece sequence.
//! 2. **Ranking** - Results are sorted by score (best first, stable), the
//!    champion is updated on strict improvement, and the move cap is raised
//!    if a genome reached it.
//! 3. **Breeding** - The top [`EvolutionConfig::survivor_count`] genomes are
//!    kept verbatim; the rest of the population is filled with mutated
//!    uniform crossovers of two survivors picked with replacement.
//!
//! # Example
//!
//! ```
//! use gentris_training::{config::EvolutionConfig, evolution::Evolution};
//!
//! let config = EvolutionConfig {
//!     population_size: 4,
//!     generations: 2,
//!     move_limit: 5,
//!     move_limit_shifting: false,
//!     seed: Some(1),
//!     ..EvolutionConfig::default()
//! };
//! let mut evolution = Evolution::new(config)?;
//! let champion = evolution.run().expect("every run ranks at least one genome");
//! assert!(champion.moves <= 5);
//! # Ok::<(), gentris_training::config::ConfigError>(())
//! ```

use std::{panic, thread};

use gentris_engine::{GameState, PieceSeed, SearchMode};
use gentris_evaluator::{
    agent::{Agent, GameOutcome},
    board_evaluator::BoardEvaluator,
    placement_evaluator::WeightedPlacementEvaluator,
    weights::Weights,
};
use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    config::{ConfigError, EvolutionConfig},
    genome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EvolutionPhase {
    Initializing,
    Evaluating { generation: usize },
    Ranking { generation: usize },
    Breeding { generation: usize },
    Finished,
}

/// One genome's game.
#[derive(Debug, Clone, Serialize)]
pub struct GenomeResult {
    pub score: usize,
    pub moves: usize,
    pub weights: Weights,
}

/// Summary of a ranked generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_score: usize,
    pub mean_score: f64,
    pub min_score: usize,
    pub best_moves: usize,
    pub best_weights: Weights,
    /// Move cap the generation was played with.
    pub move_limit: usize,
    pub move_limit_raised: bool,
    pub new_champion: bool,
}

#[derive(Debug)]
pub struct Evolution {
    config: EvolutionConfig,
    rng: Pcg32,
    phase: EvolutionPhase,
    move_limit: usize,
    board_evaluator: BoardEvaluator,
    search_mode: SearchMode,
    population: Vec<Weights>,
    results: Vec<GenomeResult>,
    champion: Option<GenomeResult>,
    reports: Vec<GenerationReport>,
}

impl Evolution {
    pub fn new(config: EvolutionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            rng,
            phase: EvolutionPhase::Initializing,
            move_limit: config.move_limit,
            board_evaluator: BoardEvaluator::new(config.height_penalty),
            search_mode: SearchMode::default(),
            population: Vec::with_capacity(config.population_size),
            results: vec![],
            champion: None,
            reports: vec![],
            config,
        })
    }

    /// Placement search used by every genome's agent.
    #[must_use]
    pub fn with_search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Current move cap.
    #[must_use]
    pub fn move_limit(&self) -> usize {
        self.move_limit
    }

    /// Genomes that play in the next (or current) evaluation.
    #[must_use]
    pub fn population(&self) -> &[Weights] {
        &self.population
    }

    /// Results of the last evaluation, ranked once the ranking phase ran.
    #[must_use]
    pub fn results(&self) -> &[GenomeResult] {
        &self.results
    }

    /// Best result seen so far.
    #[must_use]
    pub fn champion(&self) -> Option<&GenomeResult> {
        self.champion.as_ref()
    }

    #[must_use]
    pub fn reports(&self) -> &[GenerationReport] {
        &self.reports
    }

    /// Runs every remaining phase and returns the champion.
    pub fn run(&mut self) -> Option<&GenomeResult> {
        while !self.phase.is_finished() {
            self.advance();
        }
        self.champion()
    }

    /// Executes the current phase and moves to the next one.
    ///
    /// Does nothing once [`EvolutionPhase::Finished`] is reached.
    pub fn advance(&mut self) -> EvolutionPhase {
        self.phase = match self.phase {
            EvolutionPhase::Initializing => {
                self.initialize();
                EvolutionPhase::Evaluating { generation: 0 }
            }
            EvolutionPhase::Evaluating { generation } => {
                self.evaluate(generation);
                EvolutionPhase::Ranking { generation }
            }
            EvolutionPhase::Ranking { generation } => {
                self.rank(generation);
                if generation + 1 >= self.config.generations {
                    EvolutionPhase::Finished
                } else {
                    EvolutionPhase::Breeding { generation }
                }
            }
            EvolutionPhase::Breeding { generation } => {
                self.breed();
                EvolutionPhase::Evaluating {
                    generation: generation + 1,
                }
            }
            EvolutionPhase::Finished => EvolutionPhase::Finished,
        };
        self.phase
    }

    fn initialize(&mut self) {
        self.population = (0..self.config.population_size)
            .map(|_| genome::random_genome(&mut self.rng))
            .collect();
        tracing::info!(
            population = self.population.len(),
            "generated initial population"
        );
    }

    fn evaluate(&mut self, generation: usize) {
        let seed: PieceSeed = self.rng.random();
        let move_limit = self.move_limit;
        let board_evaluator = self.board_evaluator;
        let search_mode = self.search_mode;

        let outcomes: Vec<GameOutcome> = thread::scope(|s| {
            let handles: Vec<_> = self
                .population
                .iter()
                .map(|weights| {
                    let evaluator = WeightedPlacementEvaluator::new(weights.clone(), board_evaluator);
                    let agent = Agent::with_evaluator(Box::new(evaluator)).with_search_mode(search_mode);
                    s.spawn(move || {
                        let mut game = GameState::with_seed(seed);
                        agent.play_game(&mut game, move_limit)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });

        self.results = outcomes
            .into_iter()
            .zip(&self.population)
            .enumerate()
            .map(|(index, (outcome, weights))| {
                tracing::debug!(
                    generation,
                    genome = index,
                    score = outcome.score,
                    moves = outcome.moves,
                    "genome evaluated"
                );
                GenomeResult {
                    score: outcome.score,
                    moves: outcome.moves,
                    weights: weights.clone(),
                }
            })
            .collect();
    }

    fn rank(&mut self, generation: usize) {
        // Stable: equal scores keep population order.
        self.results.sort_by(|a, b| b.score.cmp(&a.score));

        let Some(best) = self.results.first().cloned() else {
            return;
        };
        let new_champion = self
            .champion
            .as_ref()
            .is_none_or(|champion| best.score > champion.score);
        if new_champion {
            self.champion = Some(best.clone());
        }

        let played_limit = self.move_limit;
        let move_limit_raised = self.config.move_limit_shifting
            && self.results.iter().any(|result| result.moves >= played_limit);
        if move_limit_raised {
            self.move_limit += self.config.move_limit_step;
        }

        let report = GenerationReport {
            generation,
            best_score: best.score,
            mean_score: mean(self.results.iter().map(|result| result.score)),
            min_score: self.results.iter().map(|r| r.score).min().unwrap_or(0),
            best_moves: best.moves,
            best_weights: best.weights,
            move_limit: played_limit,
            move_limit_raised,
            new_champion,
        };
        tracing::info!(
            generation = report.generation + 1,
            best = report.best_score,
            mean = report.mean_score,
            min = report.min_score,
            moves = report.best_moves,
            new_champion = report.new_champion,
            "generation ranked"
        );
        if move_limit_raised {
            tracing::info!(
                from = played_limit,
                to = self.move_limit,
                "move limit reached, raising cap"
            );
        }
        self.reports.push(report);
    }

    fn breed(&mut self) {
        let survivors: Vec<Weights> = self
            .results
            .iter()
            .take(self.config.survivor_count())
            .map(|result| result.weights.clone())
            .collect();

        let mut next = survivors.clone();
        while next.len() < self.config.population_size {
            let (Some(parent1), Some(parent2)) =
                (survivors.choose(&mut self.rng), survivors.choose(&mut self.rng))
            else {
                break;
            };
            let mut child = genome::crossover(parent1, parent2, &mut self.rng);
            genome::mutate(
                &mut child,
                self.config.mutation_rate,
                self.config.mutation_step,
                &mut self.rng,
            );
            next.push(child);
        }
        self.population = next;
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = usize>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.map(|v| v as f64).sum::<f64>() / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            move_limit: 8,
            move_limit_step: 4,
            generations: 3,
            seed: Some(seed),
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_phase_sequence() {
        let mut evolution = Evolution::new(EvolutionConfig {
            generations: 2,
            population_size: 4,
            ..small_config(1)
        })
        .unwrap();
        let mut phases = vec![evolution.phase()];
        while !evolution.phase().is_finished() {
            phases.push(evolution.advance());
        }
        assert_eq!(
            phases,
            [
                EvolutionPhase::Initializing,
                EvolutionPhase::Evaluating { generation: 0 },
                EvolutionPhase::Ranking { generation: 0 },
                EvolutionPhase::Breeding { generation: 0 },
                EvolutionPhase::Evaluating { generation: 1 },
                EvolutionPhase::Ranking { generation: 1 },
                EvolutionPhase::Finished,
            ]
        );
        assert_eq!(evolution.advance(), EvolutionPhase::Finished);
        assert_eq!(evolution.reports().len(), 2);
    }

    #[test]
    fn test_elites_survive_and_population_is_refilled() {
        let mut evolution = Evolution::new(small_config(2)).unwrap();
        evolution.advance(); // initialize
        assert_eq!(evolution.population().len(), 30);
        evolution.advance(); // evaluate
        evolution.advance(); // rank
        assert!(evolution.phase().is_breeding());

        let results = evolution.results();
        assert_eq!(results.len(), 30);
        assert!(results.is_sorted_by(|a, b| a.score >= b.score));
        let elites: Vec<Weights> = results.iter().take(6).map(|r| r.weights.clone()).collect();

        evolution.advance(); // breed
        assert_eq!(evolution.population().len(), 30);
        assert_eq!(&evolution.population()[..6], elites.as_slice());
    }

    #[test]
    fn test_move_limit_is_raised_when_reached() {
        let mut evolution = Evolution::new(small_config(3)).unwrap();
        for _ in 0..3 {
            evolution.advance();
        }
        assert!(evolution.results().iter().any(|r| r.moves == 8));
        assert_eq!(evolution.move_limit(), 12);
        assert!(evolution.reports()[0].move_limit_raised);
    }

    #[test]
    fn test_move_limit_fixed_without_shifting() {
        let mut evolution = Evolution::new(EvolutionConfig {
            move_limit_shifting: false,
            ..small_config(4)
        })
        .unwrap();
        evolution.run();
        assert_eq!(evolution.move_limit(), 8);
        assert!(evolution.reports().iter().all(|r| !r.move_limit_raised));
    }

    #[test]
    fn test_champion_is_best_of_all_generations() {
        let mut evolution = Evolution::new(EvolutionConfig {
            population_size: 6,
            ..small_config(5)
        })
        .unwrap();
        let champion_score = evolution.run().unwrap().score;
        let best = evolution.reports().iter().map(|r| r.best_score).max().unwrap();
        assert_eq!(champion_score, best);
        assert!(evolution.reports()[0].new_champion);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = EvolutionConfig {
            population_size: 5,
            generations: 2,
            ..small_config(6)
        };
        let mut a = Evolution::new(config.clone()).unwrap();
        let mut b = Evolution::new(config).unwrap();
        a.run();
        b.run();
        assert_eq!(a.population(), b.population());
        let scores = |e: &Evolution| e.reports().iter().map(|r| r.best_score).collect::<Vec<_>>();
        assert_eq!(scores(&a), scores(&b));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EvolutionConfig {
            population_size: 0,
            ..EvolutionConfig::default()
        };
        assert!(matches!(Evolution::new(config), Err(ConfigError::EmptyPopulation)));
    }
}
