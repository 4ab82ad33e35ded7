//! Genetic evolution of evaluator weights.
//!
//! A genome is a [`Weights`](gentris_evaluator::weights::Weights) map. Each
//! generation every genome drives a greedy
//! [`Agent`](gentris_evaluator::agent::Agent) through one capped game, the
//! population is ranked by score, and the next generation is bred from the
//! top performers.
//!
//! # Architecture
//!
//! ```text
//! EvolutionConfig ──validate──→ Evolution
//!                                 │ per generation
//!                                 ├─ evaluate: Agent::play_game (one thread per genome)
//!                                 ├─ rank: sort by score, update champion, raise move cap
//!                                 └─ breed: elites + genome::crossover + genome::mutate
//!                                 ↓
//!                            champion ──→ champion::save_if_better (JSON file)
//! ```
//!
//! - [`config`]: run parameters and their validation
//! - [`genome`]: random initialization, crossover, and mutation
//! - [`evolution`]: the phase-driven generation loop
//! - [`champion`]: loading and saving the best genome

pub mod champion;
pub mod config;
pub mod evolution;
pub mod genome;
