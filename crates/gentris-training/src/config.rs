use gentris_evaluator::board_evaluator::HeightPenalty;
use serde::{Deserialize, Serialize};

/// Parameters of an evolution run.
///
/// The defaults reproduce the classic setup: 30 genomes for 15 generations,
/// keeping the top 20% and raising a 500-move cap by 500 whenever a genome
/// reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Fraction of the ranked population copied unchanged into the next generation.
    pub survival_rate: f64,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Largest absolute mutation delta.
    pub mutation_step: f32,
    /// Move cap for the first generation.
    pub move_limit: usize,
    pub move_limit_step: usize,
    pub move_limit_shifting: bool,
    /// `None` disables the height penalty of the evaluator.
    pub height_penalty: Option<HeightPenalty>,
    /// Seed for genome sampling, breeding and piece sequences.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            generations: 15,
            survival_rate: 0.2,
            mutation_rate: 0.1,
            mutation_step: 2.0,
            move_limit: 500,
            move_limit_step: 500,
            move_limit_shifting: true,
            height_penalty: Some(HeightPenalty::default()),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("at least one generation is required")]
    NoGenerations,
    #[display("survival rate {rate} must be in (0, 1]")]
    SurvivalRate { rate: f64 },
    #[display("mutation rate {rate} must be in [0, 1]")]
    MutationRate { rate: f64 },
    #[display("mutation step {step} must be finite and non-negative")]
    MutationStep { step: f32 },
}

impl EvolutionConfig {
    /// Number of top genomes kept verbatim each generation.
    ///
    /// `floor(survival_rate × population_size)`, but never zero.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn survivor_count(&self) -> usize {
        let count = (self.survival_rate * self.population_size as f64).floor() as usize;
        count.clamp(1, self.population_size.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(self.survival_rate > 0.0 && self.survival_rate <= 1.0) {
            return Err(ConfigError::SurvivalRate {
                rate: self.survival_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate {
                rate: self.mutation_rate,
            });
        }
        if !(self.mutation_step.is_finite() && self.mutation_step >= 0.0) {
            return Err(ConfigError::MutationStep {
                step: self.mutation_step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.survivor_count(), 6);
    }

    #[test]
    fn test_survivor_count_never_zero() {
        let config = EvolutionConfig {
            population_size: 3,
            survival_rate: 0.1,
            ..EvolutionConfig::default()
        };
        assert_eq!(config.survivor_count(), 1);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let base = EvolutionConfig::default();
        let cases = [
            EvolutionConfig { population_size: 0, ..base.clone() },
            EvolutionConfig { generations: 0, ..base.clone() },
            EvolutionConfig { survival_rate: 0.0, ..base.clone() },
            EvolutionConfig { mutation_rate: 1.5, ..base.clone() },
            EvolutionConfig { mutation_step: f32::NAN, ..base.clone() },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EvolutionConfig =
            serde_json::from_str(r#"{"population_size": 10, "seed": 7}"#).unwrap();
        assert_eq!(config.population_size, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.generations, 15);
    }
}
