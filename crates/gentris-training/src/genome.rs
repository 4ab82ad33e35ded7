//! Genetic operators on weight genomes.
//!
//! A genome is a [`Weights`] map with one gene per [`Heuristic`].
//!
//! - **Initialization**: [`random_genome`] samples every gene uniformly from its [`gene_range`]
//! - **Crossover**: [`crossover`] takes each gene from either parent with equal probability
//! - **Mutation**: [`mutate`] adds a uniform delta to each gene with a fixed probability

use std::ops::RangeInclusive;

use gentris_evaluator::{heuristic::Heuristic, weights::Weights};
use rand::Rng;

/// Sampling range for a fresh gene.
///
/// Heuristics that describe a worse board start non-positive, the rest
/// start non-negative. Later generations may leave these ranges.
#[must_use]
pub fn gene_range(heuristic: Heuristic) -> RangeInclusive<f32> {
    match heuristic {
        Heuristic::Height | Heuristic::Holes | Heuristic::Bumpiness => -50.0..=0.0,
        Heuristic::Wells | Heuristic::Lines => 0.0..=50.0,
    }
}

/// Samples a genome with every gene set.
///
/// ```
/// use gentris_evaluator::heuristic::Heuristic;
/// use gentris_training::genome;
/// use rand::SeedableRng as _;
///
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
/// let genome = genome::random_genome(&mut rng);
/// assert!(genome.get(Heuristic::Holes) <= 0.0);
/// assert!(genome.get(Heuristic::Lines) >= 0.0);
/// ```
pub fn random_genome<R>(rng: &mut R) -> Weights
where
    R: Rng + ?Sized,
{
    Heuristic::ALL
        .into_iter()
        .map(|heuristic| (heuristic, rng.random_range(gene_range(heuristic))))
        .collect()
}

/// Uniform crossover: each gene comes from `parent1` or `parent2` with
/// probability 0.5.
///
/// A gene set in only one parent is inherited from that parent.
pub fn crossover<R>(parent1: &Weights, parent2: &Weights, rng: &mut R) -> Weights
where
    R: Rng + ?Sized,
{
    Heuristic::ALL
        .into_iter()
        .filter_map(|heuristic| {
            let gene = match (parent1.try_get(heuristic), parent2.try_get(heuristic)) {
                (Some(a), Some(b)) => {
                    if rng.random_bool(0.5) {
                        a
                    } else {
                        b
                    }
                }
                (Some(gene), None) | (None, Some(gene)) => gene,
                (None, None) => return None,
            };
            Some((heuristic, gene))
        })
        .collect()
}

/// Adds a delta drawn from `[-step, step]` to each gene whose draw from
/// `[0, 1)` falls below `rate`.
pub fn mutate<R>(genome: &mut Weights, rate: f64, step: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let genes: Vec<_> = genome.iter().collect();
    for (heuristic, weight) in genes {
        if rng.random::<f64>() < rate {
            genome.set(heuristic, weight + rng.random_range(-step..=step));
        }
    }
}
