//! Population members and run output.

use crate::cost::{CostFunction, TotalCost, Weights};
use crate::model::Timetable;

/// A candidate timetable with its evaluated cost.
///
/// The only way to obtain one is [`Individual::evaluate`], and the table is
/// not mutable afterwards, so the cached cost can never go stale. Operators
/// derive new tables from existing individuals and evaluate them again.
#[derive(Debug, Clone)]
pub struct Individual {
    table: Timetable,
    cost: TotalCost,
    score: u64,
}

impl Individual {
    /// Scores `table` and wraps it.
    pub fn evaluate(table: Timetable, cost_fn: &CostFunction<'_>, weights: &Weights) -> Self {
        let cost = cost_fn.total_cost(&table);
        let score = cost.total(weights);
        Self { table, cost, score }
    }

    pub fn table(&self) -> &Timetable {
        &self.table
    }

    pub fn cost(&self) -> &TotalCost {
        &self.cost
    }

    /// Weighted scalar cost. Lower is better.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn into_table(self) -> Timetable {
        self.table
    }
}

/// Summary of one population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 0 for the initial population, `i + 1` after generation `i`.
    pub generation: usize,
    pub best_score: u64,
    pub mean_score: f64,
    pub worst_score: u64,
    /// Swap-mutation probability in effect while this population was bred.
    pub mutation_probability: f64,
}

impl GenerationStats {
    pub(crate) fn of(generation: usize, population: &[Individual], mutation_probability: f64) -> Self {
        let best_score = population.iter().map(Individual::score).min().unwrap_or(0);
        let worst_score = population.iter().map(Individual::score).max().unwrap_or(0);
        let mean_score = if population.is_empty() {
            0.0
        } else {
            population.iter().map(|i| i.score() as f64).sum::<f64>() / population.len() as f64
        };
        Self {
            generation,
            best_score,
            mean_score,
            worst_score,
            mutation_probability,
        }
    }
}

/// Final population of a [`Solver`](super::Solver) run.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    history: Vec<GenerationStats>,
}

impl Population {
    pub(crate) fn new(individuals: Vec<Individual>, history: Vec<GenerationStats>) -> Self {
        Self {
            individuals,
            history,
        }
    }

    /// The individual with the lowest score; the first one on ties.
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().min_by_key(|i| i.score())
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Statistics of the initial population followed by one entry per
    /// generation.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }
}
