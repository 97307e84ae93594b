//! SA execution loop.

use rand::Rng;

use super::config::{SaConfig, PLATEAU_ACCEPTANCE_PROBABILITY};
use super::types::SwapMove;
use crate::cost::{CostFunction, TotalCost, Weights};
use crate::model::Timetable;

/// Result of one annealing pass.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The table after the last iteration (not necessarily the best seen).
    pub table: Timetable,

    /// Cost of `table`.
    pub cost: TotalCost,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,
}

/// Simulated annealing over [`SwapMove`]s.
///
/// Each iteration swaps two periods of a random group and scores the table
/// with the full evaluator. Improvements are kept, worsening moves survive
/// with the Metropolis probability `exp(-delta / T)`, and moves that leave
/// the cost unchanged survive with [`PLATEAU_ACCEPTANCE_PROBABILITY`].
/// A rejected move is undone by applying the same swap again.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearch<'a> {
    cost_fn: CostFunction<'a>,
    weights: Weights,
    config: SaConfig,
}

impl<'a> LocalSearch<'a> {
    pub fn new(cost_fn: CostFunction<'a>, weights: Weights, config: SaConfig) -> Self {
        Self {
            cost_fn,
            weights,
            config,
        }
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Anneals a copy of `table`; the input is left untouched.
    pub fn run<R: Rng>(&self, table: &Timetable, rng: &mut R) -> SaResult {
        let mut table = table.clone();
        let mut cost = self.cost_fn.total_cost(&table);
        let mut score = cost.total(&self.weights);
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        for i in 0..self.config.iterations {
            let Some(mv) = SwapMove::random(&table, rng) else {
                break;
            };
            mv.apply(&mut table);
            let new_cost = self.cost_fn.total_cost(&table);
            let new_score = new_cost.total(&self.weights);

            let accept = match new_score.cmp(&score) {
                std::cmp::Ordering::Less => {
                    improving_moves += 1;
                    true
                }
                std::cmp::Ordering::Greater => {
                    let delta = (new_score - score) as f64;
                    let probability = (-delta / self.config.temperature_at(i)).exp();
                    rng.random::<f64>() < probability
                }
                std::cmp::Ordering::Equal => rng.random_bool(PLATEAU_ACCEPTANCE_PROBABILITY),
            };

            if accept {
                cost = new_cost;
                score = new_score;
                accepted_moves += 1;
            } else {
                mv.apply(&mut table);
            }
        }

        SaResult {
            table,
            cost,
            accepted_moves,
            improving_moves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::Constructor;
    use crate::model::{Group, ProblemInstance, Teacher};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance() -> ProblemInstance {
        let mut builder = ProblemInstance::builder(2, 5);
        for t in 0..3 {
            builder = builder.teacher(Teacher::with_id(format!("t{t}")));
        }
        for g in 0..3 {
            builder = builder.group(Group::with_id(format!("g{g}")));
        }
        for g in 0..3 {
            for t in 0..3 {
                builder = builder.requirement(&format!("t{t}"), &format!("g{g}"), 2, 1, 0);
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_input_is_not_mutated() {
        let instance = instance();
        let cost_fn = CostFunction::new(&instance);
        let mut rng = StdRng::seed_from_u64(42);
        let table = Constructor::new(&instance).construct(1.0, &mut rng).unwrap();
        let before = table.clone();

        let search = LocalSearch::new(cost_fn, Weights::uniform(100.0, 1.0), SaConfig::new(200, 50.0));
        let _ = search.run(&table, &mut rng);
        assert_eq!(table, before);
    }

    #[test]
    fn test_result_cost_matches_table() {
        let instance = instance();
        let cost_fn = CostFunction::new(&instance);
        let mut rng = StdRng::seed_from_u64(7);
        let table = Constructor::new(&instance).construct(1.0, &mut rng).unwrap();

        let search = LocalSearch::new(cost_fn, Weights::uniform(100.0, 1.0), SaConfig::new(300, 10.0));
        let result = search.run(&table, &mut rng);
        assert_eq!(result.cost, cost_fn.total_cost(&result.table));
        assert!(result.improving_moves <= result.accepted_moves);
        assert!(result.accepted_moves <= 300);
    }

    #[test]
    fn test_swaps_preserve_weekly_requirements() {
        let instance = instance();
        let cost_fn = CostFunction::new(&instance);
        let mut rng = StdRng::seed_from_u64(3);
        let table = Constructor::new(&instance).construct(0.5, &mut rng).unwrap();

        let search = LocalSearch::new(cost_fn, Weights::uniform(100.0, 1.0), SaConfig::new(500, 100.0));
        let result = search.run(&table, &mut rng);
        assert!(result.table.meets_weekly_requirements(&instance));
    }

    #[test]
    fn test_cold_search_does_not_get_much_worse() {
        let instance = instance();
        let cost_fn = CostFunction::new(&instance);
        let weights = Weights::uniform(100.0, 1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let table = Constructor::new(&instance).construct(0.1, &mut rng).unwrap();
        let start = cost_fn.total_cost(&table).total(&weights);

        // Near-zero temperature: worsening moves of at least one unit are
        // accepted with probability exp(-1e9).
        let search = LocalSearch::new(cost_fn, weights, SaConfig::new(500, 1e-9));
        let result = search.run(&table, &mut rng);
        assert!(result.cost.total(&weights) <= start);
    }

    #[test]
    fn test_zero_iterations_returns_copy() {
        let instance = instance();
        let cost_fn = CostFunction::new(&instance);
        let mut rng = StdRng::seed_from_u64(5);
        let table = Constructor::new(&instance).construct(0.5, &mut rng).unwrap();

        let search = LocalSearch::new(cost_fn, Weights::uniform(1.0, 1.0), SaConfig::new(0, 1.0));
        let result = search.run(&table, &mut rng);
        assert_eq!(result.table, table);
        assert_eq!(result.accepted_moves, 0);
    }
}
